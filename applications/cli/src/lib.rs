//! Flashcard import command-line application

pub mod config;
pub mod error;
pub mod progress;
pub mod render;

pub use config::DtConfig;
pub use error::{CliError, Result};
