//! Terminal progress for line-record imports

use dt_importer::ImportProgress;
use indicatif::{ProgressBar, ProgressStyle};

/// Progress bar sized on the first update, since the total is only known once the
/// language filter has run
pub struct ImportProgressBar {
    bar: ProgressBar,
}

impl ImportProgressBar {
    pub fn new(message: impl Into<String>) -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_message(message.into());
        Self { bar }
    }

    pub fn update(&self, progress: ImportProgress) {
        if self.bar.length() != Some(progress.total as u64) {
            self.bar.set_length(progress.total as u64);
            self.bar.set_style(
                ProgressStyle::default_bar()
                    .template(concat!(
                        "{spinner:.green} [{elapsed_precise}] ",
                        "[{bar:40.cyan/blue}] {pos}/{len} {msg}",
                    ))
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("#>-"),
            );
        }
        self.bar.set_position(progress.imported as u64);
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
