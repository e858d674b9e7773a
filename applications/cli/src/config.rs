/// CLI configuration
use crate::error::{CliError, Result};
use dt_importer::LineErrorPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Config file read from the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "dt.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DtConfig {
    #[serde(default = "default_storage")]
    pub storage: StorageSettings,

    #[serde(default = "default_remote")]
    pub remote: RemoteSettings,

    #[serde(default)]
    pub import: ImportSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "default_database_url")]
    pub database_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RemoteSettings {
    /// Root holding `collections.json` and `collections/<id>/`
    #[serde(default = "default_data_root")]
    pub data_root: String,

    /// Root holding the top-level `manifest.json` of a manifest tree
    #[serde(default = "default_manifest_root")]
    pub manifest_root: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl RemoteSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ImportSettings {
    /// What a line-record import does with a bad line
    #[serde(default)]
    pub line_errors: LineErrorPolicy,
}

impl DtConfig {
    /// Load configuration from file and environment.
    ///
    /// An explicit `path` must exist; otherwise `dt.toml` is read if present. Environment
    /// variables override both, e.g. `DT_STORAGE__DATABASE_URL`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(CliError::Config(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("DT")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = settings.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.storage.database_url.is_empty() {
            return Err(CliError::Config(
                "Database URL is required (set DT_STORAGE__DATABASE_URL)".to_string(),
            ));
        }

        validate_http_url("remote.data_root", &self.remote.data_root)?;
        validate_http_url("remote.manifest_root", &self.remote.manifest_root)?;

        if self.remote.timeout_secs == 0 {
            return Err(CliError::Config(
                "remote.timeout_secs must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

fn validate_http_url(key: &str, value: &str) -> Result<()> {
    let url = Url::parse(value).map_err(|e| CliError::Config(format!("{key}: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(CliError::Config(format!(
            "{key} must be an http(s) URL, got {value}"
        )));
    }
    Ok(())
}

// Default values
fn default_storage() -> StorageSettings {
    StorageSettings {
        database_url: default_database_url(),
    }
}

fn default_database_url() -> String {
    "sqlite://./data/flashcards.db".to_string()
}

fn default_remote() -> RemoteSettings {
    RemoteSettings {
        data_root: default_data_root(),
        manifest_root: default_manifest_root(),
        timeout_secs: default_timeout_secs(),
    }
}

fn default_data_root() -> String {
    "http://localhost:8080/dont-translate-data".to_string()
}

fn default_manifest_root() -> String {
    "http://localhost:8080/dont-translate-data/flashcards".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for DtConfig {
    fn default() -> Self {
        Self {
            storage: default_storage(),
            remote: default_remote(),
            import: ImportSettings::default(),
        }
    }
}
