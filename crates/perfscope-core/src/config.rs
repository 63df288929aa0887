//! Layered configuration: built-in defaults, an optional JSON or YAML file,
//! then command-line overrides.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CDP_URL: &str = "http://localhost:9222";
pub const DEFAULT_STABILIZATION_SECS: u64 = 3;
pub const DEFAULT_OUTPUT_DIR: &str = "./results";
pub const DEFAULT_OUTPUT_FORMAT: &str = "json";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Config {
    /// DevTools endpoint of the running browser
    pub cdp_url: String,
    /// Seconds to let deferred rendering settle before measuring
    pub stabilization_time: u64,
    /// Extra HTTP headers sent with every request
    pub headers: BTreeMap<String, String>,
    pub output_dir: PathBuf,
    pub output_format: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cdp_url: DEFAULT_CDP_URL.to_string(),
            stabilization_time: DEFAULT_STABILIZATION_SECS,
            headers: BTreeMap::new(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            output_format: DEFAULT_OUTPUT_FORMAT.to_string(),
        }
    }
}

/// Keys a config file may set; anything else in the file is ignored
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    #[serde(alias = "controlEndpoint")]
    cdp_url: Option<String>,
    #[serde(alias = "stabilizationDelaySeconds")]
    stabilization_time: Option<u64>,
    headers: Option<BTreeMap<String, String>>,
    #[serde(alias = "outputDirectory")]
    output_dir: Option<PathBuf>,
    output_format: Option<String>,
}

/// Values supplied on the command line
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub cdp_url: Option<String>,
    pub headers: BTreeMap<String, String>,
}

impl Config {
    /// Load configuration, falling back to defaults when the file is missing
    /// or unreadable
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        if !path.exists() {
            tracing::warn!("Config file {} not found, using defaults", path.display());
            return Self::default();
        }

        match Self::from_file(path) {
            Ok(config) => {
                tracing::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                tracing::warn!("Error loading config {}: {}, using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    /// Read and merge a config file over the defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        tracing::debug!("Reading config file: {}", path.display());

        let content = std::fs::read_to_string(path)?;
        let file: FileConfig = if content.trim().is_empty() {
            FileConfig::default()
        } else if is_yaml(path) {
            serde_yaml::from_str(&content)?
        } else {
            serde_json::from_str(&content)?
        };

        Ok(Self::default().merge(file))
    }

    fn merge(mut self, file: FileConfig) -> Self {
        if let Some(cdp_url) = file.cdp_url {
            self.cdp_url = cdp_url;
        }
        if let Some(stabilization_time) = file.stabilization_time {
            self.stabilization_time = stabilization_time;
        }
        if let Some(headers) = file.headers {
            self.headers = headers;
        }
        if let Some(output_dir) = file.output_dir {
            self.output_dir = output_dir;
        }
        if let Some(output_format) = file.output_format {
            self.output_format = output_format;
        }
        self
    }

    /// Apply command-line values.
    ///
    /// The endpoint only wins when it differs from the built-in default, so an
    /// untouched `--cdp-url` does not mask the file. Command-line headers
    /// replace file headers when any were given.
    pub fn apply_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(cdp_url) = overrides.cdp_url {
            if cdp_url != DEFAULT_CDP_URL {
                self.cdp_url = cdp_url;
            }
        }
        if !overrides.headers.is_empty() {
            self.headers = overrides.headers;
        }
        self
    }

    pub fn stabilization_delay(&self) -> Duration {
        Duration::from_secs(self.stabilization_time)
    }

    pub fn validate(&self) -> Result<()> {
        if self.cdp_url.trim().is_empty() {
            return Err(Error::Config("cdp_url must not be empty".to_string()));
        }
        if self.output_format != DEFAULT_OUTPUT_FORMAT {
            tracing::warn!(
                "Output format '{}' is not supported, writing {}",
                self.output_format,
                DEFAULT_OUTPUT_FORMAT
            );
        }
        Ok(())
    }
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml") | Some("yml")
    )
}

/// Parse repeated `"Name: Value"` arguments.
///
/// Splits on the first colon and trims both sides. Entries without a colon are
/// skipped with a warning.
pub fn parse_header_args(args: &[String]) -> BTreeMap<String, String> {
    let mut headers = BTreeMap::new();

    for arg in args {
        match arg.split_once(':') {
            Some((name, value)) => {
                headers.insert(name.trim().to_string(), value.trim().to_string());
            }
            None => {
                tracing::warn!("Invalid header format: {} (expected 'Header: Value')", arg);
            }
        }
    }

    headers
}
