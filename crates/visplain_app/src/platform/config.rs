//! Layered configuration: defaults, then `visplain.ron`, then the
//! environment, then command line flags.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use visplain_client::{ClientConfig, EngineSettings};
use visplain_core::{ProgressSettings, DEFAULT_BACKEND_ORIGIN};

use super::cli::Cli;
use super::logging::LogDestination;

pub const CONFIG_FILENAME: &str = "visplain.ron";
pub const ORIGIN_ENV: &str = "VISPLAIN_BACKEND_ORIGIN";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub backend_origin: String,
    pub output_dir: PathBuf,
    pub progress_interval_ms: u64,
    pub progress_step: u8,
    pub progress_cap: u8,
    /// Whole-request timeout in seconds. Unset means wait as long as the backend takes.
    pub request_timeout_secs: Option<u64>,
    pub log_destination: LogDestination,
}

impl Default for AppConfig {
    fn default() -> Self {
        let progress = ProgressSettings::default();
        Self {
            backend_origin: DEFAULT_BACKEND_ORIGIN.to_string(),
            output_dir: PathBuf::from("output"),
            progress_interval_ms: 500,
            progress_step: progress.step(),
            progress_cap: progress.cap(),
            request_timeout_secs: None,
            log_destination: LogDestination::default(),
        }
    }
}

impl AppConfig {
    /// Reads `explicit` if given, otherwise `visplain.ron` in the working
    /// directory when it exists. An explicit file must exist.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let default = PathBuf::from(CONFIG_FILENAME);
                if !default.exists() {
                    return Ok(Self::default());
                }
                default
            }
        };
        let text = fs::read_to_string(&path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_ron(&text).with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn from_ron(text: &str) -> anyhow::Result<Self> {
        Ok(ron::from_str(text)?)
    }

    pub fn apply_env_origin(&mut self, value: Option<String>) {
        if let Some(origin) = value.filter(|origin| !origin.trim().is_empty()) {
            self.backend_origin = origin;
        }
    }

    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(origin) = &cli.origin {
            self.backend_origin = origin.clone();
        }
        if let Some(dir) = &cli.output_dir {
            self.output_dir = dir.clone();
        }
    }

    pub fn client_config(&self) -> anyhow::Result<ClientConfig> {
        let mut config = ClientConfig::new(&self.backend_origin)?;
        config.request_timeout = self.request_timeout_secs.map(Duration::from_secs);
        Ok(config)
    }

    pub fn progress_settings(&self) -> ProgressSettings {
        ProgressSettings::new(self.progress_step, self.progress_cap)
    }

    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            progress_interval: Duration::from_millis(self.progress_interval_ms.max(1)),
            output_dir: self.output_dir.clone(),
        }
    }
}
