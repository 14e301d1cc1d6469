use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use dashboard_core::DEFAULT_PAGE_LIMIT;
use dashboard_engine::{ApiError, ApiSettings, EngineSettings};
use dashboard_logging::{dash_info, LogDestination};
use serde::Deserialize;

pub const CONFIG_FILENAME: &str = "dashboard.ron";
pub const CONFIG_PATH_ENV: &str = "PAIN_DASHBOARD_CONFIG";
pub const API_URL_ENV: &str = "PAIN_DASHBOARD_API_URL";
pub const POLL_MS_ENV: &str = "PAIN_DASHBOARD_POLL_MS";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
    #[error("invalid value {value:?} for {name}")]
    InvalidEnv { name: &'static str, value: String },
    #[error("invalid api_base_url: {0}")]
    ApiUrl(#[from] ApiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum LogOutput {
    #[default]
    File,
    Terminal,
    Both,
}

impl From<LogOutput> for LogDestination {
    fn from(output: LogOutput) -> Self {
        match output {
            LogOutput::File => LogDestination::File,
            LogOutput::Terminal => LogDestination::Terminal,
            LogOutput::Both => LogDestination::Both,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_base_url: String,
    pub page_limit: u32,
    pub poll_interval_ms: u64,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub log_destination: LogOutput,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000".to_string(),
            page_limit: DEFAULT_PAGE_LIMIT,
            poll_interval_ms: 3000,
            connect_timeout_secs: 10,
            request_timeout_secs: 30,
            log_destination: LogOutput::File,
        }
    }
}

impl AppConfig {
    /// Reads `dashboard.ron` (or the file named by `PAIN_DASHBOARD_CONFIG`)
    /// and applies environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILENAME));
        Self::load_from(&path, |name| std::env::var(name).ok())
    }

    pub fn load_from(
        path: &Path,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = match fs::read_to_string(path) {
            Ok(text) => ron::from_str(&text).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                dash_info!("No config at {:?}, using defaults", path);
                Self::default()
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        config.apply_env(env)?;
        Ok(config)
    }

    fn apply_env(&mut self, env: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(url) = env(API_URL_ENV).filter(|url| !url.trim().is_empty()) {
            self.api_base_url = url.trim().to_string();
        }
        if let Some(raw) = env(POLL_MS_ENV) {
            self.poll_interval_ms =
                raw.trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidEnv {
                        name: POLL_MS_ENV,
                        value: raw.clone(),
                    })?;
        }
        Ok(())
    }

    pub fn engine_settings(&self) -> Result<EngineSettings, ConfigError> {
        let mut api = ApiSettings::new(&self.api_base_url)?;
        api.connect_timeout = Duration::from_secs(self.connect_timeout_secs);
        api.request_timeout = Duration::from_secs(self.request_timeout_secs);

        let mut settings = EngineSettings::new(api);
        settings.poll_interval = Duration::from_millis(self.poll_interval_ms);
        Ok(settings)
    }
}
