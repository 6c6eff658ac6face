use std::{fmt, fs, io, path::Path, str::FromStr, time::Duration};

use serde::Deserialize;
use tracing::warn;

pub const CONFIG_FILE: &str = "contract_analyzer.toml";

/// Which strategy backs submission and retrieval. Exactly one is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Deployment {
    /// Submit to and fetch from the external analysis engine.
    Remote,
    /// Fabricate results locally and read them back from the result cache.
    Local,
}

impl FromStr for Deployment {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "remote" => Ok(Deployment::Remote),
            "local" | "demo" => Ok(Deployment::Local),
            other => Err(format!("unknown deployment '{other}'")),
        }
    }
}

impl fmt::Display for Deployment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Deployment::Remote => f.write_str("remote"),
            Deployment::Local => f.write_str("local"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_base_url: String,
    pub deployment: Deployment,
    pub cache_database_url: String,
    pub request_timeout: Duration,
    pub demo_delay: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000".into(),
            deployment: Deployment::Remote,
            cache_database_url: "sqlite://./data/analysis_cache.db".into(),
            request_timeout: Duration::from_secs(30),
            demo_delay: Duration::from_millis(2000),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    api_base_url: Option<String>,
    deployment: Option<Deployment>,
    cache_database_url: Option<String>,
    request_timeout_secs: Option<u64>,
    demo_delay_ms: Option<u64>,
}

/// Defaults, then `contract_analyzer.toml` in the working directory, then
/// `APP__*` environment variables.
pub fn load_settings() -> Settings {
    load_settings_with(Path::new(CONFIG_FILE), |key| std::env::var(key).ok())
}

pub fn load_settings_with(
    config_path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> Settings {
    let mut settings = Settings::default();

    let raw = match read_settings_file(config_path) {
        Ok(raw) => raw,
        Err(err) => {
            warn!(
                path = %config_path.display(),
                "config: ignoring unreadable settings file: {err}"
            );
            None
        }
    };
    if let Some(raw) = raw {
        match toml::from_str::<FileSettings>(&raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.api_base_url {
                    settings.api_base_url = v;
                }
                if let Some(v) = file_cfg.deployment {
                    settings.deployment = v;
                }
                if let Some(v) = file_cfg.cache_database_url {
                    settings.cache_database_url = v;
                }
                if let Some(v) = file_cfg.request_timeout_secs {
                    settings.request_timeout = Duration::from_secs(v);
                }
                if let Some(v) = file_cfg.demo_delay_ms {
                    settings.demo_delay = Duration::from_millis(v);
                }
            }
            Err(err) => warn!(
                path = %config_path.display(),
                "config: ignoring unparsable settings file: {err}"
            ),
        }
    }

    if let Some(v) = env("APP__API_BASE_URL") {
        settings.api_base_url = v;
    }
    if let Some(v) = env("APP__DEPLOYMENT") {
        match v.parse() {
            Ok(deployment) => settings.deployment = deployment,
            Err(err) => warn!("config: APP__DEPLOYMENT ignored: {err}"),
        }
    }
    if let Some(v) = env("APP__CACHE_DATABASE_URL") {
        settings.cache_database_url = v;
    }
    if let Some(v) = env("APP__REQUEST_TIMEOUT_SECS") {
        match v.parse::<u64>() {
            Ok(secs) => settings.request_timeout = Duration::from_secs(secs),
            Err(err) => warn!("config: APP__REQUEST_TIMEOUT_SECS ignored: {err}"),
        }
    }
    if let Some(v) = env("APP__DEMO_DELAY_MS") {
        match v.parse::<u64>() {
            Ok(ms) => settings.demo_delay = Duration::from_millis(ms),
            Err(err) => warn!("config: APP__DEMO_DELAY_MS ignored: {err}"),
        }
    }

    settings.cache_database_url = normalize_database_url(&settings.cache_database_url);
    settings
}

/// A missing file is not an error; the defaults apply.
fn read_settings_file(path: &Path) -> io::Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(raw) => Ok(Some(raw)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err),
    }
}

pub fn normalize_database_url(raw_database_url: &str) -> String {
    let raw_database_url = raw_database_url.trim();

    if raw_database_url.is_empty() {
        return Settings::default().cache_database_url;
    }

    if raw_database_url.starts_with("sqlite::memory:")
        || raw_database_url.starts_with("sqlite://")
        || raw_database_url.contains("://")
    {
        return raw_database_url.to_string();
    }

    if let Some(path) = raw_database_url.strip_prefix("sqlite:") {
        let path = path.replace('\\', "/");
        return format!("sqlite://{path}");
    }

    format!("sqlite://{}", raw_database_url.replace('\\', "/"))
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
