use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub api: ApiSettings,
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiSettings {
    /// Gateway root; service paths such as `/auth/login` are appended to it.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Applied to every request; there is no per-call override.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct StorageSettings {
    /// Where the token pair is persisted. Tokens live in memory only when unset.
    pub token_file: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TelemetrySettings {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            otlp_endpoint: None,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_log_level() -> String {
    "info".to_string()
}

impl ApiSettings {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Base URL without trailing slashes, ready for `format!("{}{}", base, path)`.
    pub fn normalized_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

impl Settings {
    /// Settings pointing at `base_url` with every other value at its default.
    pub fn for_base_url(base_url: impl Into<String>) -> Self {
        Self {
            api: ApiSettings::new(base_url),
            storage: StorageSettings::default(),
            telemetry: TelemetrySettings::default(),
        }
    }
}

/// Compiled-in defaults overridden by `APP_`-prefixed environment variables,
/// e.g. `APP_API__BASE_URL=https://gateway.example.com`.
pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let settings = config::Config::builder()
        .set_default("api.base_url", DEFAULT_API_BASE_URL)?
        .set_default("api.timeout_secs", DEFAULT_TIMEOUT_SECS)?
        .set_default("telemetry.log_level", "info")?
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_defaults_without_environment() {
        std::env::remove_var("APP_API__BASE_URL");
        let settings = get_configuration().unwrap();

        assert_eq!(settings.api.base_url, DEFAULT_API_BASE_URL);
        assert_eq!(settings.api.timeout(), Duration::from_secs(30));
        assert!(settings.storage.token_file.is_none());
        assert_eq!(settings.telemetry.log_level, "info");
    }

    #[test]
    #[serial]
    fn test_base_url_environment_override() {
        std::env::set_var("APP_API__BASE_URL", "https://gateway.example.com/");
        let settings = get_configuration().unwrap();
        std::env::remove_var("APP_API__BASE_URL");

        assert_eq!(settings.api.base_url, "https://gateway.example.com/");
        assert_eq!(
            settings.api.normalized_base_url(),
            "https://gateway.example.com"
        );
    }
}
