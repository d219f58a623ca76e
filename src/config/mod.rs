use serde::{Deserialize, Serialize};
use std::path::Path;
use std::fs;
use std::time::Duration;
use log::info;
use crate::error::{Error, Result};
use crate::validation::{validate_base_url, validate_risk_per_trade};

pub const BASE_URL_ENV: &str = "MOMENTUM_API_BASE_URL";
pub const DEFAULT_CONFIG_PATH: &str = "config/config.toml";

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub polling: PollingConfig,
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    /// Unset means the HTTP client's own default.
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct PollingConfig {
    pub refresh_interval_secs: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct DashboardConfig {
    /// Display-only multiplier behind "Capital at Risk", not a sizing rule.
    pub risk_per_trade: f64,
    pub preview_rows: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            request_timeout_secs: None,
        }
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self { refresh_interval_secs: 60 }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            risk_per_trade: 2000.0,
            preview_rows: 5,
        }
    }
}

impl PollingConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }
}

impl ApiConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let config_str = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&config_str)?;
        Ok(config)
    }

    /// Loads `path` when it exists, otherwise starts from defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            info!("No configuration at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// An explicitly named file must exist; the default path may be absent.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => Self::load_or_default(Path::new(DEFAULT_CONFIG_PATH)),
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let config_str = toml::to_string_pretty(self)?;
        fs::write(path, config_str)?;
        Ok(())
    }

    /// Applies `MOMENTUM_API_BASE_URL` when set and non-empty.
    pub fn apply_env(&mut self) {
        if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
            self.override_base_url(&base_url);
        }
    }

    /// File value, then `MOMENTUM_API_BASE_URL`, then the command-line flag.
    pub fn apply_overrides(&mut self, cli_base_url: Option<&str>) {
        self.apply_env();
        if let Some(base_url) = cli_base_url {
            self.override_base_url(base_url);
        }
    }

    pub fn override_base_url(&mut self, base_url: &str) {
        let base_url = base_url.trim();
        if !base_url.is_empty() {
            self.api.base_url = base_url.to_string();
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_base_url(&self.api.base_url)?;
        if self.polling.refresh_interval_secs == 0 {
            return Err(Error::Config("Refresh interval must be at least one second".to_string()));
        }
        if self.api.request_timeout_secs == Some(0) {
            return Err(Error::Config("Request timeout must be at least one second".to_string()));
        }
        validate_risk_per_trade(self.dashboard.risk_per_trade)?;
        if self.dashboard.preview_rows == 0 {
            return Err(Error::Config("Dashboard preview must show at least one row".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "http://127.0.0.1:8000");
        assert_eq!(config.polling.refresh_interval(), Duration::from_secs(60));
        assert_eq!(config.dashboard.risk_per_trade, 2000.0);
        assert_eq!(config.dashboard.preview_rows, 5);
        assert!(config.api.request_timeout().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let config: Config = toml::from_str(
            r#"
            [api]
            base_url = "http://scanner.local:9000"

            [dashboard]
            risk_per_trade = 500.0
            "#,
        )
        .unwrap();
        assert_eq!(config.api.base_url, "http://scanner.local:9000");
        assert_eq!(config.polling.refresh_interval_secs, 60);
        assert_eq!(config.dashboard.risk_per_trade, 500.0);
        assert_eq!(config.dashboard.preview_rows, 5);
    }

    #[test]
    fn test_save_and_load() {
        let path = env::temp_dir().join(format!("momentum-dashboard-{}.toml", std::process::id()));
        let mut config = Config::default();
        config.polling.refresh_interval_secs = 15;
        config.api.request_timeout_secs = Some(10);
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        let _ = fs::remove_file(&path);
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = Config::load_or_default(Path::new("/nonexistent/momentum.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_explicit_missing_config_is_an_error() {
        let err = Config::resolve(Some(Path::new("/nonexistent/momentum.toml"))).unwrap_err();
        assert_eq!(err.kind(), "io");
    }

    #[test]
    fn test_explicit_config_is_loaded() {
        let path = env::temp_dir().join(format!("momentum-explicit-{}.toml", std::process::id()));
        fs::write(&path, "[polling]\nrefresh_interval_secs = 30\n").unwrap();
        let config = Config::resolve(Some(&path)).unwrap();
        let _ = fs::remove_file(&path);
        assert_eq!(config.polling.refresh_interval_secs, 30);
    }

    #[test]
    fn test_base_url_precedence() {
        let mut config: Config = toml::from_str("[api]\nbase_url = \"http://from-file:8000\"").unwrap();

        env::set_var(BASE_URL_ENV, "http://from-env:8000");
        let mut env_only = config.clone();
        env_only.apply_overrides(None);
        config.apply_overrides(Some("http://from-flag:8000"));
        env::remove_var(BASE_URL_ENV);

        assert_eq!(env_only.api.base_url, "http://from-env:8000");
        assert_eq!(config.api.base_url, "http://from-flag:8000");

        let mut untouched: Config = toml::from_str("[api]\nbase_url = \"http://from-file:8000\"").unwrap();
        untouched.apply_overrides(None);
        assert_eq!(untouched.api.base_url, "http://from-file:8000");
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err: Error = toml::from_str::<Config>("[api\nbase_url=").unwrap_err().into();
        assert_eq!(err.kind(), "config");
    }

    #[test]
    fn test_override_base_url_ignores_blank() {
        let mut config = Config::default();
        config.override_base_url("   ");
        assert_eq!(config.api.base_url, "http://127.0.0.1:8000");
        config.override_base_url("http://10.0.0.5:8000/");
        assert_eq!(config.api.base_url, "http://10.0.0.5:8000/");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.polling.refresh_interval_secs = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.api.base_url = "not a url".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.dashboard.risk_per_trade = -5.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.dashboard.preview_rows = 0;
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }
}
