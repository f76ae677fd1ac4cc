use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::TowerError;

pub const DEFAULT_CONFIG_PATH: &str = "ctrl-tower.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TowerConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default = "default_log_dir")]
    pub log_dir: String,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// AirLabs API key; empty means unset
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Airport opened at startup; empty starts on the search screen
    #[serde(default)]
    pub default_airport: Option<String>,

    #[serde(default = "default_flights_per_page")]
    pub flights_per_page: usize,

    /// Auto-refresh period in seconds, 0 disables it
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_dir() -> String {
    "logs".to_string()
}

fn default_base_url() -> String {
    "https://airlabs.co/api/v9".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_flights_per_page() -> usize {
    10
}

fn default_refresh_interval_secs() -> u64 {
    300
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            default_airport: None,
            flights_per_page: default_flights_per_page(),
            refresh_interval_secs: default_refresh_interval_secs(),
        }
    }
}

impl Default for TowerConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_dir: default_log_dir(),
            api: ApiConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

impl ApiConfig {
    /// The API key, if one is set and non-blank
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl DisplayConfig {
    pub fn default_airport(&self) -> Option<String> {
        self.default_airport
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .map(str::to_ascii_uppercase)
    }

    pub fn refresh_interval(&self) -> Option<Duration> {
        (self.refresh_interval_secs > 0).then(|| Duration::from_secs(self.refresh_interval_secs))
    }
}

impl TowerConfig {
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e))?;

        let config: TowerConfig = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config file '{}': {}", path.display(), e))?;

        Ok(config)
    }

    /// Load `path` if it exists, otherwise start from defaults.
    ///
    /// Runs before logging is set up, so nothing here logs; the caller
    /// reports where the config came from.
    pub fn load_or_default(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Apply overrides from the process environment. Returns a warning for
    /// every value that was ignored.
    pub fn apply_env_overrides(&mut self) -> Vec<String> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup (the environment in production)
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Vec<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut warnings = Vec::new();

        if let Some(key) = lookup("AIRLABS_API_KEY") {
            self.api.api_key = Some(key);
        }
        if let Some(url) = lookup("AIRLABS_BASE_URL") {
            self.api.base_url = url;
        }
        if let Some(code) = lookup("CTRL_TOWER_AIRPORT") {
            self.display.default_airport = Some(code);
        }
        if let Some(level) = lookup("CTRL_TOWER_LOG_LEVEL") {
            self.log_level = level;
        }
        if let Some(raw) = lookup("CTRL_TOWER_REFRESH_SECS") {
            match raw.trim().parse() {
                Ok(secs) => self.display.refresh_interval_secs = secs,
                Err(_) => warnings.push(format!("Ignoring invalid CTRL_TOWER_REFRESH_SECS '{}'", raw)),
            }
        }
        if let Some(raw) = lookup("CTRL_TOWER_TIMEOUT_SECS") {
            match raw.trim().parse() {
                Ok(secs) => self.api.timeout_secs = secs,
                Err(_) => warnings.push(format!("Ignoring invalid CTRL_TOWER_TIMEOUT_SECS '{}'", raw)),
            }
        }
        warnings
    }

    /// Startup checks. A missing API key is fatal here rather than on the
    /// first fetch.
    pub fn validate(&self) -> Result<(), TowerError> {
        if self.api.api_key().is_none() {
            return Err(TowerError::Configuration(
                "AirLabs API key not configured. Set AIRLABS_API_KEY or api.api_key".to_string(),
            ));
        }
        if self.api.base_url.trim().is_empty() {
            return Err(TowerError::Configuration("api.base_url is empty".to_string()));
        }
        if self.api.timeout_secs == 0 {
            return Err(TowerError::Configuration(
                "api.timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.display.flights_per_page == 0 {
            return Err(TowerError::Configuration(
                "display.flights_per_page must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = TowerConfig::default();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.api.base_url, "https://airlabs.co/api/v9");
        assert_eq!(config.api.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.display.flights_per_page, 10);
        assert_eq!(config.display.refresh_interval(), Some(Duration::from_secs(300)));
        assert_eq!(config.display.default_airport(), None);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: TowerConfig = toml::from_str(
            r#"
            [api]
            api_key = "secret"

            [display]
            default_airport = " sfo "
            refresh_interval_secs = 0
            "#,
        )
        .unwrap();

        assert_eq!(config.api.api_key(), Some("secret"));
        assert_eq!(config.api.timeout_secs, 10);
        assert_eq!(config.display.default_airport(), Some("SFO".to_string()));
        assert_eq!(config.display.refresh_interval(), None);
        assert_eq!(config.log_dir, "logs");
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "log_level = \"debug\"\n[api]\ntimeout_secs = 5").unwrap();

        let config = TowerConfig::from_file(file.path()).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.api.timeout_secs, 5);
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = TowerConfig::load_or_default(dir.path().join("missing.toml")).unwrap();
        assert_eq!(config.display.flights_per_page, 10);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("AIRLABS_API_KEY", "env-key"),
            ("CTRL_TOWER_AIRPORT", "lhr"),
            ("CTRL_TOWER_REFRESH_SECS", "60"),
            ("CTRL_TOWER_TIMEOUT_SECS", "not-a-number"),
        ]);

        let mut config = TowerConfig::default();
        let warnings = config.apply_overrides_from(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.api.api_key(), Some("env-key"));
        assert_eq!(config.display.default_airport(), Some("LHR".to_string()));
        assert_eq!(config.display.refresh_interval_secs, 60);
        // invalid values are ignored
        assert_eq!(config.api.timeout_secs, 10);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_invalid_overrides_are_reported_to_caller() {
        let mut config = TowerConfig::default();
        let warnings = config.apply_overrides_from(|key| match key {
            "CTRL_TOWER_REFRESH_SECS" => Some("soon".to_string()),
            "CTRL_TOWER_TIMEOUT_SECS" => Some("-5".to_string()),
            _ => None,
        });

        assert_eq!(
            warnings,
            vec![
                "Ignoring invalid CTRL_TOWER_REFRESH_SECS 'soon'".to_string(),
                "Ignoring invalid CTRL_TOWER_TIMEOUT_SECS '-5'".to_string(),
            ]
        );
        assert_eq!(config.display.refresh_interval_secs, 300);
        assert_eq!(config.api.timeout_secs, 10);

        let clean = TowerConfig::default().apply_overrides_from(|_| None);
        assert!(clean.is_empty());
    }

    #[test]
    fn test_validate_requires_api_key() {
        let mut config = TowerConfig::default();
        assert!(matches!(config.validate(), Err(TowerError::Configuration(_))));

        config.api.api_key = Some("   ".to_string());
        assert!(matches!(config.validate(), Err(TowerError::Configuration(_))));

        config.api.api_key = Some("key".to_string());
        assert!(config.validate().is_ok());

        config.api.timeout_secs = 0;
        assert!(config.validate().is_err());
    }
}
