/// Runtime configuration.
///
/// Settings come from an optional TOML file (`reserve_guide.toml` by
/// default), then environment overrides. `.env` is loaded by the binary
/// before any of this runs, so values there count as environment.
///
/// ```toml
/// catalog_path = "reserves.toml"
///
/// [guide]
/// model = "gemini-2.5-flash"
/// temperature = 0.7
/// max_output_tokens = 500
///
/// [logging]
/// level = "info"
/// file = "reserve_guide.log"
/// ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::logging::LogLevel;

pub const DEFAULT_CONFIG_PATH: &str = "reserve_guide.toml";

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 500;

/// Environment variables consulted for the API key, in priority order.
pub const API_KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];
pub const LOG_LEVEL_VAR: &str = "RESERVE_GUIDE_LOG";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// Gemini endpoint and generation parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GuideConfig {
    /// Not validated locally; a missing key surfaces as a failed call.
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
    /// Request timeout. `None` keeps the HTTP client's default.
    pub timeout_secs: Option<u64>,
}

impl Default for GuideConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
    pub console_timestamps: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            console_timestamps: false,
        }
    }
}

impl LoggingConfig {
    pub fn min_level(&self) -> Result<LogLevel, ConfigError> {
        self.level
            .parse()
            .map_err(|reason| ConfigError::InvalidValue { field: "logging.level", reason })
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// External catalog file; the embedded catalog is used when absent.
    pub catalog_path: Option<PathBuf>,
    pub guide: GuideConfig,
    pub logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl AppConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads `path` if it exists; a missing file yields the defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// File (if present) plus process environment overrides.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::from_file(path)?;
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Applies environment overrides through `lookup`, so tests can supply a
    /// fake environment.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = API_KEY_VARS
            .iter()
            .filter_map(|var| lookup(var))
            .find(|value| !value.trim().is_empty())
        {
            self.guide.api_key = Some(key);
        }

        if let Some(level) = lookup(LOG_LEVEL_VAR) {
            self.logging.level = level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.guide.temperature) {
            return Err(ConfigError::InvalidValue {
                field: "guide.temperature",
                reason: format!("{} is outside 0.0-2.0", self.guide.temperature),
            });
        }
        if self.guide.max_output_tokens == 0 {
            return Err(ConfigError::InvalidValue {
                field: "guide.max_output_tokens",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.guide.model.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "guide.model",
                reason: "must not be empty".to_string(),
            });
        }
        self.logging.min_level()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_match_documented_generation_parameters() {
        let config = AppConfig::default();
        assert_eq!(config.guide.model, "gemini-2.5-flash");
        assert_eq!(config.guide.temperature, 0.7);
        assert_eq!(config.guide.max_output_tokens, 500);
        assert!(config.guide.api_key.is_none());
        assert!(config.catalog_path.is_none());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let config = AppConfig::from_toml_str("[guide]\nmodel = \"gemini-2.0-flash\"\n").unwrap();
        assert_eq!(config.guide.model, "gemini-2.0-flash");
        assert_eq!(config.guide.max_output_tokens, 500);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_env_api_key_overrides_file() {
        let mut config = AppConfig::from_toml_str("[guide]\napi_key = \"from-file\"\n").unwrap();
        config.apply_env(env(&[("GEMINI_API_KEY", "from-env")]));
        assert_eq!(config.guide.api_key.as_deref(), Some("from-env"));
    }

    #[test]
    fn test_fallback_api_key_variable() {
        let mut config = AppConfig::default();
        config.apply_env(env(&[("GEMINI_API_KEY", "  "), ("API_KEY", "secondary")]));
        assert_eq!(config.guide.api_key.as_deref(), Some("secondary"));
    }

    #[test]
    fn test_missing_key_is_not_an_error() {
        let mut config = AppConfig::default();
        config.apply_env(env(&[]));
        assert!(config.validate().is_ok());
        assert!(config.guide.api_key.is_none());
    }

    #[test]
    fn test_out_of_range_temperature_is_rejected() {
        let result = AppConfig::from_toml_str("[guide]\ntemperature = 3.5\n");
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { field: "guide.temperature", .. })
        ));
    }

    #[test]
    fn test_zero_token_budget_is_rejected() {
        let result = AppConfig::from_toml_str("[guide]\nmax_output_tokens = 0\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_bad_log_level_is_rejected() {
        let result = AppConfig::from_toml_str("[logging]\nlevel = \"chatty\"\n");
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { field: "logging.level", .. })
        ));
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::from_file(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_file_is_read_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reserve_guide.toml");
        std::fs::write(&path, "catalog_path = \"custom.toml\"\n[logging]\nlevel = \"debug\"\n").unwrap();

        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.catalog_path, Some(PathBuf::from("custom.toml")));
        assert_eq!(config.logging.min_level().unwrap(), LogLevel::Debug);
    }
}
