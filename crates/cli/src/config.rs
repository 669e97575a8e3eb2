//! Configuration loading: defaults, then sidekick.toml, then environment.

use std::path::Path;
use std::str::FromStr;

use runtime::InferenceConfig;
use serde::Deserialize;

pub const CONFIG_FILE: &str = "sidekick.toml";

pub const ENV_API_URL: &str = "LM_STUDIO_API_URL";
pub const ENV_API_KEY: &str = "LM_STUDIO_API_KEY";
pub const ENV_MODEL: &str = "LM_STUDIO_MODEL_NAME";
pub const ENV_TIMEOUT: &str = "LM_STUDIO_TIMEOUT";
pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";
pub const ENV_LOG_FORMAT: &str = "LOG_FORMAT";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// LM Studio connection.
    pub backend: InferenceConfig,

    /// Diagnostics output (always stderr).
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Level or `EnvFilter` directive, e.g. `info` or `runtime=debug,warn`.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(ConfigError::InvalidValue {
                key: ENV_LOG_FORMAT,
                value: s.to_string(),
                reason: "expected \"pretty\" or \"json\"".to_string(),
            }),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Load from `path` if it exists, otherwise start from defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse configuration from TOML string.
    pub fn parse(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Overlay environment variables read through `lookup`.
    ///
    /// Unset and empty variables leave the current value alone.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get(ENV_API_URL) {
            self.backend.api_url = url;
        }
        if let Some(key) = get(ENV_API_KEY) {
            self.backend.api_key = key;
        }
        if let Some(model) = get(ENV_MODEL) {
            self.backend.model = model;
        }
        if let Some(timeout) = get(ENV_TIMEOUT) {
            self.backend.timeout_ms =
                timeout
                    .trim()
                    .parse()
                    .map_err(|e: std::num::ParseIntError| ConfigError::InvalidValue {
                        key: ENV_TIMEOUT,
                        value: timeout.clone(),
                        reason: e.to_string(),
                    })?;
        }
        if let Some(level) = get(ENV_LOG_LEVEL) {
            self.log.level = level;
        }
        if let Some(format) = get(ENV_LOG_FORMAT) {
            self.log.format = format.parse()?;
        }
        Ok(())
    }

    /// Check values that parse fine but cannot work.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backend.timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "backend.timeout_ms",
                value: "0".to_string(),
                reason: "timeout must be positive".to_string(),
            });
        }
        let url = &self.backend.api_url;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                key: "backend.api_url",
                value: url.clone(),
                reason: "expected an http:// or https:// URL".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("invalid {key} {value:?}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
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
    fn defaults_match_lm_studio() {
        let config = Config::default();
        assert_eq!(config.backend.api_url, "http://localhost:1234/v1");
        assert_eq!(config.backend.api_key, "lm-studio");
        assert_eq!(config.backend.model, "local-model");
        assert_eq!(config.backend.timeout_ms, 30_000);
        assert_eq!(config.log.level, "info");
        assert_eq!(config.log.format, LogFormat::Pretty);
    }

    #[test]
    fn parse_toml() {
        let toml = r#"
[backend]
api_url = "http://gpu-box:1234/v1"
model = "qwen2.5-7b-instruct"
timeout_ms = 60000

[log]
format = "json"
"#;
        let config = Config::parse(toml).unwrap();
        assert_eq!(config.backend.api_url, "http://gpu-box:1234/v1");
        assert_eq!(config.backend.model, "qwen2.5-7b-instruct");
        assert_eq!(config.backend.timeout_ms, 60_000);
        assert_eq!(config.backend.api_key, "lm-studio");
        assert_eq!(config.log.format, LogFormat::Json);
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn parse_rejects_bad_toml() {
        assert!(matches!(
            Config::parse("[backend]\ntimeout_ms = \"soon\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = Config::load_or_default("/nonexistent/sidekick.toml").unwrap();
        assert_eq!(config.backend.model, "local-model");
    }

    #[test]
    fn environment_overrides_file() {
        let mut config = Config::parse("[backend]\nmodel = \"from-file\"").unwrap();
        config
            .apply_env(env(&[
                (ENV_MODEL, "from-env"),
                (ENV_API_KEY, "secret"),
                (ENV_TIMEOUT, "45000"),
                (ENV_LOG_LEVEL, "debug"),
                (ENV_LOG_FORMAT, "JSON"),
                (ENV_API_URL, ""),
            ]))
            .unwrap();

        assert_eq!(config.backend.model, "from-env");
        assert_eq!(config.backend.api_key, "secret");
        assert_eq!(config.backend.timeout_ms, 45_000);
        assert_eq!(config.backend.api_url, "http://localhost:1234/v1");
        assert_eq!(config.log.level, "debug");
        assert_eq!(config.log.format, LogFormat::Json);
    }

    #[test]
    fn unparsable_timeout_is_an_error() {
        let mut config = Config::default();
        let err = config.apply_env(env(&[(ENV_TIMEOUT, "30s")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: ENV_TIMEOUT, .. }));
    }

    #[test]
    fn validate_rejects_unusable_values() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.backend.timeout_ms = 0;
        assert!(config.validate().is_err());

        config.backend.timeout_ms = 1;
        config.backend.api_url = "localhost:1234".to_string();
        assert!(config.validate().is_err());
    }
}
