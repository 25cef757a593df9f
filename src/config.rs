use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::keys::{KeyGenerator, DEFAULT_KEY_BITS, DEFAULT_MAX_ATTEMPTS};

/// Runtime settings, read from an optional TOML file. Missing fields keep
/// their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub key_bits:            usize,
    pub max_keygen_attempts: usize,
    pub server:              ServerConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            key_bits:            DEFAULT_KEY_BITS,
            max_keygen_attempts: DEFAULT_MAX_ATTEMPTS,
            server:              ServerConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig { host: "127.0.0.1".to_owned(), port: 8085 }
    }
}

impl AppConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).context("Parse configuration")
    }

    /// Defaults when `path` is `None`, otherwise the parsed file.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(AppConfig::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Read config file {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("In {}", path.display()))
    }

    pub fn key_generator(&self) -> KeyGenerator {
        KeyGenerator::new(self.key_bits).max_attempts(self.max_keygen_attempts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(AppConfig::from_toml_str("").unwrap(), AppConfig::default());
        assert_eq!(AppConfig::load(None).unwrap().server.port, 8085);
    }

    #[test]
    fn partial_overrides() {
        let config = AppConfig::from_toml_str(
            r#"
            key_bits = 1024

            [server]
            port = 9000
            "#,
        )
        .unwrap();
        assert_eq!(config.key_bits, 1024);
        assert_eq!(config.max_keygen_attempts, DEFAULT_MAX_ATTEMPTS);
        assert_eq!(config.server, ServerConfig { host: "127.0.0.1".to_owned(), port: 9000 });
        assert_eq!(config.key_generator().bit_length(), 1024);
    }

    #[test]
    fn unknown_keys_are_errors() {
        assert!(AppConfig::from_toml_str("key_size = 10").is_err());
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = AppConfig::load(Some(Path::new("/nonexistent/aggregate.toml"))).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/aggregate.toml"));
    }
}
