use serde::Deserialize;
use std::env;
use std::sync::OnceLock;
use thiserror::Error;

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration for the Docseg server.
///
/// Every field is optional or defaulted: with no environment at all the server
/// runs in fully local mode, segmenting and labeling without network calls.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Base URL of the external segmentation/topic service. Absent means
    /// local-only processing.
    pub segment_api_url: Option<String>,
    /// Optional bearer credential sent to the external service.
    pub segment_api_key: Option<String>,
    /// Directory holding uploaded documents.
    pub docs_dir: String,
    /// Optional override for the HTTP server port.
    pub server_port: Option<u16>,
}

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            segment_api_url: load_env_optional("SEGMENT_API_URL"),
            segment_api_key: load_env_optional("SEGMENT_API_KEY"),
            docs_dir: load_env_optional("DOCS_DIR").unwrap_or_else(|| "docs".to_string()),
            server_port: load_env_optional("SERVER_PORT")
                .map(|value| {
                    value
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue("SERVER_PORT".into()))
                })
                .transpose()?,
        })
    }

    /// Whether an external segmentation/topic service is configured.
    pub fn remote_configured(&self) -> bool {
        self.segment_api_url
            .as_deref()
            .map(|url| !url.trim().is_empty())
            .unwrap_or(false)
    }
}

fn load_env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Global configuration cache populated during process start.
pub static CONFIG: OnceLock<Config> = OnceLock::new();

/// Retrieve the loaded configuration, panicking if initialization has not occurred.
pub fn get_config() -> &'static Config {
    CONFIG.get().expect("Config not initialized")
}

/// Load configuration from the environment and install it in the global cache.
pub fn init_config() {
    dotenvy::dotenv().ok();
    let config = Config::from_env().expect("Failed to load config from environment");
    tracing::debug!(
        docs_dir = %config.docs_dir,
        remote_configured = config.remote_configured(),
        server_port = ?config.server_port,
        "Loaded configuration"
    );
    CONFIG.set(config).expect("Failed to set config");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_configured_rejects_blank_url() {
        let config = Config {
            segment_api_url: Some("   ".into()),
            segment_api_key: None,
            docs_dir: "docs".into(),
            server_port: None,
        };
        assert!(!config.remote_configured());

        let config = Config {
            segment_api_url: Some("http://127.0.0.1:9000/v1/segment".into()),
            segment_api_key: None,
            docs_dir: "docs".into(),
            server_port: None,
        };
        assert!(config.remote_configured());
    }
}
