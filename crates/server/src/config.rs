//! Server configuration

use anyhow::Result;
use serde::Deserialize;

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// API server port
    #[serde(default = "default_api_port")]
    pub api_port: u16,

    /// Bind address for the API server
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Path to the trained model artifact
    #[serde(default = "default_model_path")]
    pub model_path: String,
}

fn default_api_port() -> u16 {
    8080
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_model_path() -> String {
    "model.json".to_string()
}

impl ServerConfig {
    /// Load configuration from the environment
    pub fn load() -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("RISK"))
            .build()?;

        Ok(config.try_deserialize().unwrap_or_else(|_| ServerConfig {
            api_port: default_api_port(),
            bind_address: default_bind_address(),
            model_path: default_model_path(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::load().unwrap();
        assert_eq!(config.api_port, 8080);
        assert_eq!(config.model_path, "model.json");
    }
}
