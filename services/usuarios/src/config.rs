//! Service configuration
//!
//! Listen address comes from the environment; the status metadata is fixed at
//! build time and assembled once at startup.

use config::{Config, ConfigError, Environment};
use serde::{Deserialize, Serialize};

/// Listen address configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
}

impl ServiceConfig {
    /// Load configuration from environment variables
    ///
    /// # Environment Variables
    /// - `PORT`: listen port (default: 3000)
    /// - `USUARIOS_PORT`: listen port, used when `PORT` is unset
    /// - `USUARIOS_HOST`: listen host (default: "0.0.0.0")
    pub fn from_env() -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 3000)?
            .add_source(Environment::with_prefix("USUARIOS").try_parsing(true))
            .set_override_option("port", std::env::var("PORT").ok())?
            .build()?
            .try_deserialize()
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Static metadata served by `GET /estado`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInfo {
    pub name_system: String,
    pub version: String,
    pub developer: String,
    pub email: String,
    pub mensaje: String,
}

impl Default for ServiceInfo {
    fn default() -> Self {
        Self {
            name_system: "api-users".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            developer: "Jadiel Josue Duran Gomez".to_string(),
            email: "djayoso@gmail.com".to_string(),
            mensaje: "API REST elaborada en Rust".to_string(),
        }
    }
}
