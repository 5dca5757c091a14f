//! Service configuration from environment variables.

use storage::StoreConfig;

/// Top-level service configuration.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Store connection parameters.
    pub store: StoreConfig,

    /// HTTP listen port.
    pub port: u16,
}

impl ServiceConfig {
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(8000);

        Self {
            store: StoreConfig::from_env(),
            port,
        }
    }
}
