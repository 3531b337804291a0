// Configuration module entry point
// Loads gateway configuration and holds the shared runtime state

#[cfg(not(target_arch = "wasm32"))]
mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
#[cfg(not(target_arch = "wasm32"))]
pub use state::AppState;
pub use types::{Config, HttpConfig, LoggingConfig, OEmbedConfig, PerformanceConfig, ServerConfig};

/// Default config file name (without extension)
pub const DEFAULT_CONFIG_PATH: &str = "config";

/// Environment prefix, e.g. `GATEWAY_SERVER__PORT=8080`
const ENV_PREFIX: &str = "GATEWAY";

impl Config {
    /// Load configuration from specified file path (without extension)
    /// Missing files are fine; environment variables override file values
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = with_defaults(config::Config::builder())?
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Built-in defaults only, no file or environment sources
    pub fn defaults() -> Result<Self, config::ConfigError> {
        with_defaults(config::Config::builder())?
            .build()?
            .try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

fn with_defaults(
    builder: config::ConfigBuilder<config::builder::DefaultState>,
) -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError> {
    builder
        .set_default("server.host", "127.0.0.1")?
        .set_default("server.port", 3000)?
        .set_default("logging.level", "info")?
        .set_default("logging.access_log", true)?
        .set_default("logging.access_log_format", "combined")?
        .set_default("performance.keep_alive_timeout", 75)?
        .set_default("performance.read_timeout", 30)?
        .set_default("performance.write_timeout", 30)?
        .set_default("http.server_name", "PageGateway/1.0")?
        .set_default("http.max_body_size", 10_485_760)? // 10MB
        .set_default("oembed.endpoint", "https://noembed.com/embed")?
        .set_default("oembed.timeout_secs", 10)
}
