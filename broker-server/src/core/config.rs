/// Broker configuration
///
/// # Environment variables
///
/// Every field can be overridden through the environment:
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | HTTP_PORT | 5533 | loopback HTTP listener port |
/// | LOG_LEVEL | info | tracing level filter |
/// | LOG_DIR | (unset) | daily-rolling log file directory |
///
/// # Example
///
/// ```ignore
/// HTTP_PORT=8080 LOG_LEVEL=debug cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP listener port on 127.0.0.1
    pub port: u16,
    /// Log level: trace | debug | info | warn | error
    pub log_level: String,
    /// Optional directory for rolling log files
    pub log_dir: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Unset variables fall back to defaults.
    pub fn from_env() -> Self {
        Self {
            port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5533),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok(),
        }
    }

    /// Override the port, keeping everything else from the environment.
    ///
    /// Port 0 binds an ephemeral port - used by tests.
    pub fn with_port(port: u16) -> Self {
        let mut config = Self::from_env();
        config.port = port;
        config
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
