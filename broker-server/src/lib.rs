//! Print Broker - loopback HTTP bridge to the OS print spooler
//!
//! # Overview
//!
//! A small local service for web front-ends that need to reach industrial
//! label printers: it enumerates installed printers, accepts raw byte
//! payloads, and renders title/barcode pairs into SBPL label jobs.
//!
//! # Module structure
//!
//! ```text
//! broker-server/src/
//! ├── core/          # config, state, lifecycle, errors
//! ├── api/           # HTTP routes and handlers
//! └── utils/         # logging setup
//! ```

pub mod api;
pub mod core;
pub mod utils;

// Re-export public types
pub use self::core::{Config, PrintBroker, ServiceError, ServiceState};
pub use utils::{init_logger, init_logger_with_file};

/// Load .env overrides and initialize logging from the environment.
pub fn setup_environment() {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());
}
