//! # broker-printer
//!
//! Label-printer plumbing - low-level printing capabilities only.
//!
//! ## Scope
//!
//! This crate handles HOW to print:
//! - SBPL command building for SATO label printers
//! - Shift-JIS encoding for the target firmware
//! - Raw submission through the OS print spooler
//!
//! Business logic (WHAT to print, and when) stays in the broker server.
//!
//! ## Example
//!
//! ```ignore
//! use broker_printer::{encode_label, os_spooler, print_raw_async};
//!
//! let data = encode_label("BOX1", "12345");
//! print_raw_async(os_spooler(), "SATO CL4NX".into(), "Label".into(), data).await?;
//! ```

mod encoding;
mod error;
mod printer;
mod sbpl;
mod spooler;

// Re-exports
pub use encoding::to_shift_jis;
pub use error::{OsCode, PrintError, PrintResult};
pub use printer::{print_raw, print_raw_async};
pub use sbpl::{Font, SbplBuilder, Symbology, encode_label};
pub use spooler::{SpoolHandle, Spooler, os_spooler};

#[cfg(windows)]
pub use spooler::WinSpool;

#[cfg(not(windows))]
pub use spooler::UnsupportedSpooler;
