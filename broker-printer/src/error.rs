//! Error types for the printer library

use thiserror::Error;

/// Raw OS error code as reported by the print spooler.
pub type OsCode = u32;

/// Printer error types
///
/// One variant per spooler lifecycle step, carrying the OS error code,
/// plus a catch-all for faults outside the step taxonomy.
#[derive(Debug, Error)]
pub enum PrintError {
    /// Opening a handle to the named printer failed
    #[error("OpenPrinter failed: os error {0}")]
    OpenFailed(OsCode),

    /// Starting the print document failed
    #[error("StartDocPrinter failed: os error {0}")]
    StartFailed(OsCode),

    /// Writing the payload to the spooler failed
    #[error("WritePrinter failed: os error {0}")]
    WriteFailed(OsCode),

    /// Any other fault during the submission sequence
    #[error("print failed: {0}")]
    Unexpected(String),
}

/// Result type for printer operations
pub type PrintResult<T> = Result<T, PrintError>;
