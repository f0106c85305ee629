//! Raw print dispatch
//!
//! Submits an opaque byte buffer to a named printer through the spooler
//! lifecycle: open, start document, write, end document, close. Cleanup is
//! unconditional — the handle is released on every exit path.

use std::sync::Arc;

use tracing::info;

use crate::error::{PrintError, PrintResult};
use crate::spooler::{SpoolHandle, Spooler};

/// Ends the document and releases the handle when dropped, so no failure
/// (or panic) between open and close can leak the printer handle.
struct SpoolGuard<'a> {
    spooler: &'a dyn Spooler,
    handle: Option<SpoolHandle>,
    document_open: bool,
}

impl<'a> SpoolGuard<'a> {
    fn open(spooler: &'a dyn Spooler, printer_name: &str) -> PrintResult<Self> {
        let handle = spooler.open(printer_name).map_err(PrintError::OpenFailed)?;
        Ok(Self {
            spooler,
            handle: Some(handle),
            document_open: false,
        })
    }

    fn handle(&self) -> &SpoolHandle {
        // Some until finish() consumes the guard
        self.handle.as_ref().expect("spool handle already released")
    }

    fn start_document(&mut self, document_name: &str) -> PrintResult<()> {
        self.spooler
            .start_document(self.handle(), document_name)
            .map_err(PrintError::StartFailed)?;
        self.document_open = true;
        Ok(())
    }

    fn write(&self, data: &[u8]) -> PrintResult<()> {
        let written = self
            .spooler
            .write(self.handle(), data)
            .map_err(PrintError::WriteFailed)?;

        if written != data.len() {
            return Err(PrintError::Unexpected(format!(
                "short write: {written} of {} bytes accepted",
                data.len()
            )));
        }

        Ok(())
    }

    /// End the document and release the handle, surfacing an end failure.
    fn finish(mut self) -> PrintResult<()> {
        let Some(handle) = self.handle.take() else {
            return Ok(());
        };

        let ended = if self.document_open {
            self.spooler.end_document(&handle)
        } else {
            Ok(())
        };
        self.document_open = false;
        self.spooler.close(handle);

        ended.map_err(|code| PrintError::Unexpected(format!("EndDocPrinter failed: os error {code}")))
    }
}

impl Drop for SpoolGuard<'_> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            if self.document_open {
                let _ = self.spooler.end_document(&handle);
            }
            self.spooler.close(handle);
        }
    }
}

/// Submit a raw byte buffer to the named printer.
///
/// Runs the full spooler lifecycle and maps each failing step to its own
/// error variant. The handle never outlives the call, whatever the path.
pub fn print_raw(
    spooler: &dyn Spooler,
    printer_name: &str,
    document_name: &str,
    data: &[u8],
) -> PrintResult<()> {
    let mut job = SpoolGuard::open(spooler, printer_name)?;

    job.start_document(document_name)?;
    job.write(data)?;
    job.finish()?;

    info!(
        printer = printer_name,
        bytes = data.len(),
        "print job submitted"
    );
    Ok(())
}

/// Submit a print job from async context.
///
/// The spooler write can block for the duration of a physical print job,
/// so the whole sequence runs on the blocking pool.
pub async fn print_raw_async(
    spooler: Arc<dyn Spooler>,
    printer_name: String,
    document_name: String,
    data: Vec<u8>,
) -> PrintResult<()> {
    tokio::task::spawn_blocking(move || {
        print_raw(spooler.as_ref(), &printer_name, &document_name, &data)
    })
    .await
    .map_err(|e| PrintError::Unexpected(format!("print task join failed: {e}")))?
}
