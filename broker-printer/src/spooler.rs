//! OS print-spooler access
//!
//! The spooler is a narrow foreign API: open a handle to a named printer,
//! start a document, write raw bytes, end the document, close the handle.
//! [`Spooler`] captures exactly that capability set (plus printer
//! enumeration) so the dispatch sequence in [`crate::printer`] can run
//! against a fake without a real printer or OS.

use std::sync::Arc;

use crate::error::OsCode;

/// Opaque token for an open printer connection.
///
/// Owned by a single print dispatch and moved into [`Spooler::close`] on
/// release, so a handle cannot be reused after close and is never shared
/// between concurrent submissions.
#[derive(Debug)]
pub struct SpoolHandle(pub(crate) isize);

impl SpoolHandle {
    /// Wrap a raw OS handle value (or a token, for fake spoolers).
    pub fn from_raw(raw: isize) -> Self {
        Self(raw)
    }

    /// The raw handle value.
    pub fn raw(&self) -> isize {
        self.0
    }
}

/// Access to the OS print spooler
pub trait Spooler: Send + Sync {
    /// Open a handle to the named printer
    fn open(&self, printer_name: &str) -> Result<SpoolHandle, OsCode>;

    /// Begin a RAW print document with the given display name
    fn start_document(&self, handle: &SpoolHandle, document_name: &str) -> Result<(), OsCode>;

    /// Write the buffer to the open document, returning the accepted byte count
    fn write(&self, handle: &SpoolHandle, data: &[u8]) -> Result<usize, OsCode>;

    /// End the open document
    fn end_document(&self, handle: &SpoolHandle) -> Result<(), OsCode>;

    /// Release the handle
    fn close(&self, handle: SpoolHandle);

    /// Installed printer names, in the order the OS reports them
    fn printers(&self) -> Result<Vec<String>, OsCode>;
}

/// The platform's spooler implementation
pub fn os_spooler() -> Arc<dyn Spooler> {
    #[cfg(windows)]
    {
        Arc::new(WinSpool)
    }
    #[cfg(not(windows))]
    {
        Arc::new(UnsupportedSpooler)
    }
}

#[cfg(windows)]
pub use win::WinSpool;

#[cfg(windows)]
mod win {
    use core::ffi::c_void;

    use windows::Win32::Foundation::GetLastError;
    use windows::Win32::Graphics::Printing::{
        ClosePrinter, DOC_INFO_1W, EndDocPrinter, EndPagePrinter, EnumPrintersW, OpenPrinterW,
        PRINTER_ENUM_CONNECTIONS, PRINTER_ENUM_LOCAL, PRINTER_HANDLE, PRINTER_INFO_5W,
        StartDocPrinterW, StartPagePrinter, WritePrinter,
    };
    use windows::core::{PCWSTR, PWSTR};

    use super::{OsCode, SpoolHandle, Spooler};

    fn to_wide(s: &str) -> Vec<u16> {
        s.encode_utf16().chain(std::iter::once(0)).collect()
    }

    fn last_error() -> OsCode {
        unsafe { GetLastError().0 }
    }

    fn as_raw(handle: &SpoolHandle) -> PRINTER_HANDLE {
        PRINTER_HANDLE(handle.0 as *mut c_void)
    }

    /// Win32 spooler (winspool)
    pub struct WinSpool;

    impl Spooler for WinSpool {
        fn open(&self, printer_name: &str) -> Result<SpoolHandle, OsCode> {
            unsafe {
                let mut handle = PRINTER_HANDLE::default();
                let name_w = to_wide(printer_name);

                OpenPrinterW(PCWSTR::from_raw(name_w.as_ptr()), &mut handle, None)
                    .map_err(|_| last_error())?;

                Ok(SpoolHandle(handle.0 as isize))
            }
        }

        fn start_document(&self, handle: &SpoolHandle, document_name: &str) -> Result<(), OsCode> {
            unsafe {
                let doc_name_w = to_wide(document_name);
                let datatype_w = to_wide("RAW");
                let doc_info = DOC_INFO_1W {
                    pDocName: PWSTR(doc_name_w.as_ptr() as *mut _),
                    pOutputFile: PWSTR::null(),
                    pDatatype: PWSTR(datatype_w.as_ptr() as *mut _),
                };

                if StartDocPrinterW(as_raw(handle), 1, &doc_info as *const DOC_INFO_1W) == 0 {
                    return Err(last_error());
                }

                if !StartPagePrinter(as_raw(handle)).as_bool() {
                    let code = last_error();
                    let _ = EndDocPrinter(as_raw(handle));
                    return Err(code);
                }

                Ok(())
            }
        }

        fn write(&self, handle: &SpoolHandle, data: &[u8]) -> Result<usize, OsCode> {
            unsafe {
                let mut written: u32 = 0;
                let ok = WritePrinter(
                    as_raw(handle),
                    data.as_ptr() as *const c_void,
                    data.len() as u32,
                    &mut written,
                );

                if !ok.as_bool() {
                    return Err(last_error());
                }

                Ok(written as usize)
            }
        }

        fn end_document(&self, handle: &SpoolHandle) -> Result<(), OsCode> {
            unsafe {
                let _ = EndPagePrinter(as_raw(handle));

                if !EndDocPrinter(as_raw(handle)).as_bool() {
                    return Err(last_error());
                }

                Ok(())
            }
        }

        fn close(&self, handle: SpoolHandle) {
            unsafe {
                let _ = ClosePrinter(as_raw(&handle));
            }
        }

        fn printers(&self) -> Result<Vec<String>, OsCode> {
            unsafe {
                let flags = PRINTER_ENUM_LOCAL | PRINTER_ENUM_CONNECTIONS;
                let mut needed: u32 = 0;
                let mut returned: u32 = 0;

                let _ = EnumPrintersW(flags, None, 5, None, &mut needed, &mut returned);

                if needed == 0 {
                    return Ok(Vec::new());
                }

                let mut buf: Vec<u8> = vec![0; needed as usize];
                EnumPrintersW(
                    flags,
                    None,
                    5,
                    Some(buf.as_mut_slice()),
                    &mut needed,
                    &mut returned,
                )
                .map_err(|_| last_error())?;

                let ptr = buf.as_ptr() as *const PRINTER_INFO_5W;
                let slice = std::slice::from_raw_parts(ptr, returned as usize);

                let mut result = Vec::with_capacity(slice.len());
                for info in slice {
                    if info.pPrinterName.is_null() {
                        continue;
                    }
                    result.push(PWSTR(info.pPrinterName.0).to_string().unwrap_or_default());
                }

                Ok(result)
            }
        }
    }
}

/// Fallback for platforms without a raw print spooler: reports no installed
/// printers and rejects submissions.
#[cfg(not(windows))]
pub struct UnsupportedSpooler;

// ERROR_NOT_SUPPORTED
#[cfg(not(windows))]
const NOT_SUPPORTED: OsCode = 50;

#[cfg(not(windows))]
impl Spooler for UnsupportedSpooler {
    fn open(&self, printer_name: &str) -> Result<SpoolHandle, OsCode> {
        tracing::warn!(
            printer = printer_name,
            "raw printing is not supported on this platform"
        );
        Err(NOT_SUPPORTED)
    }

    fn start_document(&self, _handle: &SpoolHandle, _document_name: &str) -> Result<(), OsCode> {
        Err(NOT_SUPPORTED)
    }

    fn write(&self, _handle: &SpoolHandle, _data: &[u8]) -> Result<usize, OsCode> {
        Err(NOT_SUPPORTED)
    }

    fn end_document(&self, _handle: &SpoolHandle) -> Result<(), OsCode> {
        Err(NOT_SUPPORTED)
    }

    fn close(&self, _handle: SpoolHandle) {}

    fn printers(&self) -> Result<Vec<String>, OsCode> {
        Ok(Vec::new())
    }
}
