//! Shared request state

use std::sync::Arc;

use broker_printer::Spooler;

/// State cloned into every handler.
///
/// The spooler is the only thing requests share; the broker itself holds no
/// mutable cross-request state beyond the listener slot in
/// [`crate::core::PrintBroker`].
#[derive(Clone)]
pub struct ServiceState {
    pub spooler: Arc<dyn Spooler>,
}

impl ServiceState {
    pub fn new(spooler: Arc<dyn Spooler>) -> Self {
        Self { spooler }
    }
}

impl std::fmt::Debug for ServiceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceState")
            .field("spooler", &"<dyn Spooler>")
            .finish()
    }
}
