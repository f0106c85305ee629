//! Printer enumeration handler

use axum::Json;
use axum::extract::State;

use crate::core::{ServiceError, ServiceResult, ServiceState};

/// GET /printers - installed printer names, in the order the OS reports them
pub async fn list(State(state): State<ServiceState>) -> ServiceResult<Json<Vec<String>>> {
    let spooler = state.spooler.clone();

    let names = tokio::task::spawn_blocking(move || spooler.printers())
        .await
        .map_err(|e| ServiceError::Internal(format!("enumeration task failed: {e}")))?
        .map_err(ServiceError::Enumerate)?;

    Ok(Json(names))
}
