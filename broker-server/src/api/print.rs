//! Print submission handlers
//!
//! Both endpoints report the print outcome in the response body with status
//! 200; only request-shape problems (malformed JSON, bad base64) are HTTP
//! errors.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use base64::Engine;
use serde::{Deserialize, Serialize};
use tracing::warn;

use broker_printer::{encode_label, print_raw_async};

use crate::core::{ServiceError, ServiceResult, ServiceState};

/// Document name shown in the spooler queue for label jobs
const LABEL_DOCUMENT_NAME: &str = "Label";

/// POST /print request body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawPrintRequest {
    pub printer_name: String,
    pub document_name: String,
    /// UTF-8 text, or base64 when `IsBase64` is set
    pub data: String,
    pub is_base64: bool,
}

/// POST /print-sato request body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LabelPrintRequest {
    pub printer_name: String,
    pub title: String,
    pub barcode: String,
}

/// Outcome reported to the caller, print failures included
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PrintOutcome {
    pub success: bool,
    pub message: String,
}

impl PrintOutcome {
    fn ok() -> Self {
        Self {
            success: true,
            message: "OK".to_string(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// POST /print - submit a raw byte payload
pub async fn raw(
    State(state): State<ServiceState>,
    payload: Result<Json<RawPrintRequest>, JsonRejection>,
) -> ServiceResult<Json<PrintOutcome>> {
    let Json(request) = payload.map_err(|e| ServiceError::Parse(e.body_text()))?;

    let data = if request.is_base64 {
        base64::engine::general_purpose::STANDARD.decode(request.data.as_bytes())?
    } else {
        request.data.into_bytes()
    };

    Ok(Json(
        dispatch(&state, request.printer_name, request.document_name, data).await,
    ))
}

/// POST /print-sato - encode a title/barcode label and submit it
pub async fn label(
    State(state): State<ServiceState>,
    payload: Result<Json<LabelPrintRequest>, JsonRejection>,
) -> ServiceResult<Json<PrintOutcome>> {
    let Json(request) = payload.map_err(|e| ServiceError::Parse(e.body_text()))?;

    let data = encode_label(&request.title, &request.barcode);

    Ok(Json(
        dispatch(
            &state,
            request.printer_name,
            LABEL_DOCUMENT_NAME.to_string(),
            data,
        )
        .await,
    ))
}

/// Hand the buffer to the spooler and fold the result into the outcome body.
async fn dispatch(
    state: &ServiceState,
    printer_name: String,
    document_name: String,
    data: Vec<u8>,
) -> PrintOutcome {
    match print_raw_async(state.spooler.clone(), printer_name, document_name, data).await {
        Ok(()) => PrintOutcome::ok(),
        Err(e) => {
            warn!(error = %e, "print dispatch failed");
            PrintOutcome::failure(e.to_string())
        }
    }
}
