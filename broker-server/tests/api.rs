//! Router-level tests driving the API against a scripted spooler

use std::collections::HashMap;
use std::sync::atomic::{AtomicIsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use broker_printer::{OsCode, SpoolHandle, Spooler};
use broker_server::ServiceState;
use broker_server::api::build_router;

#[derive(Debug, Clone)]
struct Job {
    printer: String,
    document: String,
    data: Vec<u8>,
}

/// In-memory spooler: records completed jobs, fails to open any printer
/// whose name starts with "Broken".
#[derive(Default)]
struct ScriptedSpooler {
    installed: Vec<String>,
    counter: AtomicIsize,
    open_jobs: Mutex<HashMap<isize, Job>>,
    completed: Mutex<Vec<Job>>,
}

impl ScriptedSpooler {
    fn with_installed(installed: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            installed: installed.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        })
    }

    fn completed(&self) -> Vec<Job> {
        self.completed.lock().unwrap().clone()
    }
}

impl Spooler for ScriptedSpooler {
    fn open(&self, printer_name: &str) -> Result<SpoolHandle, OsCode> {
        if printer_name.starts_with("Broken") {
            // ERROR_INVALID_PRINTER_NAME
            return Err(1801);
        }
        let token = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        self.open_jobs.lock().unwrap().insert(
            token,
            Job {
                printer: printer_name.to_string(),
                document: String::new(),
                data: Vec::new(),
            },
        );
        Ok(SpoolHandle::from_raw(token))
    }

    fn start_document(&self, handle: &SpoolHandle, document_name: &str) -> Result<(), OsCode> {
        let mut jobs = self.open_jobs.lock().unwrap();
        jobs.get_mut(&handle.raw()).expect("unknown handle").document = document_name.to_string();
        Ok(())
    }

    fn write(&self, handle: &SpoolHandle, data: &[u8]) -> Result<usize, OsCode> {
        let mut jobs = self.open_jobs.lock().unwrap();
        jobs.get_mut(&handle.raw())
            .expect("unknown handle")
            .data
            .extend_from_slice(data);
        Ok(data.len())
    }

    fn end_document(&self, _handle: &SpoolHandle) -> Result<(), OsCode> {
        Ok(())
    }

    fn close(&self, handle: SpoolHandle) {
        if let Some(job) = self.open_jobs.lock().unwrap().remove(&handle.raw()) {
            self.completed.lock().unwrap().push(job);
        }
    }

    fn printers(&self) -> Result<Vec<String>, OsCode> {
        Ok(self.installed.clone())
    }
}

fn router_with(spooler: Arc<ScriptedSpooler>) -> Router {
    build_router(ServiceState::new(spooler))
}

async fn send(router: Router, request: Request<Body>) -> (StatusCode, http::HeaderMap, Vec<u8>) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.into_body().collect().await.unwrap().to_bytes().to_vec();
    (status, headers, body)
}

fn post_json(path: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn count_occurrences(haystack: &[u8], needle: &[u8]) -> usize {
    haystack.windows(needle.len()).filter(|w| *w == needle).count()
}

#[tokio::test]
async fn test_printers_is_a_json_array() {
    let spooler = ScriptedSpooler::with_installed(&["SATO CL4NX", "Office Laser"]);
    let request = Request::builder().uri("/printers").body(Body::empty()).unwrap();

    let (status, _, body) = send(router_with(spooler), request).await;

    assert_eq!(status, StatusCode::OK);
    let value: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(value, json!(["SATO CL4NX", "Office Laser"]));
}

#[tokio::test]
async fn test_printers_empty_is_still_an_array() {
    let spooler = ScriptedSpooler::with_installed(&[]);
    let request = Request::builder().uri("/printers").body(Body::empty()).unwrap();

    let (status, _, body) = send(router_with(spooler), request).await;

    assert_eq!(status, StatusCode::OK);
    let value: Value = serde_json::from_slice(&body).unwrap();
    assert!(value.is_array());
    assert_eq!(value, json!([]));
}

#[tokio::test]
async fn test_print_base64_payload_is_decoded() {
    let spooler = ScriptedSpooler::with_installed(&["Office Laser"]);
    let request = post_json(
        "/print",
        json!({
            "PrinterName": "Office Laser",
            "DocumentName": "Greeting",
            "Data": "SGVsbG8=",
            "IsBase64": true,
        }),
    );

    let (status, _, body) = send(router_with(spooler.clone()), request).await;

    assert_eq!(status, StatusCode::OK);
    let value: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(value["Success"], json!(true));
    assert_eq!(value["Message"], json!("OK"));

    let jobs = spooler.completed();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].printer, "Office Laser");
    assert_eq!(jobs[0].document, "Greeting");
    assert_eq!(jobs[0].data, b"Hello");
}

#[tokio::test]
async fn test_print_text_payload_passes_through_as_utf8() {
    let spooler = ScriptedSpooler::with_installed(&["Office Laser"]);
    let request = post_json(
        "/print",
        json!({
            "PrinterName": "Office Laser",
            "DocumentName": "Note",
            "Data": "plain text",
            "IsBase64": false,
        }),
    );

    send(router_with(spooler.clone()), request).await;

    assert_eq!(spooler.completed()[0].data, b"plain text");
}

#[tokio::test]
async fn test_print_invalid_base64_is_500() {
    let spooler = ScriptedSpooler::with_installed(&["Office Laser"]);
    let request = post_json(
        "/print",
        json!({
            "PrinterName": "Office Laser",
            "DocumentName": "Doc",
            "Data": "!!not base64!!",
            "IsBase64": true,
        }),
    );

    let (status, _, body) = send(router_with(spooler.clone()), request).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(String::from_utf8(body).unwrap().contains("base64"));
    assert!(spooler.completed().is_empty());
}

#[tokio::test]
async fn test_print_malformed_json_is_500() {
    let spooler = ScriptedSpooler::with_installed(&[]);
    let request = Request::builder()
        .method("POST")
        .uri("/print")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let (status, _, body) = send(router_with(spooler), request).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!body.is_empty());
}

#[tokio::test]
async fn test_print_missing_field_is_500() {
    let spooler = ScriptedSpooler::with_installed(&[]);
    let request = post_json("/print", json!({ "PrinterName": "Office Laser" }));

    let (status, _, _) = send(router_with(spooler), request).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_print_failure_is_reported_in_body_with_200() {
    let spooler = ScriptedSpooler::with_installed(&[]);
    let request = post_json(
        "/print",
        json!({
            "PrinterName": "Broken Printer",
            "DocumentName": "Doc",
            "Data": "hi",
            "IsBase64": false,
        }),
    );

    let (status, _, body) = send(router_with(spooler), request).await;

    assert_eq!(status, StatusCode::OK);
    let value: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(value["Success"], json!(false));
    assert!(value["Message"].as_str().unwrap().contains("1801"));
}

#[tokio::test]
async fn test_print_sato_submits_encoded_label() {
    let spooler = ScriptedSpooler::with_installed(&["SATO CL4NX"]);
    let request = post_json(
        "/print-sato",
        json!({
            "PrinterName": "SATO CL4NX",
            "Title": "BOX1",
            "Barcode": "12345",
        }),
    );

    let (status, _, body) = send(router_with(spooler.clone()), request).await;

    assert_eq!(status, StatusCode::OK);
    let value: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(value["Success"], json!(true));

    let jobs = spooler.completed();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].document, "Label");

    let data = &jobs[0].data;
    assert_eq!(data.first(), Some(&0x02));
    assert_eq!(data.last(), Some(&0x03));
    assert_eq!(count_occurrences(data, b"*12345*"), 2);
    assert_eq!(count_occurrences(data, b"BOX1"), 1);
}

#[tokio::test]
async fn test_undefined_routes_are_404_not_found() {
    let spooler = ScriptedSpooler::with_installed(&[]);

    let request = Request::builder()
        .method("DELETE")
        .uri("/print")
        .body(Body::empty())
        .unwrap();
    let (status, _, body) = send(router_with(spooler.clone()), request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, b"Not found");

    let request = Request::builder().uri("/nope").body(Body::empty()).unwrap();
    let (status, _, body) = send(router_with(spooler), request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, b"Not found");
}

#[tokio::test]
async fn test_options_anywhere_is_200_with_empty_body() {
    let spooler = ScriptedSpooler::with_installed(&[]);

    for path in ["/print", "/printers", "/anything"] {
        let request = Request::builder()
            .method("OPTIONS")
            .uri(path)
            .body(Body::empty())
            .unwrap();
        let (status, _, body) = send(router_with(spooler.clone()), request).await;
        assert_eq!(status, StatusCode::OK, "OPTIONS {path}");
        assert!(body.is_empty(), "OPTIONS {path}");
    }
}

#[tokio::test]
async fn test_cors_preflight_allows_any_origin() {
    let spooler = ScriptedSpooler::with_installed(&[]);
    let request = Request::builder()
        .method("OPTIONS")
        .uri("/print")
        .header(header::ORIGIN, "http://example.com")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();

    let (status, headers, _) = send(router_with(spooler), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    let methods = headers[header::ACCESS_CONTROL_ALLOW_METHODS].to_str().unwrap();
    assert!(methods.contains("POST"));
}

#[tokio::test]
async fn test_cors_headers_on_regular_and_404_responses() {
    let spooler = ScriptedSpooler::with_installed(&[]);

    let request = Request::builder()
        .uri("/printers")
        .header(header::ORIGIN, "http://example.com")
        .body(Body::empty())
        .unwrap();
    let (_, headers, _) = send(router_with(spooler.clone()), request).await;
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");

    let request = Request::builder()
        .uri("/nope")
        .header(header::ORIGIN, "http://example.com")
        .body(Body::empty())
        .unwrap();
    let (status, headers, _) = send(router_with(spooler), request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}

#[tokio::test]
async fn test_concurrent_jobs_to_different_printers_are_independent() {
    let spooler = ScriptedSpooler::with_installed(&["Office Laser"]);
    let router = router_with(spooler.clone());

    let good = post_json(
        "/print",
        json!({
            "PrinterName": "Office Laser",
            "DocumentName": "Doc A",
            "Data": "first",
            "IsBase64": false,
        }),
    );
    let bad = post_json(
        "/print",
        json!({
            "PrinterName": "Broken Lab",
            "DocumentName": "Doc B",
            "Data": "second",
            "IsBase64": false,
        }),
    );

    let (good_result, bad_result) =
        tokio::join!(send(router.clone(), good), send(router, bad));

    let (status, _, body) = good_result;
    assert_eq!(status, StatusCode::OK);
    let value: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(value["Success"], json!(true));

    let (status, _, body) = bad_result;
    assert_eq!(status, StatusCode::OK);
    let value: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(value["Success"], json!(false));

    let jobs = spooler.completed();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].printer, "Office Laser");
    assert_eq!(jobs[0].data, b"first");
}
