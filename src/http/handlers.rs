use axum::body::Bytes;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};

use crate::core::adjuster::PriceAdjuster;
use crate::domain::model::Summary;
use crate::http::{SERVICE_NAME, SERVICE_VERSION};
use crate::utils::error::{ProcessorError, Result};

pub async fn home_handler() -> Json<Value> {
    Json(json!({
        "status": "running",
        "service": SERVICE_NAME,
        "version": SERVICE_VERSION,
    }))
}

pub async fn process_csv_options_handler() -> Response {
    let mut response = Json(json!({"status": "ok"})).into_response();
    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("POST"),
    );
    response
}

pub async fn process_csv_handler(body: Bytes) -> Response {
    match process_request(&body) {
        Ok(payload) => {
            let mut response = (StatusCode::OK, Json(payload)).into_response();
            response.headers_mut().insert(
                header::ACCESS_CONTROL_ALLOW_ORIGIN,
                HeaderValue::from_static("*"),
            );
            response
        }
        Err(err) => error_response(err),
    }
}

fn process_request(body: &[u8]) -> Result<Value> {
    if body.is_empty() {
        return Err(ProcessorError::MissingInputError);
    }

    let payload: Value = serde_json::from_slice(body)?;
    if is_empty_payload(&payload) {
        return Err(ProcessorError::MissingInputError);
    }

    let csv_data = payload.get("csv_data").and_then(Value::as_str).unwrap_or("");
    let reduction_percentage = parse_reduction(payload.get("reduction_percentage"))?;

    let outcome = PriceAdjuster::adjust(csv_data, reduction_percentage)?;

    match &outcome.summary {
        Summary::Success { total_rows, .. } => {
            tracing::info!(
                total_rows,
                reduction_percentage,
                "processed CSV with price adjustment"
            );
        }
        Summary::Warning { warning, .. } => {
            tracing::info!(warning = warning.as_str(), "processed CSV without adjustment");
        }
    }

    Ok(json!({
        "status": "success",
        "processed_csv": outcome.processed_csv,
        "summary": outcome.summary,
    }))
}

/// Mirrors the truthiness check of the original service: a body decoding to
/// null, false, zero, an empty string, array, or object counts as no data.
fn is_empty_payload(payload: &Value) -> bool {
    match payload {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

fn parse_reduction(value: Option<&Value>) -> Result<f64> {
    match value {
        None => Ok(0.0),
        Some(Value::Number(n)) => n.as_f64().ok_or_else(|| {
            ProcessorError::processing(format!("invalid reduction_percentage: {}", n))
        }),
        Some(Value::String(s)) => s.trim().parse::<f64>().map_err(|_| {
            ProcessorError::processing(format!("invalid reduction_percentage: '{}'", s))
        }),
        Some(other) => Err(ProcessorError::processing(format!(
            "invalid reduction_percentage: {}",
            other
        ))),
    }
}

fn error_response(err: ProcessorError) -> Response {
    match err {
        ProcessorError::MissingInputError => {
            tracing::warn!("request rejected: no data provided");
            (
                StatusCode::BAD_REQUEST,
                Json(json!({"error": "No data provided"})),
            )
                .into_response()
        }
        other => {
            tracing::error!("CSV processing failed: {}", other);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"status": "error", "error": other.to_string()})),
            )
                .into_response()
        }
    }
}
