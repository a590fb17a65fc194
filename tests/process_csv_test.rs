use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use csv_price_processor::{build_router, ServerConfig};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

fn test_app() -> Router {
    build_router(ServerConfig {
        port: 8080,
        bind_address: "127.0.0.1".to_string(),
        max_body_bytes: 1024 * 1024,
        verbose: false,
        log_json: false,
    })
}

async fn post_json(body: &str) -> (StatusCode, Option<String>, Value) {
    let response = test_app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/process-csv")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let cors = response
        .headers()
        .get("access-control-allow-origin")
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value: Value = serde_json::from_slice(&bytes).unwrap();
    (status, cors, value)
}

#[tokio::test]
async fn test_health_check() {
    let response = test_app()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(
        value,
        json!({
            "status": "running",
            "service": "CSV Processor for Dify",
            "version": "1.0",
        })
    );
}

#[tokio::test]
async fn test_preflight_cors_headers() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/process-csv")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(headers.get("access-control-allow-origin").unwrap(), "*");
    assert_eq!(
        headers.get("access-control-allow-headers").unwrap(),
        "Content-Type"
    );
    assert_eq!(headers.get("access-control-allow-methods").unwrap(), "POST");

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(value, json!({"status": "ok"}));
}

#[tokio::test]
async fn test_process_csv_success() {
    let request = json!({
        "csv_data": "price\n100\n200\n300",
        "reduction_percentage": 10,
    });
    let (status, cors, value) = post_json(&request.to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(cors.as_deref(), Some("*"));
    assert_eq!(value["status"], "success");

    let summary = &value["summary"];
    assert_eq!(summary["total_rows"], 3);
    assert_eq!(summary["reduction_percentage"], 10.0);
    assert_eq!(summary["average_original_price"], 200.0);
    assert_eq!(summary["average_new_price"], 180.0);

    let csv = value["processed_csv"].as_str().unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(
        lines[0],
        "price,original_price,new_price,reduction_rate,updated_at"
    );
    assert!(lines[1].starts_with("100,100,90,10.0%,"));
    assert!(lines[2].starts_with("200,200,180,10.0%,"));
    assert!(lines[3].starts_with("300,300,270,10.0%,"));
}

#[tokio::test]
async fn test_reduction_percentage_as_string_is_coerced() {
    let request = json!({
        "csv_data": "price\n100",
        "reduction_percentage": "50",
    });
    let (status, _, value) = post_json(&request.to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["summary"]["average_new_price"], 50.0);
}

#[tokio::test]
async fn test_missing_reduction_percentage_defaults_to_zero() {
    let request = json!({"csv_data": "price\n100"});
    let (status, _, value) = post_json(&request.to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["summary"]["average_new_price"], 100.0);
}

#[tokio::test]
async fn test_missing_price_column_returns_warning_summary() {
    let request = json!({
        "csv_data": "id,name,qty\n1,widget,3",
        "reduction_percentage": 25,
    });
    let (status, _, value) = post_json(&request.to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["status"], "success");
    assert_eq!(
        value["summary"],
        json!({
            "warning": "Price column not found",
            "available_columns": ["id", "name", "qty"],
        })
    );
    assert_eq!(value["processed_csv"], "id,name,qty\n1,widget,3\n");
}

#[tokio::test]
async fn test_empty_body_is_rejected() {
    let (status, _, value) = post_json("").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(value, json!({"error": "No data provided"}));
}

#[tokio::test]
async fn test_null_body_is_rejected() {
    let (status, _, value) = post_json("null").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(value, json!({"error": "No data provided"}));
}

#[tokio::test]
async fn test_empty_object_body_is_rejected() {
    let (status, _, value) = post_json("{}").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(value, json!({"error": "No data provided"}));
}

#[tokio::test]
async fn test_ragged_csv_is_a_server_error() {
    let request = json!({
        "csv_data": "a,b\n1,2,3",
        "reduction_percentage": 10,
    });
    let (status, _, value) = post_json(&request.to_string()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(value["status"], "error");
    assert!(value["error"].as_str().unwrap().contains("CSV parse error"));
}

#[tokio::test]
async fn test_missing_csv_data_is_a_server_error() {
    let request = json!({"reduction_percentage": 10});
    let (status, _, value) = post_json(&request.to_string()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(value["status"], "error");
}

#[tokio::test]
async fn test_invalid_json_body_is_a_server_error() {
    let (status, _, value) = post_json("not json at all").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(value["status"], "error");
}

#[tokio::test]
async fn test_invalid_reduction_percentage_is_a_server_error() {
    let request = json!({
        "csv_data": "price\n100",
        "reduction_percentage": null,
    });
    let (status, _, value) = post_json(&request.to_string()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(value["status"], "error");
}

#[tokio::test]
async fn test_candidate_priority_over_the_wire() {
    let request = json!({
        "csv_data": "price,Price\n100,999",
        "reduction_percentage": 50,
    });
    let (status, _, value) = post_json(&request.to_string()).await;

    assert_eq!(status, StatusCode::OK);
    let csv = value["processed_csv"].as_str().unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert!(lines[1].starts_with("100,999,100,50,50.0%,"));
}
