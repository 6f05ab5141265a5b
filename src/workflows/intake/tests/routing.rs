use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use serde_json::Value;
use tower::ServiceExt;

use super::common::*;
use crate::workflows::intake::router::{intake_router, submit_handler};
use crate::workflows::intake::service::IntakeService;

#[tokio::test]
async fn submit_handler_returns_unprocessable_for_row_errors() {
    let (service, _, _) = build_service(vec![open_rule(1)]);
    let service = Arc::new(service);

    // Unknown scholarship id: a row-scoped rejection, not a server fault.
    let response = submit_handler(
        State(service),
        axum::Form(form(&[
            ("full_name", "Amina Wanjiru"),
            ("email_address", "amina@example.com"),
            ("scholarship_id", "42"),
            ("date_of_birth", "2004-05-17"),
        ])),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert_eq!(payload.get("success"), Some(&Value::Bool(false)));
    assert!(payload
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .contains("not found"));
}

#[tokio::test]
async fn submit_handler_returns_internal_error_on_store_failure() {
    let service = Arc::new(IntakeService::new(
        Arc::new(UnavailableStore),
        Arc::new(CountingNotifier::default()),
    ));

    let response = submit_handler(
        State(service),
        axum::Form(form(&[
            ("full_name", "Amina Wanjiru"),
            ("email_address", "amina@example.com"),
            ("scholarship_id", "1"),
            ("date_of_birth", "2004-05-17"),
        ])),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn submit_route_returns_the_scoring_payload() {
    let (service, _, _) = build_service(vec![open_rule(1)]);
    let router = intake_router(Arc::new(service));

    let body = "fullName=Amina+Wanjiru&email=amina%40example.com&scholarshipId=1&dob=2004-05-17";
    let response = router
        .oneshot(
            axum::http::Request::post("/api/v1/scholarships/applications")
                .header(
                    axum::http::header::CONTENT_TYPE,
                    "application/x-www-form-urlencoded",
                )
                .body(axum::body::Body::from(body))
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload.get("success"), Some(&Value::Bool(true)));

    let data = payload.get("data").expect("data payload");
    assert!(data.get("id").and_then(Value::as_i64).is_some());
    let percent = data
        .get("suitability_percent")
        .and_then(Value::as_u64)
        .expect("percent");
    assert!(percent <= 100);
    let breakdown = data
        .get("suitability_breakdown")
        .and_then(Value::as_array)
        .expect("breakdown");
    assert_eq!(breakdown.len(), 7);
    assert_eq!(
        breakdown[0].get("key").and_then(Value::as_str),
        Some("academic_level")
    );
}

#[tokio::test]
async fn bulk_route_processes_multipart_uploads() {
    let (service, _, _) = build_service(vec![open_rule(1)]);
    let router = intake_router(Arc::new(service));

    let csv = csv_upload(&[
        "Amina Wanjiru,amina@example.com,2004-05-17,1,,",
        "Brian Otieno,amina@example.com,2003-11-02,1,,",
    ]);
    let boundary = "intake-test-boundary";
    let body = format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"batch.csv\"\r\nContent-Type: text/csv\r\n\r\n{csv}\r\n--{boundary}--\r\n"
    );

    let response = router
        .oneshot(
            axum::http::Request::post("/api/v1/scholarships/applications/bulk")
                .header(
                    axum::http::header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={boundary}"),
                )
                .body(axum::body::Body::from(body))
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let summary = payload.get("summary").expect("summary payload");
    assert_eq!(summary.get("inserted").and_then(Value::as_u64), Some(1));
    assert_eq!(summary.get("duplicates").and_then(Value::as_u64), Some(1));
    assert_eq!(summary.get("errors").and_then(Value::as_u64), Some(0));
}

#[tokio::test]
async fn bulk_route_requires_a_file_part() {
    let (service, _, _) = build_service(vec![open_rule(1)]);
    let router = intake_router(Arc::new(service));

    let boundary = "intake-test-boundary";
    let body = format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"scholarship_id\"\r\n\r\n1\r\n--{boundary}--\r\n"
    );

    let response = router
        .oneshot(
            axum::http::Request::post("/api/v1/scholarships/applications/bulk")
                .header(
                    axum::http::header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={boundary}"),
                )
                .body(axum::body::Body::from(body))
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert_eq!(
        payload.get("message").and_then(Value::as_str),
        Some("No CSV file was uploaded")
    );
}
