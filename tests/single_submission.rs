//! End-to-end specifications for the interactive submission endpoint:
//! lenient field resolution, admission, and the suitability payload.

use std::sync::Arc;

use serde_json::Value;
use tower::ServiceExt;

use scholarship_intake::workflows::intake::{
    intake_router, IntakeService, LoggingNotifier, MemoryStore, ScholarshipRule,
    ScholarshipStatus, SuitabilityCriterion,
};

fn scholarship(id: i64) -> ScholarshipRule {
    ScholarshipRule {
        id,
        name: format!("Scholarship {id}"),
        academic_level: Some("undergraduate".to_string()),
        min_gpa: Some(3.0),
        capacity: None,
        status: ScholarshipStatus::Active,
        application_deadline: None,
        field_of_study: Some("Computer Science".to_string()),
        country: Some("Kenya".to_string()),
    }
}

fn router_with(rules: Vec<ScholarshipRule>) -> axum::Router {
    let store = Arc::new(MemoryStore::with_scholarships(rules));
    let service = IntakeService::new(store, Arc::new(LoggingNotifier));
    intake_router(Arc::new(service))
}

fn form_request(body: &str) -> axum::http::Request<axum::body::Body> {
    axum::http::Request::post("/api/v1/scholarships/applications")
        .header(
            axum::http::header::CONTENT_TYPE,
            "application/x-www-form-urlencoded",
        )
        .body(axum::body::Body::from(body.to_string()))
        .expect("request builds")
}

async fn json_body(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

#[tokio::test]
async fn camel_case_forms_are_admitted_and_scored() {
    let router = router_with(vec![scholarship(1)]);

    let body = "fullName=Amina+Wanjiru\
&email=amina%40example.com\
&scholarshipId=1\
&dob=2004-05-17\
&academicLevel=undergraduate\
&gpa=3.5\
&intendedMajor=Computer+Science\
&country=Kenya";

    let response = router
        .oneshot(form_request(body))
        .await
        .expect("route executes");
    assert_eq!(response.status(), axum::http::StatusCode::OK);

    let payload = json_body(response).await;
    assert_eq!(payload.get("success"), Some(&Value::Bool(true)));

    let data = payload.get("data").expect("data");
    assert_eq!(data.get("id").and_then(Value::as_i64), Some(1));

    let percent = data
        .get("suitability_percent")
        .and_then(Value::as_u64)
        .expect("percent");
    assert!(percent <= 100);

    let breakdown = data
        .get("suitability_breakdown")
        .and_then(Value::as_array)
        .expect("breakdown");
    let keys: Vec<&str> = breakdown
        .iter()
        .filter_map(|entry| entry.get("key").and_then(Value::as_str))
        .collect();
    let expected: Vec<&str> = SuitabilityCriterion::ordered()
        .iter()
        .map(|criterion| criterion.key())
        .collect();
    assert_eq!(keys, expected);

    for entry in breakdown {
        let points = entry.get("points").and_then(Value::as_u64).expect("points");
        assert!(points <= 25);
    }
}

#[tokio::test]
async fn below_minimum_gpa_is_rejected_before_scoring() {
    let router = router_with(vec![scholarship(1)]);

    let body = "fullName=Amina+Wanjiru\
&email=amina%40example.com\
&scholarshipId=1\
&dob=2004-05-17\
&academicLevel=undergraduate\
&gpa_academic_performance=2.9";

    let response = router
        .oneshot(form_request(body))
        .await
        .expect("route executes");

    assert_eq!(
        response.status(),
        axum::http::StatusCode::UNPROCESSABLE_ENTITY
    );
    let payload = json_body(response).await;
    assert_eq!(payload.get("success"), Some(&Value::Bool(false)));
    assert!(payload
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .contains("GPA"));
}

#[tokio::test]
async fn unknown_scholarships_are_rejected() {
    let router = router_with(vec![scholarship(1)]);

    let body = "fullName=Amina+Wanjiru\
&email=amina%40example.com\
&scholarshipId=42\
&dob=2004-05-17";

    let response = router
        .oneshot(form_request(body))
        .await
        .expect("route executes");

    assert_eq!(
        response.status(),
        axum::http::StatusCode::UNPROCESSABLE_ENTITY
    );
}

#[tokio::test]
async fn missing_required_fields_are_named() {
    let router = router_with(vec![scholarship(1)]);

    let response = router
        .oneshot(form_request("fullName=Amina+Wanjiru&scholarshipId=1"))
        .await
        .expect("route executes");

    assert_eq!(
        response.status(),
        axum::http::StatusCode::UNPROCESSABLE_ENTITY
    );
    let payload = json_body(response).await;
    assert!(payload
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .contains("email_address"));
}
