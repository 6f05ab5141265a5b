use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Form, Router};
use chrono::Local;
use serde_json::json;

use super::outcome::RowError;
use super::service::{IngestError, IntakeService};
use super::store::{ApplicationStore, SuitabilityNotifier};

/// Router builder exposing the bulk upload and interactive submission
/// endpoints.
pub fn intake_router<S, N>(service: Arc<IntakeService<S, N>>) -> Router
where
    S: ApplicationStore + 'static,
    N: SuitabilityNotifier + 'static,
{
    Router::new()
        .route(
            "/api/v1/scholarships/applications/bulk",
            post(bulk_upload_handler::<S, N>),
        )
        .route(
            "/api/v1/scholarships/applications",
            post(submit_handler::<S, N>),
        )
        .with_state(service)
}

pub(crate) async fn bulk_upload_handler<S, N>(
    State(service): State<Arc<IntakeService<S, N>>>,
    mut multipart: Multipart,
) -> Response
where
    S: ApplicationStore + 'static,
    N: SuitabilityNotifier + 'static,
{
    let mut file: Option<String> = None;
    let mut override_raw: Option<String> = None;

    while let Ok(Some(field)) = multipart.next_field().await {
        match field.name() {
            Some("file") => match field.text().await {
                Ok(text) => file = Some(text),
                Err(_) => {
                    return reject(StatusCode::BAD_REQUEST, "Uploaded file is not readable text")
                }
            },
            Some("scholarship_id") => {
                override_raw = field
                    .text()
                    .await
                    .ok()
                    .map(|value| value.trim().to_string())
                    .filter(|value| !value.is_empty());
            }
            _ => {}
        }
    }

    let Some(text) = file else {
        return reject(StatusCode::BAD_REQUEST, &IngestError::MissingFile.to_string());
    };

    let override_id = match override_raw {
        None => None,
        Some(raw) => match raw.parse::<i64>() {
            Ok(id) if id > 0 => Some(id),
            _ => {
                return reject(
                    StatusCode::BAD_REQUEST,
                    &IngestError::InvalidOverrideId.to_string(),
                )
            }
        },
    };

    match service.ingest_csv(&text, override_id, Local::now().date_naive()) {
        Ok(summary) => (
            StatusCode::OK,
            axum::Json(json!({ "success": true, "summary": summary })),
        )
            .into_response(),
        Err(error) => reject(StatusCode::BAD_REQUEST, &error.to_string()),
    }
}

pub(crate) async fn submit_handler<S, N>(
    State(service): State<Arc<IntakeService<S, N>>>,
    Form(fields): Form<HashMap<String, String>>,
) -> Response
where
    S: ApplicationStore + 'static,
    N: SuitabilityNotifier + 'static,
{
    match service.submit(&fields, Local::now().date_naive()) {
        Ok(receipt) => {
            let breakdown: Vec<_> = receipt
                .suitability
                .components
                .iter()
                .map(|component| {
                    json!({
                        "key": component.criterion.key(),
                        "points": component.points,
                    })
                })
                .collect();

            (
                StatusCode::OK,
                axum::Json(json!({
                    "success": true,
                    "data": {
                        "id": receipt.application_id,
                        "suitability_percent": receipt.suitability.percent,
                        "suitability_breakdown": breakdown,
                    },
                })),
            )
                .into_response()
        }
        Err(error @ RowError::Store(_)) => {
            reject(StatusCode::INTERNAL_SERVER_ERROR, &error.to_string())
        }
        Err(error) => reject(StatusCode::UNPROCESSABLE_ENTITY, &error.to_string()),
    }
}

fn reject(status: StatusCode, message: &str) -> Response {
    (
        status,
        axum::Json(json!({ "success": false, "message": message })),
    )
        .into_response()
}
