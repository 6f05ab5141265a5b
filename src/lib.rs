//! Scholarship application intake engine.
//!
//! The crate hosts the bulk CSV ingestion pipeline, per-row eligibility
//! validation, duplicate and capacity admission control, and the
//! suitability-scoring rubric, exposed both as a library and through a small
//! axum service. Persistence and outbound mail are consumed through the
//! collaborator traits in [`workflows::intake::store`].

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
