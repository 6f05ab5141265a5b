//! Scholarship application intake: CSV ingestion, eligibility screening,
//! duplicate and capacity admission control, and suitability scoring.
//!
//! The pipeline is deliberately sequential within one batch: the duplicate
//! detector and capacity controller mutate request-scoped counters in
//! [`domain::BatchState`], which are only correct under in-order row
//! processing. Cross-request capacity correctness is delegated to the
//! storage collaborator's slot reservation (see [`store::ApplicationStore`]).

pub(crate) mod admission;
pub(crate) mod aliases;
pub(crate) mod csv;
pub mod domain;
pub(crate) mod eligibility;
pub(crate) mod normalize;
pub mod outcome;
pub mod router;
pub mod scoring;
pub mod service;
pub mod store;

#[cfg(test)]
mod tests;

pub use domain::{
    ApplicantRecord, ApplicationDraft, BatchState, ScholarshipRule, ScholarshipStatus,
};
pub use outcome::{BatchSummary, RowError, RowOutcome, RowStatus};
pub use router::intake_router;
pub use scoring::{ScoreComponent, SuitabilityCriterion, SuitabilityOutcome};
pub use service::{IngestError, IntakeService, SubmissionReceipt};
pub use store::{
    ApplicationStore, LoggingNotifier, MemoryStore, NotifyError, StoreError, SuitabilityNotifier,
};
