//! Collaborator contracts for persistence and notification, with in-memory
//! reference implementations used by the binary, demos, and tests.

use std::collections::HashMap;
use std::sync::Mutex;

use thiserror::Error;
use tracing::info;

use super::domain::{fold_email, ApplicantRecord, ScholarshipRule};
use super::scoring::SuitabilityOutcome;

/// Storage abstraction the intake pipeline drives. The production system
/// backs this with the relational store through parameterized statements.
pub trait ApplicationStore: Send + Sync {
    fn find_scholarship(&self, id: i64) -> Result<Option<ScholarshipRule>, StoreError>;

    fn count_applications(&self, scholarship_id: i64) -> Result<u32, StoreError>;

    /// `email` arrives already trimmed and lowercased.
    fn exists_application(&self, scholarship_id: i64, email: &str) -> Result<bool, StoreError>;

    /// Conditional slot reservation. Transactional backends enforce the
    /// capacity invariant here (a conditional write such as
    /// `UPDATE ... WHERE used < capacity`); the in-process batch counters
    /// are only a best-effort pre-check.
    fn try_reserve_slot(&self, scholarship_id: i64) -> Result<bool, StoreError>;

    fn insert_application(&self, record: ApplicantRecord) -> Result<i64, StoreError>;
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("constraint violated: {0}")]
    Constraint(String),
}

/// Outbound suitability mail hook. Fire-and-forget: the caller logs and
/// swallows failures so a dead mailer never fails an ingestion response.
pub trait SuitabilityNotifier: Send + Sync {
    fn send_suitability(
        &self,
        record: &ApplicantRecord,
        outcome: &SuitabilityOutcome,
    ) -> Result<(), NotifyError>;
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}

/// Seedable in-memory store standing in for the relational collaborator.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryStoreInner>,
}

#[derive(Default)]
struct MemoryStoreInner {
    scholarships: HashMap<i64, ScholarshipRule>,
    applications: Vec<StoredApplication>,
    last_id: i64,
}

struct StoredApplication {
    email_key: String,
    record: ApplicantRecord,
}

impl MemoryStore {
    pub fn with_scholarships(rules: impl IntoIterator<Item = ScholarshipRule>) -> Self {
        let scholarships = rules.into_iter().map(|rule| (rule.id, rule)).collect();
        Self {
            inner: Mutex::new(MemoryStoreInner {
                scholarships,
                applications: Vec::new(),
                last_id: 0,
            }),
        }
    }

    /// Stored applications for one scholarship, in insertion order.
    pub fn applications_for(&self, scholarship_id: i64) -> Vec<ApplicantRecord> {
        let inner = self.inner.lock().expect("store mutex poisoned");
        inner
            .applications
            .iter()
            .filter(|stored| stored.record.scholarship_id == scholarship_id)
            .map(|stored| stored.record.clone())
            .collect()
    }
}

impl ApplicationStore for MemoryStore {
    fn find_scholarship(&self, id: i64) -> Result<Option<ScholarshipRule>, StoreError> {
        let inner = self.inner.lock().expect("store mutex poisoned");
        Ok(inner.scholarships.get(&id).cloned())
    }

    fn count_applications(&self, scholarship_id: i64) -> Result<u32, StoreError> {
        let inner = self.inner.lock().expect("store mutex poisoned");
        Ok(inner
            .applications
            .iter()
            .filter(|stored| stored.record.scholarship_id == scholarship_id)
            .count() as u32)
    }

    fn exists_application(&self, scholarship_id: i64, email: &str) -> Result<bool, StoreError> {
        let inner = self.inner.lock().expect("store mutex poisoned");
        Ok(inner.applications.iter().any(|stored| {
            stored.record.scholarship_id == scholarship_id && stored.email_key == email
        }))
    }

    fn try_reserve_slot(&self, scholarship_id: i64) -> Result<bool, StoreError> {
        let inner = self.inner.lock().expect("store mutex poisoned");
        let Some(rule) = inner.scholarships.get(&scholarship_id) else {
            return Ok(false);
        };
        let Some(capacity) = rule.capacity.filter(|capacity| *capacity > 0) else {
            return Ok(true);
        };

        let used = inner
            .applications
            .iter()
            .filter(|stored| stored.record.scholarship_id == scholarship_id)
            .count() as u32;
        Ok(used < capacity)
    }

    fn insert_application(&self, record: ApplicantRecord) -> Result<i64, StoreError> {
        let mut inner = self.inner.lock().expect("store mutex poisoned");
        inner.last_id += 1;
        let id = inner.last_id;
        let email_key = fold_email(&record.email_address);
        inner
            .applications
            .push(StoredApplication { email_key, record });
        Ok(id)
    }
}

/// Notifier that records the send in the service log.
#[derive(Debug, Default, Clone)]
pub struct LoggingNotifier;

impl SuitabilityNotifier for LoggingNotifier {
    fn send_suitability(
        &self,
        record: &ApplicantRecord,
        outcome: &SuitabilityOutcome,
    ) -> Result<(), NotifyError> {
        info!(
            email = %record.email_address,
            scholarship_id = record.scholarship_id,
            percent = outcome.percent,
            "suitability notification queued"
        );
        Ok(())
    }
}
