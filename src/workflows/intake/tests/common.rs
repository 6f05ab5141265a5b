use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::workflows::intake::domain::{
    ApplicantRecord, ApplicationDraft, ScholarshipRule, ScholarshipStatus,
};
use crate::workflows::intake::scoring::SuitabilityOutcome;
use crate::workflows::intake::service::IntakeService;
use crate::workflows::intake::store::{
    ApplicationStore, MemoryStore, NotifyError, StoreError, SuitabilityNotifier,
};

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 2).expect("valid date")
}

pub(super) fn open_rule(id: i64) -> ScholarshipRule {
    ScholarshipRule {
        id,
        name: format!("Scholarship {id}"),
        academic_level: None,
        min_gpa: None,
        capacity: None,
        status: ScholarshipStatus::Active,
        application_deadline: None,
        field_of_study: None,
        country: None,
    }
}

pub(super) fn strict_rule(id: i64) -> ScholarshipRule {
    ScholarshipRule {
        academic_level: Some("undergraduate".to_string()),
        min_gpa: Some(3.0),
        capacity: Some(1),
        application_deadline: Some(today() + chrono::Duration::days(30)),
        field_of_study: Some("Computer Science".to_string()),
        country: Some("Kenya".to_string()),
        ..open_rule(id)
    }
}

pub(super) fn draft(id: i64, email: &str) -> ApplicationDraft {
    ApplicationDraft {
        full_name: Some("Amina Wanjiru".to_string()),
        email_address: Some(email.to_string()),
        scholarship_id: Some(id.to_string()),
        date_of_birth: Some("2004-05-17".to_string()),
        ..ApplicationDraft::default()
    }
}

pub(super) fn record(id: i64, email: &str) -> ApplicantRecord {
    ApplicantRecord {
        full_name: "Amina Wanjiru".to_string(),
        email_address: email.to_string(),
        scholarship_id: id,
        date_of_birth: NaiveDate::from_ymd_opt(2004, 5, 17).expect("valid date"),
        gender: None,
        phone: None,
        address: None,
        country: None,
        academic_level: None,
        intended_major: None,
        gpa: None,
        extracurricular: None,
        parent_guardian_name: None,
        parent_guardian_contact: None,
        financial_need_statement: None,
        motivation_statement: None,
        terms_agreed: true,
        documents: Vec::new(),
    }
}

pub(super) fn form(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

/// CSV text with the standard header plus the supplied data lines.
pub(super) fn csv_upload(rows: &[&str]) -> String {
    let mut text = String::from(
        "full_name,email_address,date_of_birth,scholarship_id,academic_level,gpa\n",
    );
    for row in rows {
        text.push_str(row);
        text.push('\n');
    }
    text
}

pub(super) fn build_service(
    rules: Vec<ScholarshipRule>,
) -> (
    IntakeService<MemoryStore, CountingNotifier>,
    Arc<MemoryStore>,
    Arc<CountingNotifier>,
) {
    let store = Arc::new(MemoryStore::with_scholarships(rules));
    let notifier = Arc::new(CountingNotifier::default());
    let service = IntakeService::new(store.clone(), notifier.clone());
    (service, store, notifier)
}

#[derive(Default)]
pub(super) struct CountingNotifier {
    events: Mutex<Vec<(String, u8)>>,
}

impl CountingNotifier {
    pub(super) fn events(&self) -> Vec<(String, u8)> {
        self.events.lock().expect("notifier mutex poisoned").clone()
    }
}

impl SuitabilityNotifier for CountingNotifier {
    fn send_suitability(
        &self,
        record: &ApplicantRecord,
        outcome: &SuitabilityOutcome,
    ) -> Result<(), NotifyError> {
        self.events
            .lock()
            .expect("notifier mutex poisoned")
            .push((record.email_address.clone(), outcome.percent));
        Ok(())
    }
}

pub(super) struct FailingNotifier;

impl SuitabilityNotifier for FailingNotifier {
    fn send_suitability(
        &self,
        _record: &ApplicantRecord,
        _outcome: &SuitabilityOutcome,
    ) -> Result<(), NotifyError> {
        Err(NotifyError::Transport("smtp offline".to_string()))
    }
}

fn offline() -> StoreError {
    StoreError::Unavailable("database offline".to_string())
}

pub(super) struct UnavailableStore;

impl ApplicationStore for UnavailableStore {
    fn find_scholarship(&self, _id: i64) -> Result<Option<ScholarshipRule>, StoreError> {
        Err(offline())
    }

    fn count_applications(&self, _scholarship_id: i64) -> Result<u32, StoreError> {
        Err(offline())
    }

    fn exists_application(&self, _scholarship_id: i64, _email: &str) -> Result<bool, StoreError> {
        Err(offline())
    }

    fn try_reserve_slot(&self, _scholarship_id: i64) -> Result<bool, StoreError> {
        Err(offline())
    }

    fn insert_application(&self, _record: ApplicantRecord) -> Result<i64, StoreError> {
        Err(offline())
    }
}

/// Store whose insert always fails; everything else behaves normally.
pub(super) struct FailingInsertStore {
    pub(super) inner: MemoryStore,
}

impl FailingInsertStore {
    pub(super) fn with_scholarships(rules: Vec<ScholarshipRule>) -> Self {
        Self {
            inner: MemoryStore::with_scholarships(rules),
        }
    }
}

impl ApplicationStore for FailingInsertStore {
    fn find_scholarship(&self, id: i64) -> Result<Option<ScholarshipRule>, StoreError> {
        self.inner.find_scholarship(id)
    }

    fn count_applications(&self, scholarship_id: i64) -> Result<u32, StoreError> {
        self.inner.count_applications(scholarship_id)
    }

    fn exists_application(&self, scholarship_id: i64, email: &str) -> Result<bool, StoreError> {
        self.inner.exists_application(scholarship_id, email)
    }

    fn try_reserve_slot(&self, scholarship_id: i64) -> Result<bool, StoreError> {
        self.inner.try_reserve_slot(scholarship_id)
    }

    fn insert_application(&self, _record: ApplicantRecord) -> Result<i64, StoreError> {
        Err(StoreError::Unavailable("insert failed".to_string()))
    }
}

/// Store whose slot reservation is always declined.
pub(super) struct NoSlotStore {
    pub(super) inner: MemoryStore,
}

impl NoSlotStore {
    pub(super) fn with_scholarships(rules: Vec<ScholarshipRule>) -> Self {
        Self {
            inner: MemoryStore::with_scholarships(rules),
        }
    }
}

impl ApplicationStore for NoSlotStore {
    fn find_scholarship(&self, id: i64) -> Result<Option<ScholarshipRule>, StoreError> {
        self.inner.find_scholarship(id)
    }

    fn count_applications(&self, scholarship_id: i64) -> Result<u32, StoreError> {
        self.inner.count_applications(scholarship_id)
    }

    fn exists_application(&self, scholarship_id: i64, email: &str) -> Result<bool, StoreError> {
        self.inner.exists_application(scholarship_id, email)
    }

    fn try_reserve_slot(&self, _scholarship_id: i64) -> Result<bool, StoreError> {
        Ok(false)
    }

    fn insert_application(&self, record: ApplicantRecord) -> Result<i64, StoreError> {
        self.inner.insert_application(record)
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
