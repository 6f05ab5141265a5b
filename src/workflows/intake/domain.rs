use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Wildcard academic level matching any applicant.
const WILDCARD_LEVEL: &str = "other";

/// Eligibility snapshot for one scholarship, loaded once per batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScholarshipRule {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub academic_level: Option<String>,
    #[serde(default)]
    pub min_gpa: Option<f64>,
    /// Maximum number of awards; absent or zero means unlimited.
    #[serde(default)]
    pub capacity: Option<u32>,
    pub status: ScholarshipStatus,
    #[serde(default)]
    pub application_deadline: Option<NaiveDate>,
    #[serde(default)]
    pub field_of_study: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

impl ScholarshipRule {
    /// `"other"` matches every applicant level.
    pub fn is_wildcard_level(&self) -> bool {
        self.academic_level
            .as_deref()
            .map(|level| level.trim().eq_ignore_ascii_case(WILDCARD_LEVEL))
            .unwrap_or(false)
    }

    pub fn is_unlimited(&self) -> bool {
        matches!(self.capacity, None | Some(0))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScholarshipStatus {
    Active,
    Inactive,
}

impl ScholarshipStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ScholarshipStatus::Active => "active",
            ScholarshipStatus::Inactive => "inactive",
        }
    }

    pub const fn is_active(self) -> bool {
        matches!(self, ScholarshipStatus::Active)
    }
}

/// Normalizer output prior to eligibility checks; everything is still raw
/// text. Missing optionals are `None`, never errors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplicationDraft {
    pub full_name: Option<String>,
    pub email_address: Option<String>,
    pub scholarship_id: Option<String>,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub country: Option<String>,
    pub academic_level: Option<String>,
    pub intended_major: Option<String>,
    /// Free text; a numeric value is extracted during validation/scoring.
    pub gpa: Option<String>,
    pub extracurricular: Option<String>,
    pub parent_guardian_name: Option<String>,
    pub parent_guardian_contact: Option<String>,
    pub financial_need_statement: Option<String>,
    pub motivation_statement: Option<String>,
    pub terms_agreed: Option<bool>,
    /// Storage keys of documents uploaded alongside the submission.
    pub documents: Vec<String>,
}

/// Application that cleared eligibility; the shape handed to storage and
/// scoring. Becomes durable only on successful admission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicantRecord {
    pub full_name: String,
    pub email_address: String,
    pub scholarship_id: i64,
    pub date_of_birth: NaiveDate,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub country: Option<String>,
    pub academic_level: Option<String>,
    pub intended_major: Option<String>,
    pub gpa: Option<String>,
    pub extracurricular: Option<String>,
    pub parent_guardian_name: Option<String>,
    pub parent_guardian_contact: Option<String>,
    pub financial_need_statement: Option<String>,
    pub motivation_statement: Option<String>,
    pub terms_agreed: bool,
    pub documents: Vec<String>,
}

/// Fold an email for duplicate comparison: trimmed and lowercased.
pub(crate) fn fold_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Request-scoped admission state; created per upload and discarded with the
/// request, never persisted.
#[derive(Debug)]
pub struct BatchState {
    today: NaiveDate,
    pub(crate) scholarship_cache: HashMap<i64, Option<ScholarshipRule>>,
    /// Applications already stored before this batch began, loaded per
    /// scholarship on first encounter.
    pub(crate) persisted_counts: HashMap<i64, u32>,
    /// Rows admitted so far within this batch.
    pub(crate) batch_inserted: HashMap<i64, u32>,
    pub(crate) seen_keys: HashSet<String>,
}

impl BatchState {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            scholarship_cache: HashMap::new(),
            persisted_counts: HashMap::new(),
            batch_inserted: HashMap::new(),
            seen_keys: HashSet::new(),
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub(crate) fn dedup_key(scholarship_id: i64, email: &str) -> String {
        format!("{scholarship_id}|{}", fold_email(email))
    }

    /// Record an admission: the dedup key is set immediately so a later
    /// occurrence of the same pair in this batch is rejected.
    pub(crate) fn admitted(&mut self, scholarship_id: i64, email: &str) {
        self.seen_keys.insert(Self::dedup_key(scholarship_id, email));
        *self.batch_inserted.entry(scholarship_id).or_insert(0) += 1;
    }
}
