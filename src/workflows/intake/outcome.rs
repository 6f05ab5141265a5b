use serde::Serialize;
use thiserror::Error;

use super::store::StoreError;

/// Row-scoped failure taxonomy. Every variant terminates one row, never the
/// batch; messages surface verbatim in the upload summary.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RowError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    #[error("Scholarship id must be a positive integer")]
    InvalidScholarshipId,
    #[error("Date of birth is not a valid date")]
    InvalidDate,
    #[error("Scholarship {0} not found")]
    ScholarshipNotFound(i64),
    #[error("Scholarship {0} is not accepting applications")]
    ScholarshipInactive(i64),
    #[error("The application deadline has passed")]
    DeadlinePassed,
    #[error("Academic level does not match the scholarship requirement ({required})")]
    AcademicLevelMismatch { required: String },
    #[error("GPA is below the required minimum of {minimum}")]
    GpaBelowMinimum { minimum: f64 },
    #[error("Scholarship {0} has no remaining award slots")]
    CapacityReached(i64),
    #[error("Duplicate application in this upload")]
    DuplicateInBatch,
    #[error("An application for this scholarship already exists for {email}")]
    DuplicateInDb { email: String },
    #[error("Storage failure: {0}")]
    Store(String),
}

impl RowError {
    pub fn status(&self) -> RowStatus {
        match self {
            RowError::DuplicateInBatch | RowError::DuplicateInDb { .. } => RowStatus::Duplicate,
            _ => RowStatus::Error,
        }
    }
}

impl From<StoreError> for RowError {
    fn from(value: StoreError) -> Self {
        RowError::Store(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowStatus {
    Inserted,
    Duplicate,
    Error,
}

impl RowStatus {
    pub const fn label(self) -> &'static str {
        match self {
            RowStatus::Inserted => "inserted",
            RowStatus::Duplicate => "duplicate",
            RowStatus::Error => "error",
        }
    }
}

/// Outcome of one data row. `row` is 1-indexed over data rows, the header
/// excluded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowOutcome {
    pub row: u32,
    pub status: RowStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scholarship_id: Option<i64>,
}

/// Aggregated outcome of one upload.
///
/// `inserted + duplicates + errors` equals the number of rows recorded at
/// all times; no row failure aborts the batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchSummary {
    pub inserted: u32,
    pub duplicates: u32,
    pub errors: u32,
    pub rows: Vec<RowOutcome>,
}

impl BatchSummary {
    pub fn record(&mut self, outcome: RowOutcome) {
        match outcome.status {
            RowStatus::Inserted => self.inserted += 1,
            RowStatus::Duplicate => self.duplicates += 1,
            RowStatus::Error => self.errors += 1,
        }
        self.rows.push(outcome);
    }

    pub fn total_rows(&self) -> u32 {
        self.inserted + self.duplicates + self.errors
    }
}
