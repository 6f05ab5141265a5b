//! Intake pipeline orchestration: upload pre-flight, per-row processing,
//! and the interactive single-submission path.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use thiserror::Error;
use tracing::warn;

use super::admission;
use super::csv::parse_sheet;
use super::domain::{ApplicantRecord, ApplicationDraft, BatchState, ScholarshipRule};
use super::eligibility;
use super::normalize::{draft_from_form, draft_from_row, HeaderMap, RowReader};
use super::outcome::{BatchSummary, RowError, RowOutcome, RowStatus};
use super::scoring::{self, SuitabilityOutcome};
use super::store::{ApplicationStore, SuitabilityNotifier};

/// Headers every upload must declare; `scholarship_id` is also required
/// unless the request carries an override.
pub const REQUIRED_HEADERS: [&str; 3] = ["full_name", "email_address", "date_of_birth"];

/// Pre-flight failures that abort an upload before any row is processed.
/// Everything after pre-flight is row-scoped and lands in the summary.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IngestError {
    #[error("No CSV file was uploaded")]
    MissingFile,
    #[error("CSV must include a header and at least one data row")]
    NoDataRows,
    #[error("CSV is missing required headers: {0}")]
    MissingHeaders(String),
    #[error("scholarship_id override must be a positive integer")]
    InvalidOverrideId,
}

/// Receipt for one interactive submission.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionReceipt {
    pub application_id: i64,
    pub suitability: SuitabilityOutcome,
}

struct AdmittedRow {
    application_id: i64,
    record: ApplicantRecord,
    rule: ScholarshipRule,
}

/// Service composing the storage and notification collaborators around the
/// row pipeline.
pub struct IntakeService<S, N> {
    store: Arc<S>,
    notifier: Arc<N>,
}

impl<S, N> IntakeService<S, N>
where
    S: ApplicationStore + 'static,
    N: SuitabilityNotifier + 'static,
{
    pub fn new(store: Arc<S>, notifier: Arc<N>) -> Self {
        Self { store, notifier }
    }

    /// Run a bulk CSV upload through the row pipeline.
    ///
    /// Rows are processed strictly sequentially: the duplicate and capacity
    /// checks mutate batch-scoped counters that are only correct in order.
    pub fn ingest_csv(
        &self,
        text: &str,
        override_id: Option<i64>,
        today: NaiveDate,
    ) -> Result<BatchSummary, IngestError> {
        if override_id.is_some_and(|id| id <= 0) {
            return Err(IngestError::InvalidOverrideId);
        }

        let sheet = parse_sheet(text);
        let Some((header_cells, data_rows)) = sheet.split_first() else {
            return Err(IngestError::NoDataRows);
        };
        if data_rows.is_empty() {
            return Err(IngestError::NoDataRows);
        }

        let headers = HeaderMap::new(header_cells);
        let mut missing: Vec<&str> = REQUIRED_HEADERS
            .iter()
            .copied()
            .filter(|header| !headers.contains(header))
            .collect();
        if override_id.is_none() && !headers.contains("scholarship_id") {
            missing.push("scholarship_id");
        }
        if !missing.is_empty() {
            return Err(IngestError::MissingHeaders(missing.join(", ")));
        }

        let mut state = BatchState::new(today);
        let mut summary = BatchSummary::default();
        for (index, cells) in data_rows.iter().enumerate() {
            let row_number = index as u32 + 1;
            let reader = RowReader::new(&headers, cells);
            let draft = draft_from_row(&reader, override_id);
            summary.record(self.process_row(row_number, &draft, &mut state));
        }

        Ok(summary)
    }

    /// Process one interactive submission and score its scholarship fit.
    ///
    /// The submission runs the same admission pipeline as a one-row batch,
    /// so persisted duplicates and exhausted capacity reject it too.
    pub fn submit(
        &self,
        fields: &HashMap<String, String>,
        today: NaiveDate,
    ) -> Result<SubmissionReceipt, RowError> {
        let draft = draft_from_form(fields);
        let mut state = BatchState::new(today);
        let admitted = self.admit(&draft, &mut state)?;

        let suitability = scoring::score(&admitted.record, &admitted.rule);
        if let Err(error) = self
            .notifier
            .send_suitability(&admitted.record, &suitability)
        {
            warn!(
                %error,
                email = %admitted.record.email_address,
                "suitability notification failed"
            );
        }

        Ok(SubmissionReceipt {
            application_id: admitted.application_id,
            suitability,
        })
    }

    fn process_row(
        &self,
        row: u32,
        draft: &ApplicationDraft,
        state: &mut BatchState,
    ) -> RowOutcome {
        match self.admit(draft, state) {
            Ok(admitted) => RowOutcome {
                row,
                status: RowStatus::Inserted,
                message: None,
                email: Some(admitted.record.email_address),
                scholarship_id: Some(admitted.record.scholarship_id),
            },
            Err(error) => RowOutcome {
                row,
                status: error.status(),
                message: Some(error.to_string()),
                email: draft
                    .email_address
                    .as_deref()
                    .map(str::trim)
                    .filter(|email| !email.is_empty())
                    .map(str::to_string),
                scholarship_id: draft
                    .scholarship_id
                    .as_deref()
                    .and_then(|raw| raw.trim().parse::<i64>().ok())
                    .filter(|id| *id > 0),
            },
        }
    }

    fn admit(
        &self,
        draft: &ApplicationDraft,
        state: &mut BatchState,
    ) -> Result<AdmittedRow, RowError> {
        let identity = eligibility::screen_required(draft)?;
        let rule = self
            .cached_rule(state, identity.scholarship_id)?
            .ok_or(RowError::ScholarshipNotFound(identity.scholarship_id))?;
        eligibility::check_rule(draft, &rule, state.today())?;

        admission::check_duplicate(self.store.as_ref(), state, rule.id, &identity.email)?;
        admission::check_capacity(self.store.as_ref(), state, &rule)?;
        admission::reserve_slot(self.store.as_ref(), &rule)?;

        let record = eligibility::build_record(draft, identity);
        let application_id = self.store.insert_application(record.clone())?;
        state.admitted(record.scholarship_id, &record.email_address);

        Ok(AdmittedRow {
            application_id,
            record,
            rule,
        })
    }

    fn cached_rule(
        &self,
        state: &mut BatchState,
        scholarship_id: i64,
    ) -> Result<Option<ScholarshipRule>, RowError> {
        if let Some(cached) = state.scholarship_cache.get(&scholarship_id) {
            return Ok(cached.clone());
        }

        let fetched = self.store.find_scholarship(scholarship_id)?;
        state.scholarship_cache.insert(scholarship_id, fetched.clone());
        Ok(fetched)
    }
}
