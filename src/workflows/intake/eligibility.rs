//! Ordered eligibility checks applied to every normalized row.
//!
//! Validation is pure: the same draft, rule, and date always yield the same
//! verdict. Checks short-circuit in a fixed order so each rejection carries
//! exactly one terminal [`RowError`] kind.

use chrono::NaiveDate;

use super::domain::{ApplicantRecord, ApplicationDraft, ScholarshipRule};
use super::outcome::RowError;

const BIRTH_DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y"];

/// The row-identifying fields every application must carry, parsed.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RowIdentity {
    pub(crate) full_name: String,
    pub(crate) email: String,
    pub(crate) scholarship_id: i64,
    pub(crate) date_of_birth: NaiveDate,
}

/// Checks 1-3: required fields present, scholarship id is a positive
/// integer, date of birth is a calendar date (normalized to ISO).
pub(crate) fn screen_required(draft: &ApplicationDraft) -> Result<RowIdentity, RowError> {
    let full_name = required(draft.full_name.as_deref(), "full_name")?;
    let email = required(draft.email_address.as_deref(), "email_address")?;
    let raw_id = required(draft.scholarship_id.as_deref(), "scholarship_id")?;
    let raw_birth_date = required(draft.date_of_birth.as_deref(), "date_of_birth")?;

    let scholarship_id = parse_scholarship_id(&raw_id)?;
    let date_of_birth = parse_birth_date(&raw_birth_date).ok_or(RowError::InvalidDate)?;

    Ok(RowIdentity {
        full_name,
        email,
        scholarship_id,
        date_of_birth,
    })
}

/// Checks 5-8 against the resolved scholarship rule.
pub(crate) fn check_rule(
    draft: &ApplicationDraft,
    rule: &ScholarshipRule,
    today: NaiveDate,
) -> Result<(), RowError> {
    if !rule.status.is_active() {
        return Err(RowError::ScholarshipInactive(rule.id));
    }

    if let Some(deadline) = rule.application_deadline {
        if deadline < today {
            return Err(RowError::DeadlinePassed);
        }
    }

    if let (Some(applicant_level), Some(required_level)) =
        (draft.academic_level.as_deref(), rule.academic_level.as_deref())
    {
        if !rule.is_wildcard_level() && !applicant_level.trim().eq_ignore_ascii_case(required_level)
        {
            return Err(RowError::AcademicLevelMismatch {
                required: required_level.to_string(),
            });
        }
    }

    if let Some(minimum) = rule.min_gpa {
        // Hard cutoff at validation time; scoring applies softer tolerances.
        match draft.gpa.as_deref().and_then(extract_gpa) {
            Some(gpa) if gpa >= minimum => {}
            _ => return Err(RowError::GpaBelowMinimum { minimum }),
        }
    }

    Ok(())
}

/// Assemble the validated record once every check has passed.
pub(crate) fn build_record(draft: &ApplicationDraft, identity: RowIdentity) -> ApplicantRecord {
    ApplicantRecord {
        full_name: identity.full_name,
        email_address: identity.email,
        scholarship_id: identity.scholarship_id,
        date_of_birth: identity.date_of_birth,
        gender: draft.gender.clone(),
        phone: draft.phone.clone(),
        address: draft.address.clone(),
        country: draft.country.clone(),
        academic_level: draft.academic_level.clone(),
        intended_major: draft.intended_major.clone(),
        gpa: draft.gpa.clone(),
        extracurricular: draft.extracurricular.clone(),
        parent_guardian_name: draft.parent_guardian_name.clone(),
        parent_guardian_contact: draft.parent_guardian_contact.clone(),
        financial_need_statement: draft.financial_need_statement.clone(),
        motivation_statement: draft.motivation_statement.clone(),
        terms_agreed: draft.terms_agreed.unwrap_or(false),
        documents: draft.documents.clone(),
    }
}

/// First numeric substring of a free-text GPA field, if any.
///
/// Returns `None` rather than a zero default so callers can distinguish an
/// unknown GPA from a bad one.
pub(crate) fn extract_gpa(raw: &str) -> Option<f64> {
    let mut number = String::new();
    let mut seen_dot = false;

    for ch in raw.chars() {
        if ch.is_ascii_digit() {
            number.push(ch);
        } else if ch == '.' && !number.is_empty() && !seen_dot {
            seen_dot = true;
            number.push(ch);
        } else if !number.is_empty() {
            break;
        }
    }

    let number = number.strip_suffix('.').unwrap_or(&number);
    if number.is_empty() {
        None
    } else {
        number.parse().ok()
    }
}

fn required(value: Option<&str>, field: &'static str) -> Result<String, RowError> {
    match value.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => Ok(value.to_string()),
        None => Err(RowError::MissingField(field)),
    }
}

fn parse_scholarship_id(raw: &str) -> Result<i64, RowError> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or(RowError::InvalidScholarshipId)
}

pub(crate) fn parse_birth_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    BIRTH_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
}
