//! Deterministic suitability scoring for admitted applications.
//!
//! The score is advisory, not an admission decision: eligibility has already
//! applied its hard cutoffs by the time a record is scored. The breakdown
//! preserves criterion order so audits and tests can reproduce the total.

mod criteria;

use serde::{Deserialize, Serialize};

use super::domain::{ApplicantRecord, ScholarshipRule};

/// Criteria making up the rubric, in reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuitabilityCriterion {
    AcademicLevel,
    Gpa,
    FieldOfStudy,
    Country,
    Documents,
    Motivation,
    Extracurricular,
}

impl SuitabilityCriterion {
    pub const fn ordered() -> [Self; 7] {
        [
            Self::AcademicLevel,
            Self::Gpa,
            Self::FieldOfStudy,
            Self::Country,
            Self::Documents,
            Self::Motivation,
            Self::Extracurricular,
        ]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::AcademicLevel => "academic_level",
            Self::Gpa => "gpa",
            Self::FieldOfStudy => "field_of_study",
            Self::Country => "country",
            Self::Documents => "documents",
            Self::Motivation => "motivation",
            Self::Extracurricular => "extracurricular",
        }
    }

    /// Upper bound on the points one criterion can contribute.
    pub const fn max_points(self) -> u8 {
        match self {
            Self::AcademicLevel => 20,
            Self::Gpa => 25,
            Self::FieldOfStudy => 20,
            Self::Country => 10,
            Self::Documents => 10,
            Self::Motivation => 10,
            Self::Extracurricular => 5,
        }
    }
}

/// One criterion's contribution to the composite score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub criterion: SuitabilityCriterion,
    pub points: u8,
    pub notes: String,
}

/// Composite 0-100 fit estimate with its per-criterion breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuitabilityOutcome {
    pub percent: u8,
    pub components: Vec<ScoreComponent>,
}

/// Score one admitted application against its scholarship.
pub fn score(record: &ApplicantRecord, rule: &ScholarshipRule) -> SuitabilityOutcome {
    let components = criteria::score_components(record, rule);
    let total: u32 = components
        .iter()
        .map(|component| u32::from(component.points))
        .sum();

    SuitabilityOutcome {
        percent: total.min(100) as u8,
        components,
    }
}
