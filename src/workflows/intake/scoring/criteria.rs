use super::super::domain::{ApplicantRecord, ScholarshipRule};
use super::super::eligibility::extract_gpa;
use super::{ScoreComponent, SuitabilityCriterion};

/// Tolerances below the scholarship minimum that still earn partial credit,
/// unlike the hard cutoff applied at validation time.
const GPA_NEAR_MISS: f64 = 0.2;
const GPA_STRETCH: f64 = 0.5;

pub(crate) fn score_components(
    record: &ApplicantRecord,
    rule: &ScholarshipRule,
) -> Vec<ScoreComponent> {
    vec![
        academic_level(record, rule),
        gpa(record, rule),
        field_of_study(record, rule),
        country(record, rule),
        documents(record),
        motivation(record),
        extracurricular(record),
    ]
}

fn academic_level(record: &ApplicantRecord, rule: &ScholarshipRule) -> ScoreComponent {
    let (points, notes) = match (
        record.academic_level.as_deref(),
        rule.academic_level.as_deref(),
    ) {
        (Some(applicant), Some(required)) if !rule.is_wildcard_level() => {
            if applicant.trim().eq_ignore_ascii_case(required) {
                (20, format!("academic level matches {required}"))
            } else {
                (0, format!("academic level {applicant} does not match {required}"))
            }
        }
        _ => (10, "academic level unspecified on one side".to_string()),
    };

    component(SuitabilityCriterion::AcademicLevel, points, notes)
}

fn gpa(record: &ApplicantRecord, rule: &ScholarshipRule) -> ScoreComponent {
    let extracted = record.gpa.as_deref().and_then(extract_gpa);
    let (points, notes) = match (extracted, rule.min_gpa) {
        (Some(gpa), Some(minimum)) => {
            if gpa >= minimum {
                (25, format!("GPA {gpa:.2} meets the minimum {minimum:.2}"))
            } else if gpa >= minimum - GPA_NEAR_MISS {
                (15, format!("GPA {gpa:.2} within 0.2 of the minimum {minimum:.2}"))
            } else if gpa >= minimum - GPA_STRETCH {
                (8, format!("GPA {gpa:.2} within 0.5 of the minimum {minimum:.2}"))
            } else {
                (0, format!("GPA {gpa:.2} below the minimum {minimum:.2}"))
            }
        }
        _ => (10, "GPA or scholarship minimum unknown".to_string()),
    };

    component(SuitabilityCriterion::Gpa, points, notes)
}

fn field_of_study(record: &ApplicantRecord, rule: &ScholarshipRule) -> ScoreComponent {
    let (points, notes) = match rule.field_of_study.as_deref() {
        None => (10, "scholarship declares no field of study".to_string()),
        Some(field) => match record.intended_major.as_deref() {
            Some(major) if substring_match(major, field) => {
                (20, format!("intended major {major} matches {field}"))
            }
            Some(major) => (0, format!("intended major {major} does not match {field}")),
            None => (0, "intended major not provided".to_string()),
        },
    };

    component(SuitabilityCriterion::FieldOfStudy, points, notes)
}

fn country(record: &ApplicantRecord, rule: &ScholarshipRule) -> ScoreComponent {
    let (points, notes) = match (record.country.as_deref(), rule.country.as_deref()) {
        (Some(applicant), Some(sponsor)) => {
            if applicant.trim().eq_ignore_ascii_case(sponsor.trim()) {
                (10, format!("country matches {sponsor}"))
            } else {
                (0, format!("country {applicant} does not match {sponsor}"))
            }
        }
        _ => (5, "country unknown on one side".to_string()),
    };

    component(SuitabilityCriterion::Country, points, notes)
}

fn documents(record: &ApplicantRecord) -> ScoreComponent {
    let (points, notes) = if record.documents.is_empty() {
        (0, "no supporting documents".to_string())
    } else {
        (10, format!("{} supporting document(s)", record.documents.len()))
    };

    component(SuitabilityCriterion::Documents, points, notes)
}

fn motivation(record: &ApplicantRecord) -> ScoreComponent {
    let length = text_length(record.motivation_statement.as_deref());
    let (points, notes) = if length >= 150 {
        (10, format!("motivation statement of {length} characters"))
    } else if length >= 60 {
        (6, format!("motivation statement of {length} characters"))
    } else if length > 0 {
        (3, format!("brief motivation statement of {length} characters"))
    } else {
        (0, "no motivation statement".to_string())
    };

    component(SuitabilityCriterion::Motivation, points, notes)
}

fn extracurricular(record: &ApplicantRecord) -> ScoreComponent {
    let length = text_length(record.extracurricular.as_deref());
    let (points, notes) = if length >= 80 {
        (5, format!("extracurricular detail of {length} characters"))
    } else if length >= 20 {
        (3, format!("extracurricular detail of {length} characters"))
    } else if length > 0 {
        (2, format!("brief extracurricular detail of {length} characters"))
    } else {
        (0, "no extracurricular activity".to_string())
    };

    component(SuitabilityCriterion::Extracurricular, points, notes)
}

fn component(criterion: SuitabilityCriterion, points: u8, notes: String) -> ScoreComponent {
    debug_assert!(points <= criterion.max_points());
    ScoreComponent {
        criterion,
        points,
        notes,
    }
}

fn substring_match(a: &str, b: &str) -> bool {
    let a = a.trim().to_lowercase();
    let b = b.trim().to_lowercase();
    !a.is_empty() && !b.is_empty() && (a.contains(&b) || b.contains(&a))
}

fn text_length(value: Option<&str>) -> usize {
    value.map(|text| text.trim().chars().count()).unwrap_or(0)
}
