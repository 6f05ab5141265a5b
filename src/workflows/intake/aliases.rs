//! Ordered alias table for lenient field resolution.
//!
//! Interactive submissions arrive as free-form key/value maps produced by
//! several admin-facing forms, so each logical field carries an explicit,
//! ordered list of the names those forms have used. Keys are folded
//! (lowercased, separators removed) before lookup so `full_name`,
//! `fullName`, and `Full Name` all resolve identically. A key no alias
//! matches is simply absent; required-field absence surfaces downstream as
//! a `MissingField` row error rather than a best-effort guess.

use std::collections::HashMap;
use std::sync::OnceLock;

static ALIAS_TABLE: OnceLock<HashMap<&'static str, &'static [&'static str]>> = OnceLock::new();

/// Form fields with folded keys, ready for alias resolution.
pub(crate) struct FormFields {
    folded: HashMap<String, String>,
}

impl FormFields {
    pub(crate) fn new(fields: &HashMap<String, String>) -> Self {
        let mut folded = HashMap::with_capacity(fields.len());
        for (key, value) in fields {
            // First occurrence of a folded key wins.
            folded
                .entry(fold_key(key))
                .or_insert_with(|| value.trim().to_string());
        }
        Self { folded }
    }

    /// Resolve a logical field through its alias list, in declared order.
    pub(crate) fn resolve(&self, logical: &str) -> Option<String> {
        let aliases = alias_table().get(logical)?;
        aliases
            .iter()
            .find_map(|alias| self.folded.get(*alias))
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }
}

fn fold_key(value: &str) -> String {
    value
        .trim()
        .chars()
        .filter(|ch| !matches!(ch, '_' | '-' | ' '))
        .collect::<String>()
        .to_ascii_lowercase()
}

fn alias_table() -> &'static HashMap<&'static str, &'static [&'static str]> {
    ALIAS_TABLE.get_or_init(|| {
        const TABLE: &[(&str, &[&str])] = &[
            ("full_name", &["fullname", "applicantname", "name"]),
            ("email_address", &["emailaddress", "email", "applicantemail"]),
            ("scholarship_id", &["scholarshipid", "scholarship"]),
            ("date_of_birth", &["dateofbirth", "dob", "birthdate"]),
            ("gender", &["gender"]),
            ("phone", &["phone", "phonenumber", "mobile"]),
            ("address", &["address", "homeaddress"]),
            ("country", &["country", "countryofresidence", "nationality"]),
            ("academic_level", &["academiclevel", "educationlevel", "level"]),
            ("intended_major", &["intendedmajor", "major", "fieldofstudy"]),
            (
                "gpa",
                &["gpa", "gpaacademicperformance", "academicperformance"],
            ),
            (
                "extracurricular",
                &["extracurricular", "extracurricularactivities", "activities"],
            ),
            (
                "parent_guardian_name",
                &["parentguardianname", "parentname", "guardianname"],
            ),
            (
                "parent_guardian_contact",
                &["parentguardiancontact", "parentphone", "guardiancontact"],
            ),
            (
                "financial_need_statement",
                &["financialneedstatement", "financialneed"],
            ),
            (
                "motivation_statement",
                &["motivationstatement", "motivation", "personalstatement"],
            ),
            ("terms_agreed", &["termsagreed", "acceptterms", "terms"]),
            ("documents", &["documents", "documentkeys", "uploadeddocuments"]),
        ];

        TABLE.iter().copied().collect()
    })
}

#[cfg(test)]
pub(crate) fn fold_key_for_tests(value: &str) -> String {
    fold_key(value)
}
