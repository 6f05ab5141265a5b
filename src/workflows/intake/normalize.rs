//! Row normalization for strict (bulk CSV) and lenient (web form) inputs.
//!
//! Both modes produce an [`ApplicationDraft`]; nothing here validates. The
//! strict mode maps declared headers to columns case-insensitively; the
//! lenient mode resolves arbitrary form keys through the ordered alias
//! table in [`super::aliases`].

use std::collections::HashMap;

use super::aliases::FormFields;
use super::domain::ApplicationDraft;

/// Case-insensitive header -> column index map for strict bulk mode.
pub(crate) struct HeaderMap {
    indices: HashMap<String, usize>,
}

impl HeaderMap {
    pub(crate) fn new(headers: &[String]) -> Self {
        let mut indices = HashMap::with_capacity(headers.len());
        for (index, header) in headers.iter().enumerate() {
            // First occurrence of a repeated header wins.
            indices.entry(normalize_header(header)).or_insert(index);
        }
        Self { indices }
    }

    pub(crate) fn contains(&self, name: &str) -> bool {
        self.indices.contains_key(&normalize_header(name))
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.indices.get(&normalize_header(name)).copied()
    }
}

fn normalize_header(value: &str) -> String {
    value.trim().to_ascii_lowercase()
}

/// One data row viewed through the header map.
pub(crate) struct RowReader<'a> {
    headers: &'a HeaderMap,
    cells: &'a [String],
}

impl<'a> RowReader<'a> {
    pub(crate) fn new(headers: &'a HeaderMap, cells: &'a [String]) -> Self {
        Self { headers, cells }
    }

    /// The trimmed cell under `name`, or `None` when the column is absent,
    /// the row is short, or the cell is blank.
    pub(crate) fn field(&self, name: &str) -> Option<String> {
        self.headers
            .index_of(name)
            .and_then(|index| self.cells.get(index))
            .map(|cell| cell.trim().to_string())
            .filter(|cell| !cell.is_empty())
    }
}

/// Build a draft from one CSV data row. An override scholarship id applies
/// to every row of the upload.
pub(crate) fn draft_from_row(reader: &RowReader<'_>, override_id: Option<i64>) -> ApplicationDraft {
    ApplicationDraft {
        full_name: reader.field("full_name"),
        email_address: reader.field("email_address"),
        scholarship_id: override_id
            .map(|id| id.to_string())
            .or_else(|| reader.field("scholarship_id")),
        date_of_birth: reader.field("date_of_birth"),
        gender: reader.field("gender"),
        phone: reader.field("phone"),
        address: reader.field("address"),
        country: reader.field("country"),
        academic_level: reader.field("academic_level"),
        intended_major: reader.field("intended_major"),
        gpa: reader.field("gpa"),
        extracurricular: reader.field("extracurricular"),
        parent_guardian_name: reader.field("parent_guardian_name"),
        parent_guardian_contact: reader.field("parent_guardian_contact"),
        financial_need_statement: reader.field("financial_need_statement"),
        motivation_statement: reader.field("motivation_statement"),
        terms_agreed: reader.field("terms_agreed").map(|value| parse_flag(&value)),
        documents: reader
            .field("documents")
            .map(|value| split_document_keys(&value))
            .unwrap_or_default(),
    }
}

/// Build a draft from an arbitrary form submission via the alias table.
pub(crate) fn draft_from_form(fields: &HashMap<String, String>) -> ApplicationDraft {
    let form = FormFields::new(fields);
    ApplicationDraft {
        full_name: form.resolve("full_name"),
        email_address: form.resolve("email_address"),
        scholarship_id: form.resolve("scholarship_id"),
        date_of_birth: form.resolve("date_of_birth"),
        gender: form.resolve("gender"),
        phone: form.resolve("phone"),
        address: form.resolve("address"),
        country: form.resolve("country"),
        academic_level: form.resolve("academic_level"),
        intended_major: form.resolve("intended_major"),
        gpa: form.resolve("gpa"),
        extracurricular: form.resolve("extracurricular"),
        parent_guardian_name: form.resolve("parent_guardian_name"),
        parent_guardian_contact: form.resolve("parent_guardian_contact"),
        financial_need_statement: form.resolve("financial_need_statement"),
        motivation_statement: form.resolve("motivation_statement"),
        terms_agreed: form.resolve("terms_agreed").map(|value| parse_flag(&value)),
        documents: form
            .resolve("documents")
            .map(|value| split_document_keys(&value))
            .unwrap_or_default(),
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "yes" | "y" | "1" | "on"
    )
}

fn split_document_keys(value: &str) -> Vec<String> {
    value
        .split(';')
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(str::to_string)
        .collect()
}
