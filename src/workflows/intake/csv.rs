//! Lexical CSV handling for bulk uploads.
//!
//! Uploads arrive as loose spreadsheet exports, so the lexer leans
//! permissive: quoting follows the usual conventions (a doubled `""` inside
//! quotes is a literal quote, commas inside quotes do not split) but an
//! unterminated quote consumes the rest of the line instead of failing the
//! row. Header semantics live in [`super::normalize`]; nothing here knows
//! what a column means.

/// Split one CSV line into trimmed field values.
///
/// A trailing comma yields an empty last cell.
pub(crate) fn split_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    current.push('"');
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(ch);
            }
        } else {
            match ch {
                '"' => in_quotes = true,
                ',' => {
                    fields.push(current.trim().to_string());
                    current.clear();
                }
                _ => current.push(ch),
            }
        }
    }

    fields.push(current.trim().to_string());
    fields
}

/// Split an upload into rows of cells, first row being the header.
///
/// Blank lines are dropped so a trailing newline does not produce a phantom
/// row; a leading BOM is stripped before lexing.
pub(crate) fn parse_sheet(text: &str) -> Vec<Vec<String>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(split_line)
        .collect()
}
