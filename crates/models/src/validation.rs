//! Field validators shared by the HTTP layer and the services.

use crate::errors::ModelError;

/// Whitespace as matched by a `\s` class: space, tab, LF, VT, FF, CR.
fn is_pattern_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\u{0B}' | '\u{0C}' | '\r')
}

/// Strip leading and trailing characters at or below U+0020. Other Unicode
/// whitespace such as U+00A0 is kept.
pub fn trim_control(value: &str) -> &str {
    value.trim_matches(|c: char| c <= ' ')
}

/// Length in UTF-16 code units; a character outside the BMP counts twice.
pub fn utf16_len(value: &str) -> usize {
    value.encode_utf16().count()
}

/// `None`, empty, or only characters at or below U+0020.
pub fn is_blank(value: Option<&str>) -> bool {
    value.map(|v| trim_control(v).is_empty()).unwrap_or(true)
}

/// `local@domain.tld`: a single `@`, no whitespace, non-empty local part, and
/// a domain holding a `.` with at least one character on each side.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(is_pattern_space) {
        return false;
    }
    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    if local.is_empty() {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

pub fn validate_email(email: &str) -> Result<(), ModelError> {
    if !is_valid_email(trim_control(email)) {
        return Err(ModelError::Validation("invalid email".into()));
    }
    Ok(())
}

pub fn validate_name(name: &str) -> Result<(), ModelError> {
    if trim_control(name).is_empty() {
        return Err(ModelError::Validation("name required".into()));
    }
    Ok(())
}
