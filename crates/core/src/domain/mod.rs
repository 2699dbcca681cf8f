pub mod partner;
pub mod store;
pub mod taxonomy;

use crate::errors::ValidationError;

pub(crate) fn require_text(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField { field });
    }
    Ok(trimmed.to_string())
}

pub(crate) fn require_non_negative(
    field: &'static str,
    value: f64,
) -> Result<f64, ValidationError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ValidationError::out_of_range(
            field,
            format!("must be a finite value >= 0, got {value}"),
        ));
    }
    Ok(value)
}

pub(crate) fn require_unit_interval(
    field: &'static str,
    value: f64,
) -> Result<f64, ValidationError> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(ValidationError::out_of_range(
            field,
            format!("must be within 0..=1, got {value}"),
        ));
    }
    Ok(value)
}

/// Integer ratings (priority weights, complexity, ROI potential) live in 1..=10.
pub(crate) fn require_rating(field: &'static str, value: i64) -> Result<u8, ValidationError> {
    if !(1..=10).contains(&value) {
        return Err(ValidationError::out_of_range(
            field,
            format!("must be within 1..=10, got {value}"),
        ));
    }
    Ok(value as u8)
}

/// Trims tags, drops blanks and keeps the first occurrence of duplicates.
pub(crate) fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !normalized.iter().any(|existing| existing == tag) {
            normalized.push(tag.to_string());
        }
    }
    normalized
}
