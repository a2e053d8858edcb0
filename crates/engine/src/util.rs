//! Internal helpers for input normalization and conversion.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation so every entry point enforces the same invariants.

use uuid::Uuid;

use crate::{EngineError, ResultEngine};

pub(crate) const TITLE_MAX_CHARS: usize = 100;
pub(crate) const DESCRIPTION_MAX_CHARS: usize = 500;

/// Parse a UUID from storage and return a labeled error on failure.
pub(crate) fn parse_uuid(value: &str, label: &str) -> ResultEngine<Uuid> {
    Uuid::parse_str(value).map_err(|_| EngineError::InvalidInput(format!("invalid {label} id")))
}

/// Trim `value` and reject it when empty.
pub(crate) fn normalize_required(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidInput(format!("{label} must not be empty")));
    }
    Ok(trimmed.to_string())
}

/// Emails are compared case-insensitively, so they are stored lower-cased.
pub(crate) fn normalize_email(value: &str) -> ResultEngine<String> {
    normalize_required(value, "email").map(|email| email.to_lowercase())
}

pub(crate) fn normalize_title(value: &str) -> ResultEngine<String> {
    let title = normalize_required(value, "title")?;
    if title.chars().count() > TITLE_MAX_CHARS {
        return Err(EngineError::InvalidInput(format!(
            "title must be at most {TITLE_MAX_CHARS} characters"
        )));
    }
    Ok(title)
}

/// Trim the description; blank descriptions are stored as absent.
pub(crate) fn normalize_description(value: Option<&str>) -> ResultEngine<Option<String>> {
    let Some(description) = value.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    if description.chars().count() > DESCRIPTION_MAX_CHARS {
        return Err(EngineError::InvalidInput(format!(
            "description must be at most {DESCRIPTION_MAX_CHARS} characters"
        )));
    }
    Ok(Some(description.to_string()))
}
