//! Internal helpers for input validation and normalization.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation so every operation enforces the same rules.

use unicode_normalization::UnicodeNormalization;

use crate::{EngineError, MoneyCents, ResultEngine};

/// Trims a required text field, failing with `InvalidName` when empty.
pub(crate) fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidName(format!("{label} must not be empty")));
    }
    Ok(trimmed.to_string())
}

/// Trims an optional text field; blank values become `None`.
pub(crate) fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// Display form of a category: trimmed, NFKC, inner whitespace collapsed.
pub(crate) fn normalize_category_display(value: &str) -> ResultEngine<String> {
    let composed: String = value.nfkc().collect();
    let collapsed = composed.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        return Err(EngineError::InvalidName(
            "category must not be empty".to_string(),
        ));
    }
    Ok(collapsed)
}

/// Lookup key of a category: the display form, lowercased.
pub(crate) fn normalize_category_key(value: &str) -> ResultEngine<String> {
    Ok(normalize_category_display(value)?.to_lowercase())
}

pub(crate) fn normalize_email(value: &str) -> ResultEngine<String> {
    let email = normalize_required_name(value, "email")?.to_lowercase();
    if !email.contains('@') {
        return Err(EngineError::InvalidName(format!("invalid email: {email}")));
    }
    Ok(email)
}

/// Accepts amounts in `1..=MoneyCents::MAX_ENTRY`.
pub(crate) fn require_positive(amount: MoneyCents, label: &str) -> ResultEngine<()> {
    if !amount.is_positive() {
        return Err(EngineError::InvalidAmount(format!("{label} must be > 0")));
    }
    require_at_most_entry(amount, label)
}

pub(crate) fn require_at_most_entry(amount: MoneyCents, label: &str) -> ResultEngine<()> {
    if amount > MoneyCents::MAX_ENTRY {
        return Err(EngineError::InvalidAmount(format!(
            "{label} must be at most {}",
            MoneyCents::MAX_ENTRY
        )));
    }
    Ok(())
}
