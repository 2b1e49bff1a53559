//! Internal helpers for input validation and normalization.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation so every operation enforces the same rules.

use unicode_normalization::UnicodeNormalization;
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

/// Trim and NFC-normalize a required field. Empty values are rejected.
pub(crate) fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let normalized: String = value.trim().nfc().collect();
    if normalized.is_empty() {
        return Err(EngineError::InvalidName(format!("{label} must not be empty")));
    }
    Ok(normalized)
}

/// Trim free text, keeping it even when empty.
pub(crate) fn normalize_text(value: &str) -> String {
    value.trim().nfc().collect()
}

/// Build a `LIKE` pattern for a case-insensitive substring search.
///
/// Blank searches yield `None`, meaning "no filter".
pub(crate) fn search_pattern(search: Option<&str>) -> Option<String> {
    search
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| format!("%{}%", s.to_lowercase()))
}

/// Amounts moved in or out of a fridge must be strictly positive.
pub(crate) fn ensure_positive(value: i64, label: &str) -> ResultEngine<()> {
    if value <= 0 {
        return Err(EngineError::InvalidAmount(format!("{label} must be > 0")));
    }
    Ok(())
}

/// Use the caller's id when given, a fresh UUID otherwise.
pub(crate) fn id_or_new(id: Option<&str>) -> ResultEngine<String> {
    match id.map(str::trim) {
        Some("") => Err(EngineError::InvalidName("id must not be empty".to_string())),
        Some(id) => Ok(id.to_string()),
        None => Ok(Uuid::new_v4().to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_trimmed_and_composed() {
        // "e" followed by a combining acute accent.
        let name = normalize_required_name("  Cafe\u{301} ", "product name").unwrap();
        assert_eq!(name, "Caf\u{e9}");
    }

    #[test]
    fn blank_names_are_rejected() {
        assert_eq!(
            normalize_required_name("   ", "recipe name").unwrap_err(),
            EngineError::InvalidName("recipe name must not be empty".to_string())
        );
    }

    #[test]
    fn search_pattern_ignores_blank() {
        assert_eq!(search_pattern(None), None);
        assert_eq!(search_pattern(Some("  ")), None);
        assert_eq!(search_pattern(Some(" Pasta ")), Some("%pasta%".to_string()));
    }

    #[test]
    fn amounts_must_be_positive() {
        assert!(ensure_positive(1, "amount").is_ok());
        assert_eq!(
            ensure_positive(0, "amount").unwrap_err(),
            EngineError::InvalidAmount("amount must be > 0".to_string())
        );
    }

    #[test]
    fn explicit_ids_are_kept() {
        assert_eq!(id_or_new(Some("7")).unwrap(), "7");
        assert!(id_or_new(Some(" ")).is_err());
        assert!(Uuid::parse_str(&id_or_new(None).unwrap()).is_ok());
    }
}
