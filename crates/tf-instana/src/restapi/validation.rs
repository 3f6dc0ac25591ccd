//! shared validation policy of data objects
//!
//! Each check reports the offending field by name. Field names follow the attribute names of
//! the REST API (`ID`, `AlertName`, `RuleIds`, ...).
use std::collections::HashSet;
use std::hash::Hash;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} is missing")]
    Missing { field: &'static str },
    #[error("{field} not valid; maximum length of {field} is {max} characters")]
    TooLong { field: &'static str, max: usize },
    #[error("too many {field}; maximum number of {field} is {max}")]
    TooManyItems { field: &'static str, max: usize },
    #[error("{field} must be unique")]
    NotUnique { field: &'static str },
    #[error("either {first} or {second} must be configured")]
    MutuallyExclusive {
        first: &'static str,
        second: &'static str,
    },
    #[error("{value} is not a supported {field}")]
    Unsupported { field: &'static str, value: String },
    #[error("{field} not valid; {reason}")]
    Invalid { field: &'static str, reason: String },
}

pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

pub fn require_non_blank(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if is_blank(value) {
        return Err(ValidationError::Missing { field });
    }
    Ok(())
}

pub fn require_max_length(
    field: &'static str,
    value: &str,
    max: usize,
) -> Result<(), ValidationError> {
    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(())
}

pub fn require_not_empty<T>(field: &'static str, items: &[T]) -> Result<(), ValidationError> {
    if items.is_empty() {
        return Err(ValidationError::Missing { field });
    }
    Ok(())
}

pub fn require_max_items<T>(
    field: &'static str,
    items: &[T],
    max: usize,
) -> Result<(), ValidationError> {
    if items.len() > max {
        return Err(ValidationError::TooManyItems { field, max });
    }
    Ok(())
}

pub fn require_unique<T: Eq + Hash>(
    field: &'static str,
    items: impl IntoIterator<Item = T>,
) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for item in items {
        if !seen.insert(item) {
            return Err(ValidationError::NotUnique { field });
        }
    }
    Ok(())
}

/// Exactly one of two alternative configuration modes must be used
pub fn require_exactly_one_of(
    first: &'static str,
    first_configured: bool,
    second: &'static str,
    second_configured: bool,
) -> Result<(), ValidationError> {
    if first_configured == second_configured {
        return Err(ValidationError::MutuallyExclusive { first, second });
    }
    Ok(())
}

pub fn require_supported(
    field: &'static str,
    value: &str,
    supported: &[&str],
) -> Result<(), ValidationError> {
    if !supported.contains(&value) {
        return Err(ValidationError::Unsupported {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

pub fn require_supported_ignoring_case(
    field: &'static str,
    value: &str,
    supported: &[&str],
) -> Result<(), ValidationError> {
    if !supported.iter().any(|s| s.eq_ignore_ascii_case(value)) {
        return Err(ValidationError::Unsupported {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn blank_strings() {
        assert!(is_blank(""));
        assert!(is_blank(" \t\n"));
        assert!(!is_blank(" x "));
    }

    #[test]
    fn length_counts_characters() {
        assert!(require_max_length("Name", "äöü", 3).is_ok());
        assert_eq!(
            require_max_length("Name", "abcd", 3),
            Err(ValidationError::TooLong {
                field: "Name",
                max: 3
            })
        );
    }

    #[test]
    fn uniqueness() {
        assert!(require_unique("Ids", ["a", "b"]).is_ok());
        assert_eq!(
            require_unique("Ids", ["a", "b", "a"]),
            Err(ValidationError::NotUnique { field: "Ids" })
        );
    }

    #[test]
    fn exclusivity() {
        assert!(require_exactly_one_of("A", true, "B", false).is_ok());
        assert!(require_exactly_one_of("A", false, "B", true).is_ok());
        assert!(require_exactly_one_of("A", true, "B", true).is_err());
        assert!(require_exactly_one_of("A", false, "B", false).is_err());
    }

    #[test]
    fn membership() {
        assert!(require_supported("Scope", "ALL", &["ALL"]).is_ok());
        assert!(require_supported("Scope", "all", &["ALL"]).is_err());
        assert!(require_supported_ignoring_case("EventType", "Critical", &["critical"]).is_ok());
        assert_eq!(
            require_supported_ignoring_case("EventType", "fatal", &["critical"])
                .unwrap_err()
                .to_string(),
            "fatal is not a supported EventType"
        );
    }
}
