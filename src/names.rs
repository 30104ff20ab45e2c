//! XML name validation
//!
//! NCName checks are needed for configured namespace prefixes, `gml:id`
//! values, and the SRS axis/uom label lists.

use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;

static NCNAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[A-Z_a-z\u{C0}-\u{D6}\u{D8}-\u{F6}\u{F8}-\u{2FF}\u{370}-\u{37D}][A-Z_a-z\u{C0}-\u{D6}\u{D8}-\u{F6}\u{F8}-\u{2FF}\u{370}-\u{37D}\-\.0-9\u{B7}]*$",
    )
    .unwrap()
});

/// Check if a string is a valid NCName (non-colonized name)
pub fn is_valid_ncname(name: &str) -> bool {
    !name.is_empty() && NCNAME.is_match(name)
}

/// Check if a string is a valid QName (qualified name)
pub fn is_valid_qname(name: &str) -> bool {
    match name.split_once(':') {
        Some((prefix, local)) => is_valid_ncname(prefix) && is_valid_ncname(local),
        None => is_valid_ncname(name),
    }
}

/// Validate an NCName, reporting failures as validation errors
pub fn validate_ncname(name: &str, what: &str) -> Result<()> {
    if is_valid_ncname(name) {
        Ok(())
    } else {
        Err(Error::invalid(format!(
            "The {} \"{}\" must be a valid NCName.",
            what, name
        )))
    }
}

/// Validate every entry of a space-delimited NCName list
pub fn validate_ncname_list(names: &[String], what: &str) -> Result<()> {
    names.iter().try_for_each(|n| validate_ncname(n, what))
}

/// Split a QName into prefix and local name
pub fn split_qname(qname: &str) -> (Option<&str>, &str) {
    if let Some((prefix, local)) = qname.split_once(':') {
        (Some(prefix), local)
    } else {
        (None, qname)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_ncname() {
        assert!(is_valid_ncname("ddms"));
        assert!(is_valid_ncname("ISM"));
        assert!(is_valid_ncname("IDENTIFIER_1"));
        assert!(is_valid_ncname("my-prefix.2"));

        assert!(!is_valid_ncname(""));
        assert!(!is_valid_ncname("1abc"));
        assert!(!is_valid_ncname("prefix:element"));
        assert!(!is_valid_ncname("has space"));
    }

    #[test]
    fn test_is_valid_qname() {
        assert!(is_valid_qname("ddms:title"));
        assert!(is_valid_qname("title"));

        assert!(!is_valid_qname(""));
        assert!(!is_valid_qname(":title"));
        assert!(!is_valid_qname("ddms:"));
    }

    #[test]
    fn test_split_qname() {
        assert_eq!(split_qname("title"), (None, "title"));
        assert_eq!(split_qname("ISM:Notice"), (Some("ISM"), "Notice"));
    }

    #[test]
    fn test_validate_ncname_list() {
        let labels = vec!["X".to_string(), "Y".to_string()];
        assert!(validate_ncname_list(&labels, "axisLabels").is_ok());

        let bad = vec!["X".to_string(), "2Y".to_string()];
        let err = validate_ncname_list(&bad, "axisLabels").unwrap_err();
        assert!(err.to_string().contains("must be a valid NCName"));
    }
}
