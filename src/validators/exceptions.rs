//! Validation messages
//!
//! Hard failures abort construction through [`crate::error::ValidationError`].
//! Everything softer is recorded as a [`ValidationMessage`] on the component.

use crate::error::ValidationError;
use serde::Serialize;
use std::fmt;

/// Severity of a validation message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Severity {
    /// Technically legal, probably a mistake
    Warning,
    /// Construction cannot proceed
    Error,
}

impl Severity {
    /// Get the severity as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A (severity, text, locator) triple
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ValidationMessage {
    /// Severity
    pub severity: Severity,
    /// Message text
    pub text: String,
    /// XPath-like locator, outermost first, e.g. `/ddms:creator/ddms:person`
    pub locator: String,
}

impl ValidationMessage {
    /// Create a warning with no locator
    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            text: text.into(),
            locator: String::new(),
        }
    }

    /// Create an error message with no locator
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            text: text.into(),
            locator: String::new(),
        }
    }

    /// Set the locator
    pub fn with_locator(mut self, locator: impl Into<String>) -> Self {
        self.locator = locator.into();
        self
    }

    /// Re-root the locator under an enclosing element
    pub fn with_parent(mut self, segment: &str) -> Self {
        self.locator = format!("/{}{}", segment, self.locator);
        self
    }

    /// True for warnings
    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }
}

impl From<&ValidationError> for ValidationMessage {
    fn from(err: &ValidationError) -> Self {
        ValidationMessage::error(err.message.clone()).with_locator(err.path())
    }
}

impl fmt::Display for ValidationMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.text)?;
        if !self.locator.is_empty() {
            write!(f, " [{}]", self.locator)?;
        }
        Ok(())
    }
}
