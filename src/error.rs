//! Error types for ddms-rs
//!
//! This module defines the two-tier error taxonomy used throughout the library:
//! hard validation failures (which abort construction) and configuration errors.
//! Soft warnings are not errors; see [`crate::validators::ValidationMessage`].

use std::fmt;
use thiserror::Error;

/// Result type alias using the ddms Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for ddms operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A component or attribute group failed validation
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Unsupported version, unknown property, or a feature used outside its version window
    #[error("configuration error: {0}")]
    Configuration(String),

    /// XML parsing or serialization error
    #[error("XML error: {0}")]
    Xml(String),

    /// Value error (a raw value could not be interpreted)
    #[error("value error: {0}")]
    Value(String),
}

impl Error {
    /// Shorthand for a validation failure with no locator yet
    pub fn invalid(message: impl Into<String>) -> Self {
        Error::Validation(ValidationError::new(message))
    }

    /// Push a locator segment onto a validation failure while it bubbles up.
    ///
    /// Non-validation errors pass through untouched.
    pub fn at(self, segment: impl Into<String>) -> Self {
        match self {
            Error::Validation(err) => Error::Validation(err.at(segment)),
            other => other,
        }
    }

    /// The validation error, if this is one
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Error::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Xml(err.to_string())
    }
}

/// Hard validation failure with an accumulating locator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Error message
    pub message: String,
    /// Qualified names of the enclosing elements, innermost first
    pub locator: Vec<String>,
    /// Original reason, when the failure wraps a lower-level problem
    pub reason: Option<String>,
}

impl ValidationError {
    /// Create a new validation error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            locator: Vec::new(),
            reason: None,
        }
    }

    /// Push the qualified name of an enclosing element
    pub fn at(mut self, segment: impl Into<String>) -> Self {
        self.locator.push(segment.into());
        self
    }

    /// Set the reason
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// The locator rendered outermost first, e.g. `/ddms:creator/ddms:person`
    pub fn path(&self) -> String {
        self.locator
            .iter()
            .rev()
            .fold(String::new(), |mut acc, segment| {
                acc.push('/');
                acc.push_str(segment);
                acc
            })
    }

    /// The innermost element the failure was reported against
    pub fn element(&self) -> Option<&str> {
        self.locator.first().map(|s| s.as_str())
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        if let Some(ref reason) = self.reason {
            write!(f, "\n\nReason: {}", reason)?;
        }

        if !self.locator.is_empty() {
            write!(f, "\n\nLocator: {}", self.path())?;
        }

        Ok(())
    }
}

impl std::error::Error for ValidationError {}
