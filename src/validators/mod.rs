//! Validation framework
//!
//! This module contains the pieces every component is assembled from:
//! - [`base`]: the [`Component`] contract and construction helpers
//! - [`builders`]: the [`Builder`] contract and [`DraftList`]
//! - [`cve`]: controlled vocabulary checks
//! - [`rules`]: the version-gating and cardinality table
//! - [`exceptions`]: warning and error messages
//! - [`helpers`]: lexical checks

pub mod base;
pub mod builders;
pub mod cve;
pub mod exceptions;
pub mod helpers;
pub mod rules;

pub use base::{finish, located, Component, ComponentCore};
pub use builders::{Blank, Builder, DraftList};
pub use cve::Vocabulary;
pub use exceptions::{Severity, ValidationMessage};
pub use rules::{Availability, Cardinality, FieldKind, FieldRule};
