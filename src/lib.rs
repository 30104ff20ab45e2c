//! # ddms-rs
//!
//! A versioned object model for the DDMS (Department of Defense Discovery
//! Metadata Specification) metadata standard and the ISM, NTK and GML attribute
//! vocabularies it uses.
//!
//! Every component is an immutable value, validated once when constructed and
//! never touched again. It can be built two ways:
//!
//! - from a parsed XML element, or
//! - from raw field values.
//!
//! Both paths produce the same value, and the same validation messages, for
//! any of the supported DDMS versions (2.0, 3.0, 3.1, 4.0.1, 4.1 and 5.0). The
//! target version travels in an explicit [`Context`]; nothing in validation
//! reads global state.
//!
//! ## Features
//!
//! - Version gating and cardinality rules kept in one declarative table
//! - Controlled vocabulary (CVE) checks, as hard errors or as warnings
//! - Validation errors that carry the path of the failing element
//! - Mutable builders with auto-padding lists for form-style editing
//! - XML, HTML, Text and JSON output
//!
//! ## Example
//!
//! ```rust
//! use ddms::attributes::SecurityAttributes;
//! use ddms::components::Title;
//! use ddms::validators::Component;
//! use ddms::{Context, DdmsVersion};
//!
//! let ctx = Context::new(DdmsVersion::V5_0);
//! let security = SecurityAttributes::new(&ctx, "U", &["USA".to_string()])?;
//! let title = Title::new(&ctx, "Far Side Collection", security)?;
//! assert_eq!(title.to_text(&ctx), "title: Far Side Collection\ntitle.classification: U\ntitle.ownerProducer: USA\n");
//! # Ok::<(), ddms::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Foundation
pub mod error;
pub mod versions;
pub mod namespaces;
pub mod names;
pub mod config;

// XML documents
pub mod documents;

// Validation framework
pub mod validators;

// Attribute groups and components
pub mod attributes;
pub mod components;

// Flat output formats
pub mod converters;

// Re-exports for convenience
pub use components::DdmsComponent;
pub use config::{Context, CvePolicy, IndexLevel, OutputConfig};
pub use error::{Error, Result, ValidationError};
pub use namespaces::Vocab;
pub use validators::{Builder, Component, DraftList, ValidationMessage};
pub use versions::DdmsVersion;

/// Version of the ddms-rs library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
