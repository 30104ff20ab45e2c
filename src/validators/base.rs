//! Component contract
//!
//! Every DDMS component owns a [`ComponentCore`] (its element, the version it
//! was built for, and its accumulated warnings) and implements [`Component`].
//! Construction always ends in [`finish`], so parsed and raw-built components
//! go through exactly the same validation path.

use crate::config::Context;
use crate::converters::{self, OutputFormat};
use crate::documents::Element;
use crate::error::{Error, Result};
use crate::namespaces::Vocab;
use crate::versions::DdmsVersion;
use serde_json::Value as JsonValue;
use std::fmt;
use std::hash::{Hash, Hasher};

use super::exceptions::ValidationMessage;

/// State shared by every component
///
/// Equality and hashing look only at the element's qualified name, so that
/// components compare by name and field values; the warnings and the rest of
/// the element tree are derived state.
#[derive(Debug, Clone)]
pub struct ComponentCore {
    element: Element,
    version: DdmsVersion,
    warnings: Vec<ValidationMessage>,
}

impl ComponentCore {
    /// Wrap an element built or parsed for `version`
    pub fn new(element: Element, version: DdmsVersion) -> Self {
        Self {
            element,
            version,
            warnings: Vec::new(),
        }
    }

    /// The underlying element
    pub fn element(&self) -> &Element {
        &self.element
    }

    /// The version the component was validated against
    pub fn version(&self) -> DdmsVersion {
        self.version
    }

    /// Warnings recorded at construction
    pub fn warnings(&self) -> &[ValidationMessage] {
        &self.warnings
    }
}

impl PartialEq for ComponentCore {
    fn eq(&self, other: &Self) -> bool {
        self.element.name == other.element.name && self.element.prefix == other.element.prefix
    }
}

impl Eq for ComponentCore {}

impl Hash for ComponentCore {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.element.name.hash(state);
        self.element.prefix.hash(state);
    }
}

/// Behavior common to all components
pub trait Component: fmt::Debug {
    /// Shared state
    fn core(&self) -> &ComponentCore;

    /// Shared state, mutable during construction only
    fn core_mut(&mut self) -> &mut ComponentCore;

    /// Hard validation; the first failure aborts
    fn validate(&self, ctx: &Context) -> Result<()>;

    /// Soft checks, run after [`Component::validate`] succeeds
    fn validate_warnings(&self, _ctx: &Context) -> Vec<ValidationMessage> {
        Vec::new()
    }

    /// Flat HTML/Text rendering under a dotted-path prefix
    fn output(&self, ctx: &Context, format: OutputFormat, prefix: &str, suffix: &str) -> String;

    /// JSON rendering
    fn to_json(&self) -> JsonValue;

    /// The underlying element
    fn element(&self) -> &Element {
        self.core().element()
    }

    /// Local name of the element
    fn name(&self) -> &str {
        self.element().local_name()
    }

    /// Namespace URI of the element
    fn namespace(&self) -> &str {
        self.element().namespace().unwrap_or("")
    }

    /// Prefix the element is written with
    fn prefix(&self) -> &str {
        self.element().prefix.as_deref().unwrap_or("")
    }

    /// Qualified name, e.g. `ddms:title`
    fn qualified_name(&self) -> String {
        self.element().qualified_name()
    }

    /// Version the component was validated against
    fn version(&self) -> DdmsVersion {
        self.core().version()
    }

    /// Warnings recorded at construction, with locators rooted at this element
    fn validation_warnings(&self) -> &[ValidationMessage] {
        self.core().warnings()
    }

    /// Serialize the element
    fn to_xml(&self) -> Result<String> {
        self.element().to_xml_string()
    }

    /// HTML meta tags
    fn to_html(&self, ctx: &Context) -> String {
        self.output(ctx, OutputFormat::Html, "", "")
    }

    /// Text lines
    fn to_text(&self, ctx: &Context) -> String {
        self.output(ctx, OutputFormat::Text, "", "")
    }

    /// JSON string, pretty-printed if the context asks for it
    fn to_json_string(&self, ctx: &Context) -> Result<String> {
        converters::json_to_string(&self.to_json(), ctx.output.json_pretty_print)
    }
}

/// Validate a freshly assembled component and record its warnings.
///
/// Warnings are stored rooted at the component's own qualified name.
pub fn finish<C: Component>(mut component: C, ctx: &Context) -> Result<C> {
    component.validate(ctx)?;
    let name = component.qualified_name();
    let warnings: Vec<ValidationMessage> = component
        .validate_warnings(ctx)
        .into_iter()
        .map(|w| w.with_parent(&name))
        .collect();
    log::debug!(
        "Validated {} for DDMS {} ({} warning(s))",
        name,
        ctx.version,
        warnings.len()
    );
    component.core_mut().warnings = warnings;
    Ok(component)
}

/// Run a construction step, annotating any validation failure with `name`
pub fn located<T>(name: &str, build: impl FnOnce() -> Result<T>) -> Result<T> {
    build().map_err(|e| e.at(name))
}

/// Require an element to have the expected namespace and local name
pub fn require_qualified_name(element: &Element, namespace: &str, local_name: &str) -> Result<()> {
    if element.name.matches(namespace, local_name) {
        return Ok(());
    }
    Err(Error::invalid(format!(
        "Unexpected namespace URI and local name encountered: {}",
        element.name
    )))
}

/// Start a new element in one of the DDMS vocabularies, using the context's prefix
pub fn build_element(ctx: &Context, vocab: Vocab, local_name: &str) -> Result<Element> {
    Ok(Element::build(
        ctx.prefix(vocab),
        ctx.namespace(vocab)?,
        local_name,
    ))
}

/// Start a child element carrying `text` in the same vocabulary
pub fn text_element(ctx: &Context, vocab: Vocab, local_name: &str, text: &str) -> Result<Element> {
    Ok(build_element(ctx, vocab, local_name)?.with_text(text))
}

/// Set an attribute in one of the DDMS vocabularies, skipping empty values
pub fn set_vocab_attribute(
    element: &mut Element,
    ctx: &Context,
    vocab: Vocab,
    name: &str,
    value: &str,
) -> Result<()> {
    if !value.is_empty() {
        let namespace = ctx.namespace(vocab)?;
        element.set_attribute(Some(ctx.prefix(vocab)), Some(namespace), name, value);
    }
    Ok(())
}
