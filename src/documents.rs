//! XML element tree
//!
//! Components own an [`Element`], either parsed from a document or built from
//! raw values. Parsing resolves every prefix against the in-scope declarations
//! so element and attribute names carry their namespace URIs; serialization
//! declares each used prefix once, on the outermost element that needs it.

use crate::error::{Error, Result};
use crate::namespaces::{NamespaceContext, NamespaceScope, QName};
use indexmap::IndexMap;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

/// XML namespace, bound to the `xml` prefix without declaration
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// Maximum element nesting accepted by the parser
pub const MAX_DEPTH: usize = 1000;

/// An attribute value with the prefix it was written with
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Attribute {
    /// Prefix (None for unqualified attributes)
    pub prefix: Option<String>,
    /// Attribute value
    pub value: String,
}

/// XML Element in the document tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Element qualified name
    pub name: QName,
    /// Prefix the element is written with
    pub prefix: Option<String>,
    /// Element attributes, in document order
    pub attributes: IndexMap<QName, Attribute>,
    /// Text content (if any)
    pub text: Option<String>,
    /// Child elements
    pub children: Vec<Element>,
    /// Namespace declarations made on this element
    pub namespaces: NamespaceContext,
}

impl Element {
    /// Create a new element
    pub fn new(name: QName) -> Self {
        Self {
            name,
            prefix: None,
            attributes: IndexMap::new(),
            text: None,
            children: Vec::new(),
            namespaces: NamespaceContext::new(),
        }
    }

    /// Create a prefixed element in a namespace
    pub fn build(prefix: &str, namespace: &str, local_name: &str) -> Self {
        let mut element = Self::new(QName::namespaced(namespace, local_name));
        element.prefix = Some(prefix.to_string());
        element
    }

    /// Get the local name of the element
    pub fn local_name(&self) -> &str {
        &self.name.local_name
    }

    /// Get the namespace of the element
    pub fn namespace(&self) -> Option<&str> {
        self.name.namespace.as_deref()
    }

    /// The name as written, e.g. `ddms:title`
    pub fn qualified_name(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}:{}", prefix, self.name.local_name),
            None => self.name.local_name.clone(),
        }
    }

    /// Get an unqualified attribute value by local name
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .get(&QName::local(name))
            .map(|a| a.value.as_str())
    }

    /// Get a namespaced attribute value
    pub fn attribute(&self, namespace: &str, name: &str) -> Option<&str> {
        self.attributes
            .get(&QName::namespaced(namespace, name))
            .map(|a| a.value.as_str())
    }

    /// Set an attribute, replacing any previous value
    pub fn set_attribute(
        &mut self,
        prefix: Option<&str>,
        namespace: Option<&str>,
        name: &str,
        value: impl Into<String>,
    ) {
        self.attributes.insert(
            QName::new(namespace, name),
            Attribute {
                prefix: prefix.map(|p| p.to_string()),
                value: value.into(),
            },
        );
    }

    /// Builder-style [`Element::set_attribute`] that skips empty values
    pub fn with_attribute(
        mut self,
        prefix: Option<&str>,
        namespace: Option<&str>,
        name: &str,
        value: &str,
    ) -> Self {
        if !value.is_empty() {
            self.set_attribute(prefix, namespace, name, value);
        }
        self
    }

    /// Add a child element
    pub fn add_child(&mut self, child: Element) {
        self.children.push(child);
    }

    /// Builder-style [`Element::add_child`]
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Set text content
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
    }

    /// Builder-style text setter that skips empty values
    pub fn with_text(mut self, text: &str) -> Self {
        if !text.is_empty() {
            self.text = Some(text.to_string());
        }
        self
    }

    /// Text content, or the empty string
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    /// Child elements with a given namespace and local name
    pub fn children_named<'a: 'b, 'b>(
        &'a self,
        namespace: &'b str,
        local_name: &'b str,
    ) -> impl Iterator<Item = &'a Element> + 'b {
        self.children
            .iter()
            .filter(move |e| e.name.matches(namespace, local_name))
    }

    /// First child with a given namespace and local name
    pub fn first_child(&self, namespace: &str, local_name: &str) -> Option<&Element> {
        self.children
            .iter()
            .find(|e| e.name.matches(namespace, local_name))
    }

    /// Text of the first matching child
    pub fn child_text(&self, namespace: &str, local_name: &str) -> Option<String> {
        self.first_child(namespace, local_name)
            .map(|e| e.text().to_string())
    }

    /// Texts of every matching child, in document order
    pub fn child_texts(&self, namespace: &str, local_name: &str) -> Vec<String> {
        self.children_named(namespace, local_name)
            .map(|e| e.text().to_string())
            .collect()
    }

    /// Serialize this element and its subtree
    pub fn to_xml_string(&self) -> Result<String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        let mut scope: Vec<(Option<String>, String)> = Vec::new();

        // Declare everything the subtree uses on the outermost element.
        let mut root_decls = Vec::new();
        self.collect_prefixes(&mut root_decls);
        self.write(&mut writer, &mut scope, root_decls)?;

        String::from_utf8(writer.into_inner())
            .map_err(|e| Error::Xml(format!("Serialized XML is not UTF-8: {}", e)))
    }

    fn collect_prefixes(&self, out: &mut Vec<(Option<String>, String)>) {
        let mut note = |prefix: &Option<String>, namespace: Option<&str>| {
            if let Some(ns) = namespace {
                if prefix.as_deref() == Some("xml") {
                    return;
                }
                if !out.iter().any(|(p, _)| p == prefix) {
                    out.push((prefix.clone(), ns.to_string()));
                }
            }
        };
        note(&self.prefix, self.namespace());
        for (name, attr) in &self.attributes {
            note(&attr.prefix, name.namespace.as_deref());
        }
        for child in &self.children {
            child.collect_prefixes(out);
        }
    }

    fn write(
        &self,
        writer: &mut Writer<Vec<u8>>,
        scope: &mut Vec<(Option<String>, String)>,
        mut declarations: Vec<(Option<String>, String)>,
    ) -> Result<()> {
        let mut needed = |prefix: &Option<String>, namespace: Option<&str>| {
            let Some(ns) = namespace else { return };
            if prefix.as_deref() == Some("xml") {
                return;
            }
            let in_scope = declarations
                .iter()
                .chain(scope.iter().rev())
                .find(|(p, _)| p == prefix)
                .map(|(_, uri)| uri.as_str());
            if in_scope != Some(ns) {
                declarations.push((prefix.clone(), ns.to_string()));
            }
        };
        needed(&self.prefix, self.namespace());
        for (name, attr) in &self.attributes {
            needed(&attr.prefix, name.namespace.as_deref());
        }

        let tag = self.qualified_name();
        let mut start = BytesStart::new(tag.as_str());
        for (prefix, uri) in &declarations {
            let key = match prefix {
                Some(p) => format!("xmlns:{}", p),
                None => "xmlns".to_string(),
            };
            start.push_attribute((key.as_str(), uri.as_str()));
        }
        for (name, attr) in &self.attributes {
            let key = match &attr.prefix {
                Some(p) => format!("{}:{}", p, name.local_name),
                None => name.local_name.clone(),
            };
            start.push_attribute((key.as_str(), attr.value.as_str()));
        }

        let pushed = declarations.len();
        scope.extend(declarations);

        if self.children.is_empty() && self.text.is_none() {
            writer.write_event(Event::Empty(start))?;
        } else {
            writer.write_event(Event::Start(start))?;
            if let Some(text) = &self.text {
                writer.write_event(Event::Text(BytesText::new(text)))?;
            }
            for child in &self.children {
                child.write(writer, scope, Vec::new())?;
            }
            writer.write_event(Event::End(BytesEnd::new(tag.as_str())))?;
        }

        scope.truncate(scope.len() - pushed);
        Ok(())
    }
}

/// XML Document representation
#[derive(Debug, Default)]
pub struct Document {
    /// Root element of the document
    pub root: Option<Element>,
}

impl Document {
    /// Create a new empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an XML document from a string
    pub fn from_string(xml: &str) -> Result<Self> {
        Self::parse(xml.as_bytes())
    }

    /// Parse an XML document from bytes
    pub fn parse(xml: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(xml);
        reader.trim_text(true);

        let mut doc = Document::new();
        let mut scope = NamespaceScope::new();
        let mut element_stack: Vec<Element> = Vec::new();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => {
                    if element_stack.len() >= MAX_DEPTH {
                        return Err(Error::Xml(format!(
                            "XML depth exceeds maximum {}",
                            MAX_DEPTH
                        )));
                    }
                    let element = Self::parse_element(&e, &mut scope)?;
                    log::trace!("start <{}>", element.qualified_name());
                    element_stack.push(element);
                }
                Ok(Event::End(_)) => {
                    scope.pop();
                    if let Some(current) = element_stack.pop() {
                        if let Some(parent) = element_stack.last_mut() {
                            parent.add_child(current);
                        } else {
                            doc.root = Some(current);
                        }
                    }
                }
                Ok(Event::Empty(e)) => {
                    let element = Self::parse_element(&e, &mut scope)?;
                    scope.pop();
                    log::trace!("empty <{}/>", element.qualified_name());
                    if let Some(parent) = element_stack.last_mut() {
                        parent.add_child(element);
                    } else {
                        doc.root = Some(element);
                    }
                }
                Ok(Event::Text(e)) => {
                    if let Some(current) = element_stack.last_mut() {
                        let text = e
                            .unescape()
                            .map_err(|e| Error::Xml(format!("Failed to unescape text: {}", e)))?;
                        if !text.trim().is_empty() {
                            let mut combined = current.text.take().unwrap_or_default();
                            combined.push_str(&text);
                            current.set_text(combined);
                        }
                    }
                }
                Ok(Event::CData(e)) => {
                    if let Some(current) = element_stack.last_mut() {
                        let text = String::from_utf8_lossy(&e.into_inner()).to_string();
                        let mut combined = current.text.take().unwrap_or_default();
                        combined.push_str(&text);
                        current.set_text(combined);
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(Error::Xml(format!(
                        "Error parsing XML at position {}: {}",
                        reader.buffer_position(),
                        e
                    )))
                }
                _ => {} // Comments, processing instructions, declarations
            }
            buf.clear();
        }

        if !element_stack.is_empty() {
            return Err(Error::Xml("Unexpected end of document".to_string()));
        }

        Ok(doc)
    }

    /// Parse element from a start tag, pushing its declarations onto `scope`
    fn parse_element(start: &BytesStart, scope: &mut NamespaceScope) -> Result<Element> {
        let name = std::str::from_utf8(start.name().as_ref())
            .map_err(|e| Error::Xml(format!("Invalid element name: {}", e)))?
            .to_string();

        let mut declarations = NamespaceContext::new();
        let mut raw_attributes = Vec::new();

        for attr_result in start.attributes() {
            let attr = attr_result
                .map_err(|e| Error::Xml(format!("Failed to parse attribute: {}", e)))?;

            let attr_name = std::str::from_utf8(attr.key.as_ref())
                .map_err(|e| Error::Xml(format!("Invalid attribute name: {}", e)))?
                .to_string();

            let attr_value = attr
                .unescape_value()
                .map_err(|e| Error::Xml(format!("Failed to unescape attribute value: {}", e)))?
                .to_string();

            if attr_name == "xmlns" {
                declarations.set_default_namespace(&attr_value);
            } else if let Some(prefix) = attr_name.strip_prefix("xmlns:") {
                declarations.add_prefix(prefix, &attr_value);
            } else {
                raw_attributes.push((attr_name, attr_value));
            }
        }

        scope.push(declarations.clone());

        let (prefix, local) = split_name(&name);
        let namespace = resolve(scope, prefix, true)?;
        let mut element = Element::new(QName::new(namespace, local));
        element.prefix = prefix.map(|p| p.to_string());
        element.namespaces = declarations;

        for (attr_name, attr_value) in raw_attributes {
            let (prefix, local) = split_name(&attr_name);
            // Unprefixed attributes are in no namespace.
            let namespace = resolve(scope, prefix, false)?;
            element.set_attribute(prefix, namespace.as_deref(), local, attr_value);
        }

        Ok(element)
    }

    /// Get the root element
    pub fn root(&self) -> Option<&Element> {
        self.root.as_ref()
    }

    /// Take ownership of the root element
    pub fn into_root(self) -> Result<Element> {
        self.root
            .ok_or_else(|| Error::Xml("Document has no root element".to_string()))
    }
}

fn split_name(name: &str) -> (Option<&str>, &str) {
    match name.split_once(':') {
        Some((prefix, local)) => (Some(prefix), local),
        None => (None, name),
    }
}

fn resolve(
    scope: &NamespaceScope,
    prefix: Option<&str>,
    use_default: bool,
) -> Result<Option<String>> {
    match prefix {
        Some("xml") => Ok(Some(XML_NAMESPACE.to_string())),
        Some(p) => scope
            .lookup(Some(p))
            .map(|ns| Some(ns.to_string()))
            .ok_or_else(|| Error::Xml(format!("Unknown prefix: {}", p))),
        None if use_default => Ok(scope.lookup(None).map(|ns| ns.to_string())),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DDMS5: &str = "urn:us:mil:ces:metadata:ddms:5";

    #[test]
    fn test_document_creation() {
        let doc = Document::new();
        assert!(doc.root.is_none());
    }

    #[test]
    fn test_parse_resolves_namespaces() {
        let xml = r#"<ddms:title xmlns:ddms="urn:us:mil:ces:metadata:ddms:5" xmlns:ISM="urn:us:gov:ic:ism" ISM:classification="U">Title</ddms:title>"#;
        let root = Document::from_string(xml).unwrap().into_root().unwrap();

        assert_eq!(root.namespace(), Some(DDMS5));
        assert_eq!(root.local_name(), "title");
        assert_eq!(root.qualified_name(), "ddms:title");
        assert_eq!(root.attribute("urn:us:gov:ic:ism", "classification"), Some("U"));
        assert_eq!(root.text(), "Title");
    }

    #[test]
    fn test_parse_default_namespace_not_applied_to_attributes() {
        let xml = r#"<root xmlns="http://example.com" attr="v"><child/></root>"#;
        let root = Document::from_string(xml).unwrap().into_root().unwrap();

        assert_eq!(root.namespace(), Some("http://example.com"));
        assert_eq!(root.get_attribute("attr"), Some("v"));
        assert_eq!(root.children[0].namespace(), Some("http://example.com"));
    }

    #[test]
    fn test_unknown_prefix_fails() {
        let xml = r#"<ddms:title>Title</ddms:title>"#;
        assert!(matches!(Document::from_string(xml), Err(Error::Xml(_))));
    }

    #[test]
    fn test_children_named() {
        let xml = r#"<ddms:person xmlns:ddms="urn:us:mil:ces:metadata:ddms:5"><ddms:name>A</ddms:name><ddms:surname>B</ddms:surname><ddms:name>C</ddms:name></ddms:person>"#;
        let root = Document::from_string(xml).unwrap().into_root().unwrap();

        assert_eq!(root.child_texts(DDMS5, "name"), vec!["A", "C"]);
        assert_eq!(root.child_text(DDMS5, "surname").as_deref(), Some("B"));
    }

    #[test]
    fn test_found_children_outlive_the_lookup_names() {
        let xml = r#"<ddms:person xmlns:ddms="urn:us:mil:ces:metadata:ddms:5"><ddms:name>A</ddms:name><ddms:surname>B</ddms:surname><ddms:name>C</ddms:name></ddms:person>"#;
        let root = Document::from_string(xml).unwrap().into_root().unwrap();

        let (surname, names) = {
            let namespace = DDMS5.to_string();
            let surname = root.first_child(&namespace, "surname");
            let names: Vec<&Element> = root.children_named(&namespace, "name").collect();
            (surname, names)
        };
        assert_eq!(surname.map(|e| e.text()), Some("B"));
        assert_eq!(names.len(), 2);
        assert!(root.first_child(DDMS5, "email").is_none());
    }

    #[test]
    fn test_serialize_declares_prefixes_once() {
        let element = Element::build("ddms", DDMS5, "person")
            .with_child(Element::build("ddms", DDMS5, "name").with_text("Brian"))
            .with_child(Element::build("ddms", DDMS5, "surname").with_text("Uri & Co"));

        let xml = element.to_xml_string().unwrap();
        assert_eq!(xml.matches("xmlns:ddms").count(), 1);
        assert!(xml.contains("<ddms:name>Brian</ddms:name>"));
        assert!(xml.contains("Uri &amp; Co"));
    }

    #[test]
    fn test_serialize_then_parse() {
        let element = Element::build("ddms", DDMS5, "keyword")
            .with_attribute(Some("ddms"), Some(DDMS5), "value", "xml")
            .with_attribute(Some("ISM"), Some("urn:us:gov:ic:ism"), "classification", "U");

        let xml = element.to_xml_string().unwrap();
        let parsed = Document::from_string(&xml).unwrap().into_root().unwrap();
        assert_eq!(parsed.attribute(DDMS5, "value"), Some("xml"));
        assert_eq!(parsed.to_xml_string().unwrap(), xml);
    }
}
