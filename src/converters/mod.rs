//! Output rendering
//!
//! Components render three flat formats besides XML:
//!
//! - HTML: one `<meta name="..." content="..." />` tag per value
//! - Text: one `name: value` line per value
//! - JSON: a `serde_json` object mirroring the field structure
//!
//! HTML and Text names are dotted paths (`creator.organization.name`). The
//! caller passes the path built so far; repeated values and nested components
//! get an index suffix such as `[2]` according to [`IndexLevel`].

use crate::config::IndexLevel;
use crate::error::{Error, Result};
use serde_json::{Map, Value as JsonValue};

/// Flat output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// HTML meta tags
    Html,
    /// Plain text lines
    Text,
}

/// Render one name/value pair; empty values render nothing
pub fn render(format: OutputFormat, name: &str, value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }
    match format {
        OutputFormat::Html => format!(
            "<meta name=\"{}\" content=\"{}\" />\n",
            quick_xml::escape::escape(name),
            quick_xml::escape::escape(value)
        ),
        OutputFormat::Text => format!("{}: {}\n", name, value),
    }
}

/// Render a repeated value, one line per entry
pub fn render_values(
    format: OutputFormat,
    name: &str,
    values: &[String],
    level: IndexLevel,
) -> String {
    values
        .iter()
        .enumerate()
        .map(|(i, value)| {
            let indexed = format!("{}{}", name, index_suffix(level, i, values.len()));
            render(format, &indexed, value)
        })
        .collect()
}

/// Render a token list on one line, space-joined
pub fn render_tokens(format: OutputFormat, name: &str, tokens: &[String]) -> String {
    render(format, name, &tokens.join(" "))
}

/// Index suffix for entry `index` (zero-based) of `total`
pub fn index_suffix(level: IndexLevel, index: usize, total: usize) -> String {
    let show = match level {
        IndexLevel::Never => false,
        IndexLevel::WhenMultiple => total > 1,
        IndexLevel::Always => true,
    };
    if show {
        format!("[{}]", index + 1)
    } else {
        String::new()
    }
}

/// Build the prefix handed to a nested component or attribute group
pub fn nested_prefix(prefix: &str, name: &str, suffix: &str) -> String {
    format!("{}{}{}.", prefix, name, suffix)
}

/// Insert a string unless it is empty
pub fn json_put(map: &mut Map<String, JsonValue>, key: &str, value: &str) {
    if !value.is_empty() {
        map.insert(key.to_string(), JsonValue::String(value.to_string()));
    }
}

/// Insert a string array unless it is empty
pub fn json_put_list(map: &mut Map<String, JsonValue>, key: &str, values: &[String]) {
    if !values.is_empty() {
        map.insert(
            key.to_string(),
            JsonValue::Array(values.iter().cloned().map(JsonValue::String).collect()),
        );
    }
}

/// Insert a boolean if set
pub fn json_put_bool(map: &mut Map<String, JsonValue>, key: &str, value: Option<bool>) {
    if let Some(value) = value {
        map.insert(key.to_string(), JsonValue::Bool(value));
    }
}

/// Insert a nested object unless it is empty
pub fn json_put_object(map: &mut Map<String, JsonValue>, key: &str, object: Map<String, JsonValue>) {
    if !object.is_empty() {
        map.insert(key.to_string(), JsonValue::Object(object));
    }
}

/// Serialize a JSON value, pretty-printed or compact
pub fn json_to_string(value: &JsonValue, pretty: bool) -> Result<String> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    rendered.map_err(|e| Error::Value(format!("Failed to serialize JSON: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_html_escapes() {
        assert_eq!(
            render(OutputFormat::Html, "title", "Tom & \"Jerry\""),
            "<meta name=\"title\" content=\"Tom &amp; &quot;Jerry&quot;\" />\n"
        );
    }

    #[test]
    fn test_render_text_skips_empty() {
        assert_eq!(render(OutputFormat::Text, "title", ""), "");
        assert_eq!(render(OutputFormat::Text, "title", "A"), "title: A\n");
    }

    #[test]
    fn test_render_values_index_levels() {
        let values = vec!["Brian".to_string(), "BU".to_string()];
        assert_eq!(
            render_values(OutputFormat::Text, "person.name", &values, IndexLevel::Never),
            "person.name: Brian\nperson.name: BU\n"
        );
        assert_eq!(
            render_values(OutputFormat::Text, "person.name", &values, IndexLevel::WhenMultiple),
            "person.name[1]: Brian\nperson.name[2]: BU\n"
        );
        let single = vec!["Uri".to_string()];
        assert_eq!(
            render_values(OutputFormat::Text, "person.surname", &single, IndexLevel::WhenMultiple),
            "person.surname: Uri\n"
        );
        assert_eq!(
            render_values(OutputFormat::Text, "person.surname", &single, IndexLevel::Always),
            "person.surname[1]: Uri\n"
        );
    }

    #[test]
    fn test_render_tokens() {
        let tokens = vec!["USA".to_string(), "GBR".to_string()];
        assert_eq!(
            render_tokens(OutputFormat::Text, "title.ownerProducer", &tokens),
            "title.ownerProducer: USA GBR\n"
        );
    }

    #[test]
    fn test_json_helpers() {
        let mut map = Map::new();
        json_put(&mut map, "empty", "");
        json_put(&mut map, "name", "x");
        json_put_list(&mut map, "none", &[]);
        json_put_bool(&mut map, "flag", Some(true));
        assert_eq!(JsonValue::Object(map).to_string(), r#"{"flag":true,"name":"x"}"#);
    }
}
