//! ISM:Notice and ISM:NoticeText, available from DDMS 4.0.1

use crate::attributes::{
    AttributeGroup, NoticeAttributes, NoticeAttributesBuilder, SecurityAttributes,
    SecurityAttributesBuilder,
};
use crate::config::Context;
use crate::converters::{self, OutputFormat};
use crate::documents::Element;
use crate::error::Result;
use crate::namespaces::Vocab;
use crate::validators::base::{self, finish, located, Component, ComponentCore};
use crate::validators::builders::{self, blank_builder, Blank, Builder, DraftList};
use crate::validators::cve::{self, Vocabulary};
use crate::validators::helpers;
use crate::validators::rules::{self, ids};
use crate::validators::ValidationMessage;
use serde_json::{Map, Value as JsonValue};

/// The text of a notice
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NoticeText {
    core: ComponentCore,
    value: String,
    poc_types: Vec<String>,
    security: SecurityAttributes,
}

impl NoticeText {
    /// Element local name
    pub const NAME: &'static str = "NoticeText";

    /// Wrap a parsed element
    pub fn from_element(ctx: &Context, element: Element) -> Result<Self> {
        located(&element.qualified_name(), || {
            rules::check_component(ids::NOTICE_TEXT, ctx.version)?;
            let ism = ctx.namespace(Vocab::Ism)?;
            let poc_types = helpers::split_tokens(element.attribute(ism, "pocType").unwrap_or(""));
            let security = SecurityAttributes::from_element(ctx, &element)?;
            let value = element.text().trim().to_string();
            finish(
                Self {
                    core: ComponentCore::new(element, ctx.version),
                    value,
                    poc_types,
                    security,
                },
                ctx,
            )
        })
    }

    /// Build from raw values
    pub fn new(
        ctx: &Context,
        value: &str,
        poc_types: &[String],
        security: SecurityAttributes,
    ) -> Result<Self> {
        let mut element = base::text_element(ctx, Vocab::Ism, Self::NAME, value.trim())?;
        security.add_to(&mut element, ctx)?;
        let poc_types = helpers::join_tokens(&helpers::non_empty(poc_types));
        base::set_vocab_attribute(&mut element, ctx, Vocab::Ism, "pocType", &poc_types)?;
        Self::from_element(ctx, element)
    }

    /// The notice text
    pub fn value(&self) -> &str {
        &self.value
    }

    /// ISM:pocType tokens
    pub fn poc_types(&self) -> &[String] {
        &self.poc_types
    }

    /// Security attributes
    pub fn security_attributes(&self) -> &SecurityAttributes {
        &self.security
    }
}

impl Component for NoticeText {
    fn core(&self) -> &ComponentCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ComponentCore {
        &mut self.core
    }

    fn validate(&self, ctx: &Context) -> Result<()> {
        rules::check_component(ids::NOTICE_TEXT, ctx.version)?;
        base::require_qualified_name(self.element(), ctx.namespace(Vocab::Ism)?, Self::NAME)?;
        rules::check_present(ids::NOTICE_TEXT, "pocType", !self.poc_types.is_empty(), ctx.version)?;
        cve::validate_all(Vocabulary::PocType, &self.poc_types, ctx)?;
        self.security.validate(ctx)?;
        self.security.require_classification()
    }

    fn validate_warnings(&self, ctx: &Context) -> Vec<ValidationMessage> {
        let mut warnings = Vec::new();
        if self.value.is_empty() {
            warnings.push(helpers::empty_element_warning(&self.qualified_name()));
        }
        warnings.extend(cve::validate_all(Vocabulary::PocType, &self.poc_types, ctx).unwrap_or_default());
        warnings.extend(self.security.warnings(ctx));
        warnings
    }

    fn output(&self, _ctx: &Context, format: OutputFormat, prefix: &str, suffix: &str) -> String {
        let name = format!("{}{}{}", prefix, self.name(), suffix);
        let mut out = converters::render(format, &name, &self.value);
        out.push_str(&converters::render_tokens(format, &format!("{}.pocType", name), &self.poc_types));
        out.push_str(&self.security.output(format, &format!("{}.", name)));
        out
    }

    fn to_json(&self) -> JsonValue {
        let mut map = Map::new();
        converters::json_put(&mut map, "value", &self.value);
        converters::json_put_list(&mut map, "pocType", &self.poc_types);
        converters::json_put_object(&mut map, "securityAttributes", self.security.to_json_map());
        JsonValue::Object(map)
    }
}

/// A notice carried with a resource, made of one or more texts
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Notice {
    core: ComponentCore,
    notice_texts: Vec<NoticeText>,
    security: SecurityAttributes,
    notice_attributes: NoticeAttributes,
}

impl Notice {
    /// Element local name
    pub const NAME: &'static str = "Notice";

    /// Wrap a parsed element
    pub fn from_element(ctx: &Context, element: Element) -> Result<Self> {
        located(&element.qualified_name(), || {
            rules::check_component(ids::NOTICE, ctx.version)?;
            let ism = ctx.namespace(Vocab::Ism)?;
            let notice_texts = element
                .children_named(ism, NoticeText::NAME)
                .map(|child| NoticeText::from_element(ctx, child.clone()))
                .collect::<Result<Vec<_>>>()?;
            let security = SecurityAttributes::from_element(ctx, &element)?;
            let notice_attributes = NoticeAttributes::from_element(ctx, &element)?;
            finish(
                Self {
                    core: ComponentCore::new(element, ctx.version),
                    notice_texts,
                    security,
                    notice_attributes,
                },
                ctx,
            )
        })
    }

    /// Build from raw values
    pub fn new(
        ctx: &Context,
        notice_texts: Vec<NoticeText>,
        security: SecurityAttributes,
        notice_attributes: NoticeAttributes,
    ) -> Result<Self> {
        let mut element = base::build_element(ctx, Vocab::Ism, Self::NAME)?;
        security.add_to(&mut element, ctx)?;
        notice_attributes.add_to(&mut element, ctx)?;
        for text in &notice_texts {
            element.add_child(text.element().clone());
        }
        Self::from_element(ctx, element)
    }

    /// Notice texts
    pub fn notice_texts(&self) -> &[NoticeText] {
        &self.notice_texts
    }

    /// Security attributes
    pub fn security_attributes(&self) -> &SecurityAttributes {
        &self.security
    }

    /// Notice attributes
    pub fn notice_attributes(&self) -> &NoticeAttributes {
        &self.notice_attributes
    }
}

impl Component for Notice {
    fn core(&self) -> &ComponentCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ComponentCore {
        &mut self.core
    }

    fn validate(&self, ctx: &Context) -> Result<()> {
        rules::check_component(ids::NOTICE, ctx.version)?;
        let ism = ctx.namespace(Vocab::Ism)?;
        base::require_qualified_name(self.element(), ism, Self::NAME)?;
        rules::check_children(ids::NOTICE, NoticeText::NAME, self.element(), ism, ctx.version)?;
        self.security.validate(ctx)?;
        self.notice_attributes.validate(ctx)?;
        self.security.require_classification()
    }

    fn validate_warnings(&self, ctx: &Context) -> Vec<ValidationMessage> {
        let mut warnings: Vec<ValidationMessage> = self
            .notice_texts
            .iter()
            .flat_map(|text| text.validation_warnings().iter().cloned())
            .collect();
        warnings.extend(self.security.warnings(ctx));
        warnings.extend(self.notice_attributes.warnings(ctx));
        warnings
    }

    fn output(&self, ctx: &Context, format: OutputFormat, prefix: &str, suffix: &str) -> String {
        let name = format!("{}{}{}.", prefix, self.name(), suffix);
        let level = ctx.output.index_level;
        let total = self.notice_texts.len();
        let mut out = String::new();
        for (i, text) in self.notice_texts.iter().enumerate() {
            out.push_str(&text.output(ctx, format, &name, &converters::index_suffix(level, i, total)));
        }
        out.push_str(&self.security.output(format, &name));
        out.push_str(&self.notice_attributes.output(format, &name));
        out
    }

    fn to_json(&self) -> JsonValue {
        let mut map = Map::new();
        map.insert(
            NoticeText::NAME.to_string(),
            JsonValue::Array(self.notice_texts.iter().map(|t| t.to_json()).collect()),
        );
        converters::json_put_object(&mut map, "securityAttributes", self.security.to_json_map());
        converters::json_put_object(&mut map, "noticeAttributes", self.notice_attributes.to_json_map());
        JsonValue::Object(map)
    }
}

/// Draft of [`NoticeText`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoticeTextBuilder {
    /// Text
    pub value: String,
    /// ISM:pocType tokens
    pub poc_types: DraftList<String>,
    /// Security attributes
    pub security: SecurityAttributesBuilder,
}

impl Builder for NoticeTextBuilder {
    type Target = NoticeText;

    fn is_empty(&self) -> bool {
        self.value.is_blank() && self.poc_types.is_blank() && self.security.is_empty()
    }

    fn build(&self, ctx: &Context) -> Result<NoticeText> {
        NoticeText::new(
            ctx,
            &self.value,
            &self.poc_types.values(),
            self.security.commit_or_empty(ctx)?,
        )
    }
}

blank_builder!(NoticeTextBuilder);

impl From<&NoticeText> for NoticeTextBuilder {
    fn from(text: &NoticeText) -> Self {
        Self {
            value: text.value.clone(),
            poc_types: text.poc_types.as_slice().into(),
            security: (&text.security).into(),
        }
    }
}

/// Draft of [`Notice`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoticeBuilder {
    /// Notice texts
    pub notice_texts: DraftList<NoticeTextBuilder>,
    /// Security attributes
    pub security: SecurityAttributesBuilder,
    /// Notice attributes
    pub notice_attributes: NoticeAttributesBuilder,
}

impl Builder for NoticeBuilder {
    type Target = Notice;

    fn is_empty(&self) -> bool {
        self.notice_texts.is_blank() && self.security.is_empty() && self.notice_attributes.is_empty()
    }

    fn build(&self, ctx: &Context) -> Result<Notice> {
        let name = format!("{}:{}", ctx.prefix(Vocab::Ism), Notice::NAME);
        let notice_texts = located(&name, || builders::commit_all(&self.notice_texts, ctx))?;
        Notice::new(
            ctx,
            notice_texts,
            self.security.commit_or_empty(ctx)?,
            self.notice_attributes.commit_or_empty(ctx)?,
        )
    }
}

blank_builder!(NoticeBuilder);

impl From<&Notice> for NoticeBuilder {
    fn from(notice: &Notice) -> Self {
        Self {
            notice_texts: notice.notice_texts.iter().map(NoticeTextBuilder::from).collect(),
            security: (&notice.security).into(),
            notice_attributes: (&notice.notice_attributes).into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::versions::DdmsVersion;
    use pretty_assertions::assert_eq;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn security(ctx: &Context) -> SecurityAttributes {
        SecurityAttributes::new(ctx, "U", &strings(&["USA"])).unwrap()
    }

    fn text(ctx: &Context, value: &str) -> NoticeText {
        NoticeText::new(ctx, value, &[], security(ctx)).unwrap()
    }

    #[test]
    fn test_valid_notice() {
        let ctx = Context::new(DdmsVersion::V4_1);
        let attributes = NoticeAttributes::new(&ctx, "DoD-Dist-B", "noticeReason", "2011-09-15", "", None)
            .unwrap();
        let notice = Notice::new(&ctx, vec![text(&ctx, "noticeText")], security(&ctx), attributes)
            .unwrap();
        assert_eq!(notice.qualified_name(), "ISM:Notice");
        assert_eq!(notice.notice_texts()[0].value(), "noticeText");
        assert!(notice.validation_warnings().is_empty());
    }

    #[test]
    fn test_gated_before_4_0_1() {
        let ctx = Context::new(DdmsVersion::V3_1);
        let err = NoticeText::new(&ctx, "noticeText", &[], security(&ctx)).unwrap_err();
        let err = err.as_validation().unwrap();
        assert_eq!(
            err.message,
            "The NoticeText element cannot be used until DDMS 4.0.1 or later."
        );
        assert_eq!(err.path(), "/ISM:NoticeText");
    }

    #[test]
    fn test_notice_text_required() {
        let ctx = Context::new(DdmsVersion::V5_0);
        let err = Notice::new(&ctx, Vec::new(), security(&ctx), NoticeAttributes::empty()).unwrap_err();
        assert_eq!(
            err.as_validation().unwrap().message,
            "At least 1 NoticeText element must exist."
        );
    }

    #[test]
    fn test_empty_text_warns() {
        let ctx = Context::new(DdmsVersion::V5_0);
        let notice = Notice::new(&ctx, vec![text(&ctx, "")], security(&ctx), NoticeAttributes::empty())
            .unwrap();
        let warnings = notice.validation_warnings();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].text, "A ISM:NoticeText element was found with no value.");
        assert_eq!(warnings[0].locator, "/ISM:Notice/ISM:NoticeText");
    }

    #[test]
    fn test_poc_type() {
        let poc_types = strings(&["DoD-Dist-B"]);
        let old = Context::new(DdmsVersion::V4_0_1);
        let err = NoticeText::new(&old, "noticeText", &poc_types, security(&old)).unwrap_err();
        assert_eq!(
            err.as_validation().unwrap().message,
            "The pocType attribute cannot be used until DDMS 4.1 or later."
        );

        let ctx = Context::new(DdmsVersion::V4_1);
        let text = NoticeText::new(&ctx, "noticeText", &poc_types, security(&ctx)).unwrap();
        assert_eq!(text.poc_types(), &["DoD-Dist-B"]);
        assert!(NoticeText::new(&ctx, "noticeText", &strings(&["Unknown"]), security(&ctx)).is_err());

        let lenient = Context::lenient(DdmsVersion::V4_1);
        let text = NoticeText::new(&lenient, "noticeText", &strings(&["Unknown"]), security(&lenient))
            .unwrap();
        assert_eq!(text.validation_warnings().len(), 1);
    }

    #[test]
    fn test_output() {
        let ctx = Context::new(DdmsVersion::V5_0);
        let notice = Notice::new(&ctx, vec![text(&ctx, "noticeText")], security(&ctx), NoticeAttributes::empty())
            .unwrap();
        assert_eq!(
            notice.to_text(&ctx),
            "Notice.NoticeText: noticeText\n\
             Notice.NoticeText.classification: U\n\
             Notice.NoticeText.ownerProducer: USA\n\
             Notice.classification: U\n\
             Notice.ownerProducer: USA\n"
        );
    }

    #[test]
    fn test_builder() {
        let ctx = Context::new(DdmsVersion::V5_0);
        let mut builder = NoticeBuilder::default();
        builder.notice_texts.ensure_len(2);
        assert!(builder.commit(&ctx).unwrap().is_none());

        let text = builder.notice_texts.slot(0);
        text.value = "noticeText".to_string();
        let err = builder.commit(&ctx).unwrap_err();
        assert_eq!(
            err.as_validation().unwrap().path(),
            "/ISM:Notice/ISM:NoticeText"
        );

        let text = builder.notice_texts.slot(0);
        text.security.classification = "U".to_string();
        *text.security.owner_producers.slot(0) = "USA".to_string();
        builder.security = (&security(&ctx)).into();
        let notice = builder.commit(&ctx).unwrap().unwrap();
        assert_eq!(notice.notice_texts().len(), 1);
    }
}
