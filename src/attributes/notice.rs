//! ISM notice attributes

use super::security::AttrValue;
use super::AttributeGroup;
use crate::config::Context;
use crate::converters::OutputFormat;
use crate::documents::Element;
use crate::error::Result;
use crate::namespaces::Vocab;
use crate::validators::builders::{blank_builder, Blank, Builder};
use crate::validators::cve::{self, Vocabulary};
use crate::validators::helpers;
use crate::validators::rules::{self, ids};
use crate::validators::ValidationMessage;
use serde_json::{Map, Value as JsonValue};

/// Longest accepted noticeReason / unregisteredNoticeType
pub const MAX_LENGTH: usize = 2048;

/// ISM notice attributes, available from DDMS 4.0.1
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NoticeAttributes {
    pub(crate) notice_type: String,
    pub(crate) notice_reason: String,
    pub(crate) notice_date: String,
    pub(crate) unregistered_notice_type: String,
    pub(crate) external_notice: Option<bool>,
}

impl NoticeAttributes {
    /// The empty group
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a validated group
    pub fn new(
        ctx: &Context,
        notice_type: &str,
        notice_reason: &str,
        notice_date: &str,
        unregistered_notice_type: &str,
        external_notice: Option<bool>,
    ) -> Result<Self> {
        let attributes = Self {
            notice_type: notice_type.trim().to_string(),
            notice_reason: notice_reason.trim().to_string(),
            notice_date: notice_date.trim().to_string(),
            unregistered_notice_type: unregistered_notice_type.trim().to_string(),
            external_notice,
        };
        attributes.validate(ctx)?;
        Ok(attributes)
    }

    /// Read the notice attributes of `element` and validate them
    pub fn from_element(ctx: &Context, element: &Element) -> Result<Self> {
        let ns = ctx.namespace(Vocab::Ism)?;
        let text = |name: &str| element.attribute(ns, name).unwrap_or("").to_string();
        let external_notice = element
            .attribute(ns, "externalNotice")
            .map(|v| helpers::parse_boolean(v, "externalNotice"))
            .transpose()?;

        let attributes = Self {
            notice_type: text("noticeType"),
            notice_reason: text("noticeReason"),
            notice_date: text("noticeDate"),
            unregistered_notice_type: text("unregisteredNoticeType"),
            external_notice,
        };
        attributes.validate(ctx)?;
        Ok(attributes)
    }

    fn entries(&self) -> [(&'static str, AttrValue<'_>); 5] {
        [
            ("noticeType", AttrValue::Text(&self.notice_type)),
            ("noticeReason", AttrValue::Text(&self.notice_reason)),
            ("noticeDate", AttrValue::Text(&self.notice_date)),
            (
                "unregisteredNoticeType",
                AttrValue::Text(&self.unregistered_notice_type),
            ),
            ("externalNotice", AttrValue::Flag(self.external_notice)),
        ]
    }

    /// ISM:noticeType
    pub fn notice_type(&self) -> &str {
        &self.notice_type
    }

    /// ISM:noticeReason
    pub fn notice_reason(&self) -> &str {
        &self.notice_reason
    }

    /// ISM:noticeDate
    pub fn notice_date(&self) -> &str {
        &self.notice_date
    }

    /// ISM:unregisteredNoticeType
    pub fn unregistered_notice_type(&self) -> &str {
        &self.unregistered_notice_type
    }

    /// ISM:externalNotice
    pub fn external_notice(&self) -> Option<bool> {
        self.external_notice
    }
}

impl AttributeGroup for NoticeAttributes {
    fn is_empty(&self) -> bool {
        self.entries().iter().all(|(_, value)| !value.is_set())
    }

    fn validate(&self, ctx: &Context) -> Result<Vec<ValidationMessage>> {
        for (name, value) in self.entries() {
            rules::check_present(ids::NOTICE_ATTRIBUTES, name, value.is_set(), ctx.version)?;
        }

        helpers::max_length(&self.notice_reason, MAX_LENGTH, "noticeReason")?;
        helpers::max_length(
            &self.unregistered_notice_type,
            MAX_LENGTH,
            "unregisteredNoticeType",
        )?;
        if !self.notice_date.is_empty() {
            helpers::validate_xs_date(&self.notice_date, "noticeDate")?;
        }

        let mut warnings = Vec::new();
        if !self.notice_type.is_empty() {
            warnings.extend(cve::validate(Vocabulary::NoticeType, &self.notice_type, ctx)?);
        }
        Ok(warnings)
    }

    fn add_to(&self, element: &mut Element, ctx: &Context) -> Result<()> {
        let ns = ctx.namespace(Vocab::Ism)?;
        let prefix = ctx.prefix(Vocab::Ism);
        for (name, value) in self.entries() {
            if value.is_set() {
                element.set_attribute(Some(prefix), Some(ns), name, value.lexical());
            }
        }
        Ok(())
    }

    fn output(&self, format: OutputFormat, prefix: &str) -> String {
        self.entries()
            .iter()
            .map(|(name, value)| value.render(format, &format!("{}{}", prefix, name)))
            .collect()
    }

    fn to_json_map(&self) -> Map<String, JsonValue> {
        let mut map = Map::new();
        for (name, value) in self.entries() {
            value.put_json(&mut map, name);
        }
        map
    }
}

/// Draft of [`NoticeAttributes`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoticeAttributesBuilder {
    /// ISM:noticeType
    pub notice_type: String,
    /// ISM:noticeReason
    pub notice_reason: String,
    /// ISM:noticeDate
    pub notice_date: String,
    /// ISM:unregisteredNoticeType
    pub unregistered_notice_type: String,
    /// ISM:externalNotice
    pub external_notice: Option<bool>,
}

impl NoticeAttributesBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Commit, treating an empty builder as the empty group
    pub fn commit_or_empty(&self, ctx: &Context) -> Result<NoticeAttributes> {
        Ok(self.commit(ctx)?.unwrap_or_default())
    }
}

impl Builder for NoticeAttributesBuilder {
    type Target = NoticeAttributes;

    fn is_empty(&self) -> bool {
        self.notice_type.is_blank()
            && self.notice_reason.is_blank()
            && self.notice_date.is_blank()
            && self.unregistered_notice_type.is_blank()
            && self.external_notice.is_none()
    }

    fn build(&self, ctx: &Context) -> Result<NoticeAttributes> {
        NoticeAttributes::new(
            ctx,
            &self.notice_type,
            &self.notice_reason,
            &self.notice_date,
            &self.unregistered_notice_type,
            self.external_notice,
        )
    }
}

blank_builder!(NoticeAttributesBuilder);

impl From<&NoticeAttributes> for NoticeAttributesBuilder {
    fn from(attributes: &NoticeAttributes) -> Self {
        Self {
            notice_type: attributes.notice_type.clone(),
            notice_reason: attributes.notice_reason.clone(),
            notice_date: attributes.notice_date.clone(),
            unregistered_notice_type: attributes.unregistered_notice_type.clone(),
            external_notice: attributes.external_notice,
        }
    }
}
