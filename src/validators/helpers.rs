//! Validator helper functions
//!
//! Lexical checks shared by components and attribute groups: XML Schema date
//! forms, booleans, numbers, token lists, and the small set of recurring
//! messages ("is required", "was found with no value").

use crate::error::{Error, Result};
use chrono::{NaiveDate, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

use super::exceptions::ValidationMessage;

lazy_static::lazy_static! {
    /// XSD boolean value mapping
    pub static ref XSD_BOOLEAN_MAP: HashMap<&'static str, bool> = {
        let mut m = HashMap::new();
        m.insert("false", false);
        m.insert("0", false);
        m.insert("true", true);
        m.insert("1", true);
        m
    };
}

const TZ: &str = r"(Z|[+-]\d{2}:\d{2})?";

static DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"^(-?\d{{4,}})-(\d{{2}})-(\d{{2}}){}$", TZ)).unwrap());

static DATE_TIME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^(-?\d{{4,}})-(\d{{2}})-(\d{{2}})T(\d{{2}}):(\d{{2}}):(\d{{2}})(\.\d+)?{}$",
        TZ
    ))
    .unwrap()
});

static YEAR_MONTH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"^(-?\d{{4,}})-(\d{{2}}){}$", TZ)).unwrap());

static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(&format!(r"^(-?\d{{4,}}){}$", TZ)).unwrap());

/// The XML Schema date forms DDMS accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateKind {
    /// xs:date
    Date,
    /// xs:dateTime
    DateTime,
    /// xs:gYearMonth
    YearMonth,
    /// xs:gYear
    Year,
}

impl DateKind {
    /// Schema type name
    pub fn as_str(&self) -> &'static str {
        match self {
            DateKind::Date => "xs:date",
            DateKind::DateTime => "xs:dateTime",
            DateKind::YearMonth => "xs:gYearMonth",
            DateKind::Year => "xs:gYear",
        }
    }
}

fn calendar_date(year: &str, month: &str, day: &str) -> bool {
    match (year.parse::<i32>(), month.parse::<u32>(), day.parse::<u32>()) {
        (Ok(y), Ok(m), Ok(d)) => NaiveDate::from_ymd_opt(y, m, d).is_some(),
        _ => false,
    }
}

/// Classify a lexical date, or None if it is not one of the accepted forms
pub fn date_kind(value: &str) -> Option<DateKind> {
    if let Some(caps) = DATE_RE.captures(value) {
        return calendar_date(&caps[1], &caps[2], &caps[3]).then_some(DateKind::Date);
    }
    if let Some(caps) = DATE_TIME_RE.captures(value) {
        if !calendar_date(&caps[1], &caps[2], &caps[3]) {
            return None;
        }
        let time = match (caps[4].parse(), caps[5].parse(), caps[6].parse()) {
            (Ok(h), Ok(m), Ok(s)) => NaiveTime::from_hms_opt(h, m, s),
            _ => None,
        };
        return time.map(|_| DateKind::DateTime);
    }
    if let Some(caps) = YEAR_MONTH_RE.captures(value) {
        let month_ok = caps[2].parse::<u32>().map_or(false, |m| (1..=12).contains(&m));
        return (caps[1].parse::<i32>().is_ok() && month_ok).then_some(DateKind::YearMonth);
    }
    if let Some(caps) = YEAR_RE.captures(value) {
        return caps[1].parse::<i32>().is_ok().then_some(DateKind::Year);
    }
    None
}

/// True for any of the four accepted date forms
pub fn is_valid_date(value: &str) -> bool {
    date_kind(value).is_some()
}

/// True only for xs:date
pub fn is_valid_xs_date(value: &str) -> bool {
    date_kind(value) == Some(DateKind::Date)
}

/// Require one of the four accepted date forms
pub fn validate_date(value: &str, name: &str) -> Result<()> {
    if is_valid_date(value) {
        Ok(())
    } else {
        Err(Error::invalid(format!(
            "The {} must be in the xs:dateTime, xs:date, xs:gYearMonth, or xs:gYear format.",
            name
        )))
    }
}

/// Require an xs:date
pub fn validate_xs_date(value: &str, name: &str) -> Result<()> {
    if is_valid_xs_date(value) {
        Ok(())
    } else {
        Err(Error::invalid(format!(
            "The {} must be in the xs:date format (YYYY-MM-DD).",
            name
        )))
    }
}

/// Parse an xs:boolean
pub fn parse_boolean(value: &str, name: &str) -> Result<bool> {
    XSD_BOOLEAN_MAP.get(value.trim()).copied().ok_or_else(|| {
        Error::invalid(format!("The {} attribute must be a boolean value.", name))
    })
}

/// Parse an xs:double
pub fn parse_double(value: &str, name: &str) -> Result<f64> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| Error::invalid(format!("The {} must be a valid double.", name)))
}

/// Parse an xs:positiveInteger
pub fn parse_positive_integer(value: &str, name: &str) -> Result<u32> {
    match value.trim().parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(Error::invalid(format!(
            "The {} attribute must be a positive integer.",
            name
        ))),
    }
}

/// Split a space-delimited attribute value into tokens
pub fn split_tokens(value: &str) -> Vec<String> {
    value.split_whitespace().map(str::to_string).collect()
}

/// Join tokens back into an attribute value
pub fn join_tokens(tokens: &[String]) -> String {
    tokens.join(" ")
}

/// Drop empty strings from a raw value list
pub fn non_empty(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

/// Require a non-empty element value
pub fn require_element(value: &str, name: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::invalid(format!("The {} element is required.", name)));
    }
    Ok(())
}

/// Require a non-empty attribute value
pub fn require_attribute(value: &str, name: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::invalid(format!("The {} attribute is required.", name)));
    }
    Ok(())
}

/// Reject values longer than `limit` characters
pub fn max_length(value: &str, limit: usize, name: &str) -> Result<()> {
    if value.chars().count() > limit {
        return Err(Error::invalid(format!(
            "The {} attribute must be shorter than {} characters.",
            name, limit
        )));
    }
    Ok(())
}

/// Warning for an optional element that exists with no text
pub fn empty_element_warning(qualified_name: &str) -> ValidationMessage {
    ValidationMessage::warning(format!(
        "A {} element was found with no value.",
        qualified_name
    ))
}
