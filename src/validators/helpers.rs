//! Validator helper functions
//!
//! Format and enumeration checks shared by every component: date grammars,
//! booleans, URIs, ordinals and token lists.

use crate::error::{Error, Result};
use crate::names::first_invalid_token;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};

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

static TIMEZONE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(Z|[+-](0\d|1[0-4]):[0-5]\d)$").unwrap());

static G_YEAR_MONTH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?\d{4,}-(0[1-9]|1[0-2])$").unwrap());

static G_YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-?\d{4,}$").unwrap());

/// The XML Schema date grammars accepted for DDMS dates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateGrammar {
    /// xs:dateTime
    DateTime,
    /// xs:date
    Date,
    /// xs:gYearMonth
    YearMonth,
    /// xs:gYear
    Year,
}

/// Identify which date grammar a value follows, if any
pub fn date_grammar(value: &str) -> Option<DateGrammar> {
    if DateTime::parse_from_rfc3339(value).is_ok()
        || NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
    {
        return Some(DateGrammar::DateTime);
    }
    let bare = strip_timezone(value);
    if NaiveDate::parse_from_str(bare, "%Y-%m-%d").is_ok() {
        Some(DateGrammar::Date)
    } else if G_YEAR_MONTH.is_match(bare) {
        Some(DateGrammar::YearMonth)
    } else if G_YEAR.is_match(bare) {
        Some(DateGrammar::Year)
    } else {
        None
    }
}

fn strip_timezone(value: &str) -> &str {
    match TIMEZONE.find(value) {
        Some(m) if m.start() > 0 => &value[..m.start()],
        _ => value,
    }
}

/// Require a date in one of the DDMS date grammars
pub fn validate_date(component: &str, field: &str, value: &str) -> Result<()> {
    if date_grammar(value).is_none() {
        return Err(Error::invalid(
            component,
            field,
            format!("'{}' is not in a valid date format.", value),
        ));
    }
    Ok(())
}

/// Require an xs:date
pub fn validate_xs_date(component: &str, field: &str, value: &str) -> Result<()> {
    if date_grammar(value) != Some(DateGrammar::Date) {
        return Err(Error::invalid(
            component,
            field,
            format!("'{}' is not a valid xs:date.", value),
        ));
    }
    Ok(())
}

/// Parse an xs:boolean
pub fn parse_boolean(value: &str) -> Option<bool> {
    XSD_BOOLEAN_MAP.get(value.trim()).copied()
}

/// Require an xs:boolean
pub fn validate_boolean(component: &str, field: &str, value: &str) -> Result<bool> {
    parse_boolean(value).ok_or_else(|| {
        Error::invalid(component, field, format!("'{}' is not a valid boolean.", value))
    })
}

/// Check that a value is a usable xs:anyURI, absolute or relative
pub fn is_valid_uri(value: &str) -> bool {
    if value.chars().any(|c| c.is_whitespace() || c == '<' || c == '>' || c == '"') {
        return false;
    }
    match url::Url::parse(value) {
        Ok(_) => true,
        Err(url::ParseError::RelativeUrlWithoutBase) => true,
        Err(_) => false,
    }
}

/// Require a URI
pub fn validate_uri(component: &str, field: &str, value: &str) -> Result<()> {
    if !is_valid_uri(value) {
        return Err(Error::invalid(
            component,
            field,
            format!("'{}' is not a valid URI.", value),
        ));
    }
    Ok(())
}

/// Require a non-empty value
pub fn require_value(component: &str, field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::invalid(component, field, "is required."));
    }
    Ok(())
}

/// Require a required child component to be present
pub fn require_some<T>(component: &str, field: &str, value: Option<&T>) -> Result<()> {
    if value.is_none() {
        return Err(Error::invalid(component, field, "is required."));
    }
    Ok(())
}

/// Parse a non-negative integer
pub fn validate_integer(component: &str, field: &str, value: &str) -> Result<u32> {
    value.trim().parse::<u32>().map_err(|_| {
        Error::invalid(
            component,
            field,
            format!("'{}' is not a valid non-negative integer.", value),
        )
    })
}

/// Parse a strictly positive ordinal
pub fn validate_ordinal(component: &str, field: &str, value: &str) -> Result<u32> {
    match validate_integer(component, field, value)? {
        0 => Err(Error::invalid(component, field, "must be a positive integer.")),
        n => Ok(n),
    }
}

/// Require every token of a whitespace-delimited list to satisfy `is_valid`
///
/// The error names the first token that fails, even when others are valid.
pub fn validate_tokens(
    component: &str,
    field: &str,
    value: &str,
    is_valid: impl Fn(&str) -> bool,
) -> Result<()> {
    if let Some(token) = first_invalid_token(value, is_valid) {
        return Err(Error::invalid(
            component,
            field,
            format!("contains the invalid token '{}'.", token),
        ));
    }
    Ok(())
}

/// Require every token to be a member of an enumeration
pub fn validate_enumeration(
    component: &str,
    field: &str,
    value: &str,
    allowed: &HashSet<&'static str>,
) -> Result<()> {
    validate_tokens(component, field, value, |token| allowed.contains(token))
}
