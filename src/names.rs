//! XML name and token validation
//!
//! This module provides validation for NCNames, NMTOKENs and space-delimited
//! token lists as they appear in DDMS, ISM and NTK attribute values.

use once_cell::sync::Lazy;
use regex::Regex;

static NCNAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Z_a-z\u{C0}-\u{D6}\u{D8}-\u{F6}\u{F8}-\u{2FF}][A-Z_a-z\u{C0}-\u{D6}\u{D8}-\u{F6}\u{F8}-\u{2FF}\-\.0-9\u{B7}]*$")
        .unwrap()
});

static NMTOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Z_a-z\u{C0}-\u{D6}\u{D8}-\u{F6}\u{F8}-\u{2FF}\-\.0-9\u{B7}:]+$").unwrap()
});

/// Check if a string is a valid NCName (non-colonized name)
pub fn is_valid_ncname(name: &str) -> bool {
    NCNAME.is_match(name)
}

/// Check if a string is a valid NMTOKEN
pub fn is_valid_nmtoken(token: &str) -> bool {
    NMTOKEN.is_match(token)
}

/// Split a whitespace-delimited list into its tokens
pub fn split_tokens(value: &str) -> Vec<&str> {
    value.split_whitespace().collect()
}

/// Join tokens into the canonical single-space list form
pub fn join_tokens<S: AsRef<str>>(tokens: &[S]) -> String {
    tokens
        .iter()
        .map(|t| t.as_ref())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Find the first token of a list that fails `is_valid`
pub fn first_invalid_token<'a>(value: &'a str, is_valid: impl Fn(&str) -> bool) -> Option<&'a str> {
    value.split_whitespace().find(|token| !is_valid(token))
}
