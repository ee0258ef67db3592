//! FILENAME: core/persistence/src/ids.rs
//! Document identifier classification.

use corpus::IdNamespace;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static URN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^urn:nbn:[a-z]{2}[-_:]\S+$").expect("valid URN pattern"));

static DHLABID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+(\.0+)?$").expect("valid dhlabid pattern"));

/// Which namespace an identifier string belongs to, if any.
pub fn classify_id(id: &str) -> Option<IdNamespace> {
    let id = id.trim();
    if URN_PATTERN.is_match(id) {
        Some(IdNamespace::Urn)
    } else if DHLABID_PATTERN.is_match(id) {
        Some(IdNamespace::Dhlabid)
    } else {
        None
    }
}

pub fn looks_like_document_id(id: &str) -> bool {
    classify_id(id).is_some()
}

/// The namespace shared by every id, or None when they are mixed or
/// unrecognized.
pub fn common_namespace<'a, I>(ids: I) -> Option<IdNamespace>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut found = None;
    for id in ids {
        let ns = classify_id(id)?;
        match found {
            None => found = Some(ns),
            Some(prev) if prev != ns => return None,
            Some(_) => {}
        }
    }
    found
}

/// Reads an identifier cell: strings as-is (trimmed), integral numbers
/// without a fractional part ("123.0" -> "123").
pub fn value_to_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                None
            } else if DHLABID_PATTERN.is_match(s) {
                Some(s.split('.').next().unwrap_or(s).to_string())
            } else {
                Some(s.to_string())
            }
        }
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                Some(u.to_string())
            } else if let Some(i) = n.as_i64() {
                Some(i.to_string())
            } else {
                n.as_f64()
                    .filter(|f| f.is_finite() && f.fract() == 0.0)
                    .map(|f| format!("{}", f as i64))
            }
        }
        _ => None,
    }
}
