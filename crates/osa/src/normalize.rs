//! 🧼 Input normalization — scrubbing caller input until reqwest can stand to look at it.
//!
//! 🎬 *[a base URL walks in without a scheme. a boolean walks in as the string "Y ".
//! a timeout walks in as "soon". the bouncer sighs, and gets to work.]*
//!
//! 🧠 Knowledge graph:
//! - `normalize_base_url`: the only helper that can refuse you (ConfigurationError on blank).
//! - `to_bool`: tri-state input -> bool, with a default for "I have no idea what you meant".
//! - `coerce_timeout`: anything -> positive seconds, 30 when in doubt.
//! - `parse_json_input`: the three-stage body parse. strict JSON, then the permissive
//!   literal parser in [`crate::literal`], then raw text. Returns a tagged [`ParsedBody`].
//! - `parse_string_map`: raw_request's headers/params. must be a JSON object, or nothing at all. 🦆

use std::collections::BTreeMap;
use std::time::Duration;

use serde_json::Value;
use tracing::trace;

use crate::error::{AdapterError, Result};
use crate::literal::parse_literal;

/// ⏱️ Thirty seconds. Long enough for a sulky cluster, short enough to notice it's sulking.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// 📦 What a body turned out to be after the three-stage parse.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedBody {
    /// 🎯 Objects and arrays. Sent as a JSON payload.
    Structured(Value),
    /// 📜 Everything else: ndjson, plain text, the unparseable. Sent byte-for-byte.
    Raw(String),
}

/// 🔧 Normalize the cluster base URL: trim, default the scheme to https, drop trailing slashes.
pub fn normalize_base_url(base_url: &str) -> Result<String> {
    let trimmed = base_url.trim();
    if trimmed.is_empty() {
        return Err(AdapterError::Configuration(
            "base_url is required. We can't knock on a door with no address.".to_string(),
        ));
    }
    let with_scheme = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };
    Ok(with_scheme.trim_end_matches('/').to_string())
}

/// ✅ Coerce a loose value into a bool.
///
/// Absent, null and `""` give back `default`. Real booleans are themselves.
/// Everything else is stringified, trimmed and lowercased: `true/1/yes/y` are true,
/// `false/0/no/n` are false, and anything else ("maybe", "🤷") falls back to `default`.
pub fn to_bool(value: Option<&Value>, default: bool) -> bool {
    let text = match value {
        None | Some(Value::Null) => return default,
        Some(Value::Bool(b)) => return *b,
        Some(Value::String(s)) if s.is_empty() => return default,
        Some(Value::String(s)) => s.trim().to_lowercase(),
        Some(other) => other.to_string().trim().to_lowercase(),
    };
    match text.as_str() {
        "true" | "1" | "yes" | "y" => true,
        "false" | "0" | "no" | "n" => false,
        _ => default,
    }
}

/// ⏱️ Coerce a loose timeout into a positive number of seconds.
///
/// Integers and integer strings are taken as-is, floats truncate toward zero.
/// Zero, negatives, booleans and anything non-numeric get [`DEFAULT_TIMEOUT_SECS`].
pub fn coerce_timeout(value: Option<&Value>) -> Duration {
    let secs = match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_u64().and_then(|u| i64::try_from(u).ok()))
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    match secs {
        Some(s) if s > 0 => Duration::from_secs(s as u64),
        _ => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
    }
}

/// 🤔 Does this value say anything at all? Null, `""`, `{}`, `[]`, `false` and `0` don't.
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Object(map)) => !map.is_empty(),
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
    }
}

/// 📦 The three-stage body parse.
///
/// 1. structured values pass straight through;
/// 2. strings starting with `{` or `[` try strict JSON, then the literal parser;
/// 3. anything that survives neither stays raw text, untouched (ndjson lives here).
pub fn parse_json_input(data: Option<&Value>) -> Option<ParsedBody> {
    match data? {
        Value::Null => None,
        structured @ (Value::Object(_) | Value::Array(_)) => {
            Some(ParsedBody::Structured(structured.clone()))
        }
        Value::String(raw) => parse_json_text(raw),
        scalar => Some(ParsedBody::Raw(scalar.to_string())),
    }
}

/// 📜 Same as [`parse_json_input`], for callers already holding a string.
pub fn parse_json_text(raw: &str) -> Option<ParsedBody> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }
    if !(text.starts_with('{') || text.starts_with('[')) {
        return Some(ParsedBody::Raw(raw.to_string()));
    }
    if let Ok(value) = serde_json::from_str::<Value>(text) {
        trace!("🎯 body parsed as strict JSON");
        return Some(ParsedBody::Structured(value));
    }
    if let Some(value) = parse_literal(text) {
        trace!("🐍 body parsed by the permissive literal parser");
        return Some(ParsedBody::Structured(value));
    }
    trace!("📜 body is neither JSON nor a literal, sending it raw");
    Some(ParsedBody::Raw(raw.to_string()))
}

/// 🗺️ Parse raw_request headers/params into a string map.
///
/// Absent or blank input is an empty map. Anything that parses to something other than
/// an object is an [`AdapterError::InvalidInput`]: a typo in your headers is your typo,
/// and you deserve to hear about it. Non-string values are stringified (`1` -> `"1"`).
pub fn parse_string_map(value: Option<&Value>, what: &str) -> Result<BTreeMap<String, String>> {
    let object = match parse_json_input(value) {
        None => return Ok(BTreeMap::new()),
        Some(ParsedBody::Structured(Value::Object(object))) => object,
        Some(_) => {
            return Err(AdapterError::InvalidInput(format!(
                "{what} must be a JSON object, like {{\"key\": \"value\"}}"
            )));
        }
    };
    Ok(object
        .into_iter()
        .map(|(key, value)| {
            let text = match value {
                Value::String(s) => s,
                other => other.to_string(),
            };
            (key, text)
        })
        .collect())
}
