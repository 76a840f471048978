use std::sync::LazyLock;

use chrono::{DateTime, NaiveDateTime};
use regex::Regex;
use serde_json::Value;
use url::{Url, form_urlencoded};

use super::error::ExtractorError;

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static BR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\s*<br\s*/?>\s*").unwrap());
static PARAGRAPH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s*</p>\s*<p[^>]*>\s*").unwrap());
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());
static ENTITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&#?[0-9A-Za-z]+;").unwrap());

/// Turns an html fragment into plain text.
///
/// `<br>` and paragraph breaks become newlines, other tags are dropped and
/// entities are decoded. Unknown entities and bare `&` are kept as written.
pub fn clean_html(html: &str) -> String {
    let text = WHITESPACE_RE.replace_all(html, " ");
    let text = BR_RE.replace_all(&text, "\n");
    let text = PARAGRAPH_RE.replace_all(&text, "\n");
    let text = TAG_RE.replace_all(&text, "");
    let text = ENTITY_RE.replace_all(&text, |caps: &regex::Captures| {
        let entity = &caps[0];
        htmlescape::decode_html(entity).unwrap_or_else(|_| entity.to_string())
    });
    text.trim().to_string()
}

/// Integer value of a json number or numeric string.
pub fn int_or_none(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Truth value of a json bool, number or `"true"`/`"false"`-like string.
pub fn bool_or_none(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

pub fn str_or_none(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Parses an ISO-8601 date time into a unix timestamp.
///
/// Accepts RFC 3339, offsets without a colon (`+0000`), and naive date times,
/// which are read as UTC.
pub fn parse_iso8601(date: &str) -> Option<i64> {
    let date = date.trim();
    if date.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(date) {
        return Some(dt.timestamp());
    }
    if let Ok(dt) = DateTime::parse_from_str(date, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(dt.timestamp());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(date, fmt).ok())
        .map(|dt| dt.and_utc().timestamp())
}

/// Removes every query parameter named `key` from `url`.
///
/// The remaining parameters keep their original encoding and order; the `?`
/// disappears when nothing is left.
pub fn remove_query_param(url: &str, key: &str) -> Result<String, ExtractorError> {
    let mut parsed = Url::parse(url).map_err(|e| ExtractorError::InvalidUrl(format!("{url}: {e}")))?;

    let Some(query) = parsed.query() else {
        return Ok(url.to_string());
    };

    let kept = query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter(|pair| {
            form_urlencoded::parse(pair.as_bytes())
                .next()
                .is_none_or(|(name, _)| name != key)
        })
        .collect::<Vec<_>>()
        .join("&");

    parsed.set_query(if kept.is_empty() { None } else { Some(&kept) });
    Ok(parsed.into())
}
