//! Content-type aware body decoding.
//!
//! # Responsibilities
//! - Decode JSON bodies into a value tree, masking listed request fields
//! - Decode form-urlencoded request bodies into a flat object
//! - Wrap anything else as a raw string under a fixed key
//!
//! # Design Decisions
//! - Never fails: malformed JSON is logged as the original text
//! - Works on borrowed bytes, so the caller's buffer stays readable

use serde_json::{Map, Value};
use std::borrow::Cow;

use crate::extract::redaction::{mask, RedactionList};
use crate::transaction::FORM_URLENCODED;

/// Key wrapping a request body that is neither JSON nor a form.
pub const RAW_BODY: &str = "raw_body";

/// Key wrapping a response body that is not JSON.
pub const RAW_CONTENT: &str = "raw_content";

/// Decode a request body according to its `Content-Type`.
pub fn decode_request_body(
    raw: Option<&[u8]>,
    content_type: &str,
    redaction: &RedactionList,
) -> Value {
    let body = as_text(raw);

    if content_type.contains("json") {
        return decode_json(&body, Some(redaction));
    }

    if content_type.contains(FORM_URLENCODED) {
        return decode_form(&body);
    }

    wrap_raw(RAW_BODY, body)
}

/// Decode a response body according to its content type.
///
/// Blank JSON responses are wrapped like any other raw content.
pub fn decode_response_body(raw: Option<&[u8]>, content_type: Option<&str>) -> Value {
    let content = as_text(raw);
    let is_json = content_type.is_some_and(|content_type| content_type.contains("json"));

    if is_json && !content.trim().is_empty() {
        return decode_json(&content, None);
    }

    wrap_raw(RAW_CONTENT, content)
}

/// Parse JSON, masking the top level when a redaction list is given.
/// Malformed input comes back as the original string.
pub fn decode_json(content: &str, redaction: Option<&RedactionList>) -> Value {
    match serde_json::from_str::<Value>(content) {
        Ok(value) => match redaction {
            Some(redaction) => mask(value, redaction),
            None => value,
        },
        Err(_) => Value::String(content.to_string()),
    }
}

/// Parse `a=1&b=2&b=3` into `{"a": "1", "b": "2,3"}`.
pub fn decode_form(content: &str) -> Value {
    Value::Object(join_repeated(url::form_urlencoded::parse(content.as_bytes())))
}

/// Collect pairs into an object, comma-joining values of a repeated key.
pub fn join_repeated<'a, K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Map<String, Value>
where
    K: Into<Cow<'a, str>>,
    V: Into<Cow<'a, str>>,
{
    let mut map = Map::new();

    for (key, value) in pairs {
        let (key, value) = (key.into(), value.into());
        match map.get_mut(key.as_ref()) {
            Some(Value::String(existing)) => {
                existing.push(',');
                existing.push_str(&value);
            }
            _ => {
                map.insert(key.into_owned(), Value::String(value.into_owned()));
            }
        }
    }

    map
}

fn as_text(raw: Option<&[u8]>) -> Cow<'_, str> {
    raw.map(String::from_utf8_lossy).unwrap_or_default()
}

fn wrap_raw(key: &str, content: Cow<'_, str>) -> Value {
    let mut map = Map::new();
    map.insert(key.to_string(), Value::String(content.into_owned()));
    Value::Object(map)
}
