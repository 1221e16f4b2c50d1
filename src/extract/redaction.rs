//! Field masking for decoded bodies.

use serde_json::Value;
use std::collections::BTreeSet;

/// Replacement written over masked values.
pub const MASK: &str = "******";

/// Field names whose values must not reach the log. Matching is case-sensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RedactionList {
    fields: BTreeSet<String>,
}

impl RedactionList {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains(field)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }
}

impl<S: Into<String>> FromIterator<S> for RedactionList {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self::new(iter)
    }
}

/// Mask listed keys of a top-level JSON object.
///
/// Nested objects, arrays and scalars pass through untouched.
pub fn mask(value: Value, redaction: &RedactionList) -> Value {
    if redaction.is_empty() {
        return value;
    }

    match value {
        Value::Object(mut map) => {
            for (key, field) in map.iter_mut() {
                if redaction.contains(key) {
                    *field = Value::String(MASK.to_string());
                }
            }
            Value::Object(map)
        }
        other => other,
    }
}
