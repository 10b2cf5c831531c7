//! Record model the filter engine evaluates against.
//!
//! Upstream listings arrive as loosely shaped JSON. Before filtering, each
//! object is flattened into a [`Record`]: a map from (possibly dotted) field
//! name to a typed [`Value`]. The evaluator only ever sees these four value
//! shapes, which is what lets the operator table stay exhaustive.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use thiserror::Error;

/// Errors raised while building a record from JSON.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RecordError {
    /// The JSON value is not an object and cannot be treated as a record.
    #[error("expected a JSON object, found {kind}")]
    NotAnObject {
        /// JSON kind that was found instead (e.g. "array", "string").
        kind: &'static str,
    },
}

/// A single field value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Free text (titles, names, dates as strings).
    Text(String),
    /// Numeric value (scores, counts, prices).
    Number(f64),
    /// Boolean flag (e.g. `isTicketed`).
    Bool(bool),
    /// Multi-valued field (genres, artist names).
    List(Vec<String>),
}

impl Value {
    /// Creates a list value from anything that yields string-like items.
    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Value::List(items.into_iter().map(Into::into).collect())
    }

    /// Returns the numeric reading of a scalar value.
    ///
    /// Text that parses as a finite number counts; lists and booleans do not.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Text(s) => parse_number(s),
            Value::Bool(_) | Value::List(_) => None,
        }
    }

    /// Returns the value viewed as a list of text items.
    ///
    /// Scalars become a single item; numbers use their shortest decimal form.
    pub fn text_items(&self) -> Vec<String> {
        match self {
            Value::Text(s) => vec![s.clone()],
            Value::Number(n) => vec![format_number(*n)],
            Value::Bool(b) => vec![b.to_string()],
            Value::List(items) => items.clone(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => f.write_str(s),
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::Bool(b) => write!(f, "{b}"),
            Value::List(items) => f.write_str(&items.join(", ")),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Vec<String>> for Value {
    fn from(items: Vec<String>) -> Self {
        Value::List(items)
    }
}

impl From<Vec<&str>> for Value {
    fn from(items: Vec<&str>) -> Self {
        Value::list(items)
    }
}

/// One artist, label, venue or event.
///
/// Field names are kept as given; lookups try an exact match first and fall
/// back to a case-insensitive one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, Value>,
}

impl Record {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(field, value);
        self
    }

    /// Sets a field, replacing any previous value.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Looks up a field by name.
    pub fn get(&self, field: &str) -> Option<&Value> {
        if let Some(value) = self.fields.get(field) {
            return Some(value);
        }
        self.fields
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(field))
            .map(|(_, value)| value)
    }

    /// Returns true if the record has the field.
    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    /// Iterates over all fields in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Builds a record by flattening a JSON object.
    ///
    /// - Strings, numbers and booleans map to the matching [`Value`]; `null` is skipped.
    /// - Nested objects flatten to dotted keys (`venue.name`). An object with a
    ///   string `name` also exposes it under its own key (`venue`).
    /// - Arrays become [`Value::List`]. Arrays of objects project each sub-field
    ///   to a dotted list (`artists.name`) and list element names under the
    ///   array key (`artists`).
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::NotAnObject`] if `json` is not an object.
    pub fn from_json(json: &Json) -> Result<Self, RecordError> {
        let Json::Object(map) = json else {
            return Err(RecordError::NotAnObject {
                kind: json_kind(json),
            });
        };

        let mut record = Record::new();
        for (key, value) in map {
            flatten_into(&mut record.fields, key, value);
        }
        Ok(record)
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut record = Record::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}

impl TryFrom<&Json> for Record {
    type Error = RecordError;

    fn try_from(json: &Json) -> Result<Self, Self::Error> {
        Record::from_json(json)
    }
}

fn flatten_into(fields: &mut BTreeMap<String, Value>, path: &str, value: &Json) {
    match value {
        Json::Null => {}
        Json::Bool(b) => {
            fields.insert(path.to_string(), Value::Bool(*b));
        }
        Json::Number(n) => {
            if let Some(n) = n.as_f64() {
                fields.insert(path.to_string(), Value::Number(n));
            }
        }
        Json::String(s) => {
            fields.insert(path.to_string(), Value::Text(s.clone()));
        }
        Json::Object(map) => {
            for (key, child) in map {
                flatten_into(fields, &join_path(path, key), child);
            }
            if let Some(Json::String(name)) = map.get("name") {
                fields
                    .entry(path.to_string())
                    .or_insert_with(|| Value::Text(name.clone()));
            }
        }
        Json::Array(items) => {
            let mut lists: BTreeMap<String, Vec<String>> = BTreeMap::new();
            lists.insert(path.to_string(), Vec::new());
            for item in items {
                collect_list_items(&mut lists, path, item);
            }
            for (key, items) in lists {
                fields.insert(key, Value::List(items));
            }
        }
    }
}

fn collect_list_items(lists: &mut BTreeMap<String, Vec<String>>, path: &str, value: &Json) {
    match value {
        Json::Null => {}
        Json::Bool(b) => lists.entry(path.to_string()).or_default().push(b.to_string()),
        Json::Number(n) => {
            let text = n.as_f64().map(format_number).unwrap_or_else(|| n.to_string());
            lists.entry(path.to_string()).or_default().push(text);
        }
        Json::String(s) => lists.entry(path.to_string()).or_default().push(s.clone()),
        Json::Object(map) => {
            for (key, child) in map {
                collect_list_items(lists, &join_path(path, key), child);
            }
            if let Some(Json::String(name)) = map.get("name") {
                lists.entry(path.to_string()).or_default().push(name.clone());
            }
        }
        Json::Array(items) => {
            for item in items {
                collect_list_items(lists, path, item);
            }
        }
    }
}

fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

/// Names the JSON type of a value, for error messages.
pub fn json_kind(json: &Json) -> &'static str {
    match json {
        Json::Null => "null",
        Json::Bool(_) => "boolean",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}

/// Parses text as a finite number, ignoring surrounding whitespace.
pub(crate) fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Renders a number without a trailing `.0` for integral values.
pub(crate) fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}
