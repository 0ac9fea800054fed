use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, TimeZone, Utc};

use crate::encoding::encode_base64;
use crate::error::{TypeError, TypeResult};
use crate::kind::ValueKind;
use crate::path::Step;

/// Keyed children of a dict value.
///
/// Key order carries no meaning in a document; a `BTreeMap` keeps
/// enumeration and serialized output deterministic.
pub type Dictionary = BTreeMap<String, Value>;

/// Absolute timestamp carried by date values (second precision on disk).
pub type Date = DateTime<Utc>;

/// Textual form of dates inside a document.
pub const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// One node of a property-list document.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Dict(Dictionary),
    Array(Vec<Value>),
    String(String),
    Integer(i64),
    Real(f64),
    Bool(bool),
    Date(Date),
    Blob(Vec<u8>),
}

impl Value {
    /// An empty dict.
    pub fn dict() -> Self {
        Self::Dict(Dictionary::new())
    }

    /// An empty array.
    pub fn array() -> Self {
        Self::Array(Vec::new())
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Dict(_) => ValueKind::Dict,
            Self::Array(_) => ValueKind::Array,
            Self::String(_) => ValueKind::String,
            Self::Integer(_) => ValueKind::Integer,
            Self::Real(_) => ValueKind::Real,
            Self::Bool(_) => ValueKind::Bool,
            Self::Date(_) => ValueKind::Date,
            Self::Blob(_) => ValueKind::Blob,
        }
    }

    pub fn is_container(&self) -> bool {
        self.kind().is_container()
    }

    pub fn as_dict(&self) -> Option<&Dictionary> {
        match self {
            Self::Dict(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_dict_mut(&mut self) -> Option<&mut Dictionary> {
        match self {
            Self::Dict(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// The direct child addressed by `step`, if this is a container holding
    /// one there.
    pub fn child(&self, step: &Step) -> Option<&Value> {
        match (self, step) {
            (Self::Dict(map), Step::Key(key)) => map.get(key),
            (Self::Array(items), Step::Index(index)) => items.get(*index),
            _ => None,
        }
    }

    pub fn child_mut(&mut self, step: &Step) -> Option<&mut Value> {
        match (self, step) {
            (Self::Dict(map), Step::Key(key)) => map.get_mut(key),
            (Self::Array(items), Step::Index(index)) => items.get_mut(*index),
            _ => None,
        }
    }

    /// Canonical string form of this value.
    ///
    /// Scalars render the way the fully converted native form prints them:
    /// strings with `&` escaped as `&amp;`, numbers in decimal, booleans as
    /// `true`/`false`, dates as a Unix timestamp and blobs as base64.
    /// Containers render as their type name.
    pub fn render(&self) -> String {
        match self {
            Self::Dict(_) | Self::Array(_) => self.kind().name().to_string(),
            Self::String(s) => escape_ampersand(s),
            Self::Integer(i) => i.to_string(),
            Self::Real(r) => r.to_string(),
            Self::Bool(b) => b.to_string(),
            Self::Date(d) => d.timestamp().to_string(),
            Self::Blob(bytes) => encode_base64(bytes),
        }
    }

    /// Plain text of a scalar: strings verbatim, other scalars rendered.
    /// Containers have no text.
    pub fn text(&self) -> Option<String> {
        match self {
            Self::Dict(_) | Self::Array(_) => None,
            Self::String(s) => Some(s.clone()),
            other => Some(other.render()),
        }
    }
}

pub(crate) fn escape_ampersand(s: &str) -> String {
    s.replace('&', "&amp;")
}

/// Parse a date from its document form, any RFC 3339 timestamp, or a count
/// of seconds since the Unix epoch.
pub fn parse_date(raw: &str) -> TypeResult<Date> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    if let Ok(secs) = raw.parse::<i64>() {
        return Utc
            .timestamp_opt(secs, 0)
            .single()
            .ok_or_else(|| TypeError::malformed("date", format!("timestamp out of range: {secs}")));
    }
    Err(TypeError::malformed(
        "date",
        format!("expected {DATE_FORMAT} or epoch seconds, got {raw:?}"),
    ))
}

/// Format a date the way documents store it.
pub fn format_date(date: &Date) -> String {
    date.format(DATE_FORMAT).to_string()
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(r: f64) -> Self {
        Self::Real(r)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<Date> for Value {
    fn from(d: Date) -> Self {
        Self::Date(d)
    }
}

impl From<Dictionary> for Value {
    fn from(map: Dictionary) -> Self {
        Self::Dict(map)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::Array(items)
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self::Dict(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}
