//! Conversion between document values and host-native data.
//!
//! Host-native data is `serde_json::Value`. Converting *from* native maps
//! objects to dicts and arrays to arrays, and stringifies everything else.
//! Converting *to* native comes in two depths, see [`Value::to_native`].

use std::collections::BTreeMap;

use serde_json::{Map, Value as Json};

use crate::encoding::encode_base64;
use crate::value::{escape_ampersand, Value};

/// Host-native view of a document value.
#[derive(Clone, Debug, PartialEq)]
pub enum Native<'a> {
    Map(BTreeMap<String, Native<'a>>),
    List(Vec<Native<'a>>),
    /// A scalar left as a document value (shallow conversion).
    Handle(&'a Value),
    /// A fully converted scalar.
    Scalar(Json),
}

impl<'a> Native<'a> {
    /// Flatten into plain JSON, converting any remaining handles fully.
    pub fn into_json(self) -> Json {
        match self {
            Self::Map(map) => Json::Object(
                map.into_iter()
                    .map(|(k, v)| (k, v.into_json()))
                    .collect(),
            ),
            Self::List(items) => Json::Array(items.into_iter().map(Native::into_json).collect()),
            Self::Handle(value) => value.to_json(),
            Self::Scalar(json) => json,
        }
    }
}

impl Value {
    /// Convert to host-native form.
    ///
    /// With `convert_all == false` only dicts and arrays are converted and
    /// scalars stay as [`Native::Handle`]s. With `convert_all == true` every
    /// scalar becomes native too: strings (with `&` escaped as `&amp;`),
    /// numbers, booleans, dates as Unix timestamps and blobs as base64 text.
    pub fn to_native(&self, convert_all: bool) -> Native<'_> {
        match self {
            Self::Dict(map) => Native::Map(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_native(convert_all)))
                    .collect(),
            ),
            Self::Array(items) => {
                Native::List(items.iter().map(|v| v.to_native(convert_all)).collect())
            }
            scalar if !convert_all => Native::Handle(scalar),
            scalar => Native::Scalar(scalar_to_json(scalar)),
        }
    }

    /// Fully converted JSON form (`to_native(true)` flattened).
    pub fn to_json(&self) -> Json {
        match self {
            Self::Dict(map) => Json::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
            Self::Array(items) => Json::Array(items.iter().map(Value::to_json).collect()),
            scalar => scalar_to_json(scalar),
        }
    }

    /// Build a value from arbitrary JSON.
    pub fn from_json(json: &Json) -> Self {
        match json {
            Json::Object(map) => Self::from_native_dict(map),
            Json::Array(items) => Self::from_native_array(items),
            Json::String(s) => Self::String(s.clone()),
            Json::Null => Self::String(String::new()),
            other => Self::String(other.to_string()),
        }
    }

    /// Build a dict value from a native map.
    pub fn from_native_dict(map: &Map<String, Json>) -> Self {
        Self::Dict(
            map.iter()
                .map(|(k, v)| (k.clone(), Self::from_json(v)))
                .collect(),
        )
    }

    /// Build an array value from a native sequence.
    pub fn from_native_array(items: &[Json]) -> Self {
        Self::Array(items.iter().map(Self::from_json).collect())
    }
}

fn scalar_to_json(value: &Value) -> Json {
    match value {
        Value::String(s) => Json::String(escape_ampersand(s)),
        Value::Integer(i) => Json::from(*i),
        Value::Real(r) => Json::from(*r),
        Value::Bool(b) => Json::Bool(*b),
        Value::Date(d) => Json::from(d.timestamp()),
        Value::Blob(bytes) => Json::String(encode_base64(bytes)),
        Value::Dict(_) | Value::Array(_) => value.to_json(),
    }
}

/// Native values already carrying document type information pass through
/// unchanged; everything else goes through the JSON mapping.
impl From<Native<'_>> for Value {
    fn from(native: Native<'_>) -> Self {
        match native {
            Native::Map(map) => Value::Dict(map.into_iter().map(|(k, v)| (k, v.into())).collect()),
            Native::List(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            Native::Handle(value) => value.clone(),
            Native::Scalar(json) => Value::from_json(&json),
        }
    }
}

impl From<&Json> for Value {
    fn from(json: &Json) -> Self {
        Value::from_json(json)
    }
}
