use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::encoding::{decode_base64, decode_hex};
use crate::error::{TypeError, TypeResult};
use crate::value::{parse_date, Dictionary, Value};

/// Runtime kind of a [`Value`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Dict,
    Array,
    String,
    Integer,
    Real,
    Bool,
    Date,
    Blob,
}

impl ValueKind {
    /// Type name used when a value is rendered in place of its contents.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Dict => "dict",
            Self::Array => "array",
            Self::String => "string",
            Self::Integer => "integer",
            Self::Real => "real",
            Self::Bool => "bool",
            Self::Date => "date",
            Self::Blob => "data",
        }
    }

    /// Returns `true` for dicts and arrays.
    pub fn is_container(&self) -> bool {
        matches!(self, Self::Dict | Self::Array)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The kind of node a forced write should find or create at a location.
///
/// Unlike [`ValueKind`], blobs come in two flavours that differ only in how
/// the raw leaf text is decoded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    Dict,
    Array,
    Date,
    Int,
    Float,
    Bool,
    String,
    BlobHex,
    BlobBase64,
}

impl NodeKind {
    pub const ALL: [NodeKind; 9] = [
        Self::Dict,
        Self::Array,
        Self::Date,
        Self::Int,
        Self::Float,
        Self::Bool,
        Self::String,
        Self::BlobHex,
        Self::BlobBase64,
    ];

    /// The runtime kind a node of this kind has once built.
    pub fn value_kind(&self) -> ValueKind {
        match self {
            Self::Dict => ValueKind::Dict,
            Self::Array => ValueKind::Array,
            Self::Date => ValueKind::Date,
            Self::Int => ValueKind::Integer,
            Self::Float => ValueKind::Real,
            Self::Bool => ValueKind::Bool,
            Self::String => ValueKind::String,
            Self::BlobHex | Self::BlobBase64 => ValueKind::Blob,
        }
    }

    /// Returns `true` if `value` already has the kind this token asks for.
    pub fn matches(&self, value: &Value) -> bool {
        value.kind() == self.value_kind()
    }

    /// The token spelling of this kind.
    pub fn token(&self) -> &'static str {
        match self {
            Self::Dict => "dict",
            Self::Array => "array",
            Self::Date => "date",
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::String => "string",
            Self::BlobHex => "blob-hex",
            Self::BlobBase64 => "blob-base64",
        }
    }

    /// Build a value of this kind from its raw textual form.
    ///
    /// Containers ignore `raw` and come out empty.
    pub fn build(&self, raw: &str) -> TypeResult<Value> {
        match self {
            Self::Dict => Ok(Value::Dict(Dictionary::new())),
            Self::Array => Ok(Value::Array(Vec::new())),
            Self::String => Ok(Value::String(raw.to_string())),
            Self::Int => raw
                .trim()
                .parse::<i64>()
                .map(Value::Integer)
                .map_err(|e| TypeError::malformed("int", e.to_string())),
            Self::Float => raw
                .trim()
                .parse::<f64>()
                .map(Value::Real)
                .map_err(|e| TypeError::malformed("float", e.to_string())),
            Self::Bool => parse_bool(raw).map(Value::Bool),
            Self::Date => parse_date(raw).map(Value::Date),
            Self::BlobHex => decode_hex(raw).map(Value::Blob),
            Self::BlobBase64 => decode_base64(raw).map(Value::Blob),
        }
    }
}

fn parse_bool(raw: &str) -> TypeResult<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        other => Err(TypeError::malformed(
            "bool",
            format!("expected true/false, got {other:?}"),
        )),
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for NodeKind {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim_start_matches('-');
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.token() == token)
            .or(match token {
                "integer" => Some(Self::Int),
                "real" => Some(Self::Float),
                "data" | "hex" => Some(Self::BlobHex),
                "base64" => Some(Self::BlobBase64),
                _ => None,
            })
            .ok_or_else(|| TypeError::UnknownValueKind(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_parse_back() {
        for kind in NodeKind::ALL {
            assert_eq!(kind.token().parse::<NodeKind>().unwrap(), kind);
        }
    }

    #[test]
    fn aliases_and_dashes_accepted() {
        assert_eq!("--int".parse::<NodeKind>().unwrap(), NodeKind::Int);
        assert_eq!("real".parse::<NodeKind>().unwrap(), NodeKind::Float);
        assert_eq!("base64".parse::<NodeKind>().unwrap(), NodeKind::BlobBase64);
    }

    #[test]
    fn unknown_token_rejected() {
        let err = "matrix".parse::<NodeKind>().unwrap_err();
        assert_eq!(err, TypeError::UnknownValueKind("matrix".into()));
    }

    #[test]
    fn build_scalars() {
        assert_eq!(NodeKind::Int.build(" 42 ").unwrap(), Value::Integer(42));
        assert_eq!(NodeKind::Float.build("1.5").unwrap(), Value::Real(1.5));
        assert_eq!(NodeKind::Bool.build("YES").unwrap(), Value::Bool(true));
        assert_eq!(NodeKind::String.build("v1").unwrap(), Value::from("v1"));
        assert_eq!(
            NodeKind::BlobHex.build("68656c6c6f").unwrap(),
            Value::Blob(b"hello".to_vec())
        );
        assert_eq!(
            NodeKind::BlobBase64.build("aGVsbG8=").unwrap(),
            Value::Blob(b"hello".to_vec())
        );
    }

    #[test]
    fn build_containers_ignore_raw() {
        assert_eq!(NodeKind::Dict.build("junk").unwrap(), Value::Dict(Dictionary::new()));
        assert_eq!(NodeKind::Array.build("").unwrap(), Value::Array(vec![]));
    }

    #[test]
    fn build_rejects_malformed_input() {
        assert!(NodeKind::Int.build("four").is_err());
        assert!(NodeKind::Bool.build("maybe").is_err());
        assert!(matches!(
            NodeKind::BlobHex.build("xyz"),
            Err(TypeError::MalformedEncoding { .. })
        ));
    }

    #[test]
    fn blob_tokens_share_value_kind() {
        assert_eq!(NodeKind::BlobHex.value_kind(), ValueKind::Blob);
        assert_eq!(NodeKind::BlobBase64.value_kind(), ValueKind::Blob);
        assert!(NodeKind::BlobHex.matches(&Value::Blob(vec![1])));
        assert!(!NodeKind::Dict.matches(&Value::Array(vec![])));
    }
}
