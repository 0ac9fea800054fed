//! Foundation types for pdoc property-list documents.
//!
//! This crate provides the value model every other pdoc crate builds on:
//! the tagged [`Value`] union, runtime kinds, addressing [`Path`]s and the
//! conversion between values and host-native (`serde_json`) data.
//!
//! # Key Types
//!
//! - [`Value`] -- One node of a document tree (dict, array, or a scalar)
//! - [`ValueKind`] -- Runtime kind of a value
//! - [`NodeKind`] -- Requested kind when a node is created by a forced write
//! - [`Step`] / [`Path`] -- Key/index addressing into nested documents
//! - [`Native`] -- Host-native view of a value, shallow or fully converted

pub mod encoding;
pub mod error;
pub mod kind;
pub mod native;
pub mod path;
pub mod value;

pub use encoding::{
    base64_to_hex, decode_base64, decode_hex, encode_base64, encode_base64_lines, hex_to_base64,
    BASE64_LINE_WIDTH,
};
pub use error::{TypeError, TypeResult};
pub use kind::{NodeKind, ValueKind};
pub use native::Native;
pub use path::{Path, Step};
pub use value::{format_date, parse_date, Date, Dictionary, Value, DATE_FORMAT};
