//! XML property-list codec for pdoc documents.
//!
//! Reads the interchange format into a [`Value`](pdoc_types::Value) tree and
//! writes a tree back out, wrapping blob payloads at
//! [`BASE64_LINE_WIDTH`] characters per line. The hex/base64 helpers of the
//! value model are re-exported here for callers that only need the codec.
//!
//! # Key Functions
//!
//! - [`parse`] / [`serialize`] -- Bytes to tree and back
//! - [`load`] / [`save`] -- The same, against a file on disk

pub mod error;
pub mod file;
pub mod reader;
pub mod writer;

pub use error::{CodecError, CodecResult};
pub use file::{load, save};
pub use pdoc_types::{base64_to_hex, hex_to_base64, BASE64_LINE_WIDTH};
pub use reader::parse;
pub use writer::{serialize, PLIST_DOCTYPE, XML_HEADER};
