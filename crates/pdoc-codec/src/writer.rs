//! Property-list writer.
//!
//! Output is tab-indented with one element per line, the layout most
//! property-list tooling produces, so rewritten files diff cleanly against
//! their originals.

use pdoc_types::{encode_base64_lines, format_date, Path, TypeError, Value, BASE64_LINE_WIDTH};
use xml::escape::escape_str_pcdata;

use crate::error::{CodecError, CodecResult};

pub const XML_HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

pub const PLIST_DOCTYPE: &str = r#"<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">"#;

/// Serialize a document, root included in a `<plist version="1.0">`
/// element.
///
/// Fails if a key or string holds a character XML 1.0 cannot carry, so a
/// document is never written that [`parse`](crate::parse) would reject.
pub fn serialize(root: &Value) -> CodecResult<String> {
    let mut out = String::with_capacity(256);
    out.push_str(XML_HEADER);
    out.push('\n');
    out.push_str(PLIST_DOCTYPE);
    out.push('\n');
    out.push_str("<plist version=\"1.0\">\n");
    write_value(&mut out, root, 0, &mut Path::root())?;
    out.push_str("</plist>\n");
    Ok(out)
}

/// Characters allowed by the XML 1.0 `Char` production.
fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}')
}

fn check_text(text: &str, at: &Path) -> CodecResult<()> {
    match text.chars().find(|c| !is_xml_char(*c)) {
        Some(c) => Err(CodecError::MalformedEncoding(TypeError::MalformedEncoding {
            encoding: "xml".to_string(),
            reason: format!("character U+{:04X} at {at} cannot be written", c as u32),
        })),
        None => Ok(()),
    }
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push('\t');
    }
}

fn leaf(out: &mut String, depth: usize, tag: &str, text: &str) {
    indent(out, depth);
    out.push('<');
    out.push_str(tag);
    out.push('>');
    // a bare CR would come back as LF
    out.push_str(&escape_str_pcdata(text).replace('\r', "&#13;"));
    out.push_str("</");
    out.push_str(tag);
    out.push_str(">\n");
}

fn write_value(out: &mut String, value: &Value, depth: usize, at: &mut Path) -> CodecResult<()> {
    match value {
        Value::Dict(map) if map.is_empty() => {
            indent(out, depth);
            out.push_str("<dict/>\n");
        }
        Value::Dict(map) => {
            indent(out, depth);
            out.push_str("<dict>\n");
            for (key, child) in map {
                at.push(key.as_str());
                check_text(key, at)?;
                leaf(out, depth + 1, "key", key);
                write_value(out, child, depth + 1, at)?;
                at.pop();
            }
            indent(out, depth);
            out.push_str("</dict>\n");
        }
        Value::Array(items) if items.is_empty() => {
            indent(out, depth);
            out.push_str("<array/>\n");
        }
        Value::Array(items) => {
            indent(out, depth);
            out.push_str("<array>\n");
            for (index, child) in items.iter().enumerate() {
                at.push(index);
                write_value(out, child, depth + 1, at)?;
                at.pop();
            }
            indent(out, depth);
            out.push_str("</array>\n");
        }
        Value::String(s) => {
            check_text(s, at)?;
            leaf(out, depth, "string", s);
        }
        Value::Integer(i) => leaf(out, depth, "integer", &i.to_string()),
        Value::Real(r) => leaf(out, depth, "real", &r.to_string()),
        Value::Bool(b) => {
            indent(out, depth);
            out.push_str(if *b { "<true/>\n" } else { "<false/>\n" });
        }
        Value::Date(d) => leaf(out, depth, "date", &format_date(d)),
        Value::Blob(bytes) => {
            indent(out, depth);
            out.push_str("<data>\n");
            for line in encode_base64_lines(bytes, BASE64_LINE_WIDTH) {
                indent(out, depth);
                out.push_str(&line);
                out.push('\n');
            }
            indent(out, depth);
            out.push_str("</data>\n");
        }
    }
    Ok(())
}
