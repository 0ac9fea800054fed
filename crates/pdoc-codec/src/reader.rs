//! Pull reader turning XML property-list events into a value tree.

use std::io::Read;

use pdoc_types::{decode_base64, parse_date, Dictionary, Value};
use tracing::debug;
use xml::reader::{EventReader, ParserConfig, XmlEvent};

use crate::error::{CodecError, CodecResult};

/// The subset of XML events the reader cares about.
#[derive(Debug)]
enum Token {
    Open(String),
    Close(String),
    Text(String),
    End,
}

struct PlistReader<R: Read> {
    events: EventReader<R>,
}

impl<R: Read> PlistReader<R> {
    fn new(source: R) -> Self {
        let config = ParserConfig::new()
            .whitespace_to_characters(true)
            .cdata_to_characters(true)
            .ignore_comments(true);
        Self {
            events: EventReader::new_with_config(source, config),
        }
    }

    fn next_token(&mut self) -> CodecResult<Token> {
        loop {
            let event = self
                .events
                .next()
                .map_err(|e| CodecError::parse(e.to_string()))?;
            match event {
                XmlEvent::StartElement { name, .. } => return Ok(Token::Open(name.local_name)),
                XmlEvent::EndElement { name } => return Ok(Token::Close(name.local_name)),
                XmlEvent::Characters(text) | XmlEvent::CData(text) | XmlEvent::Whitespace(text) => {
                    return Ok(Token::Text(text))
                }
                XmlEvent::EndDocument => return Ok(Token::End),
                // declaration, doctype, processing instructions
                _ => continue,
            }
        }
    }

    /// Next element boundary, skipping whitespace between elements.
    fn next_tag(&mut self) -> CodecResult<Token> {
        loop {
            match self.next_token()? {
                Token::Text(text) if text.trim().is_empty() => continue,
                Token::Text(text) => {
                    return Err(CodecError::parse(format!(
                        "unexpected text between elements: {:?}",
                        text.trim()
                    )))
                }
                token => return Ok(token),
            }
        }
    }

    /// Character content of a leaf element, consuming its closing tag.
    fn read_text(&mut self, tag: &str) -> CodecResult<String> {
        let mut text = String::new();
        loop {
            match self.next_token()? {
                Token::Text(chunk) => text.push_str(&chunk),
                Token::Close(name) if name == tag => return Ok(text),
                Token::Close(name) => {
                    return Err(CodecError::parse(format!("<{tag}> closed by </{name}>")))
                }
                Token::Open(name) => {
                    return Err(CodecError::parse(format!("<{name}> nested inside <{tag}>")))
                }
                Token::End => return Err(CodecError::parse(format!("unterminated <{tag}>"))),
            }
        }
    }

    fn expect_close(&mut self, tag: &str) -> CodecResult<()> {
        match self.next_tag()? {
            Token::Close(name) if name == tag => Ok(()),
            other => Err(CodecError::parse(format!(
                "expected </{tag}>, found {}",
                describe(&other)
            ))),
        }
    }

    /// The value whose opening tag `tag` was just consumed.
    fn read_value(&mut self, tag: &str) -> CodecResult<Value> {
        match tag {
            "dict" => self.read_dict(),
            "array" => self.read_array(),
            "string" => Ok(Value::String(self.read_text(tag)?)),
            "integer" => {
                let text = self.read_text(tag)?;
                text.trim()
                    .parse::<i64>()
                    .map(Value::Integer)
                    .map_err(|e| CodecError::parse(format!("bad <integer> {text:?}: {e}")))
            }
            "real" => {
                let text = self.read_text(tag)?;
                text.trim()
                    .parse::<f64>()
                    .map(Value::Real)
                    .map_err(|e| CodecError::parse(format!("bad <real> {text:?}: {e}")))
            }
            "true" | "false" => {
                let text = self.read_text(tag)?;
                if !text.trim().is_empty() {
                    return Err(CodecError::parse(format!("<{tag}> must be empty")));
                }
                Ok(Value::Bool(tag == "true"))
            }
            "date" => Ok(Value::Date(parse_date(self.read_text(tag)?.trim())?)),
            "data" => Ok(Value::Blob(decode_base64(&self.read_text(tag)?)?)),
            other => Err(CodecError::UnknownValueKind(other.to_string())),
        }
    }

    fn read_dict(&mut self) -> CodecResult<Value> {
        let mut map = Dictionary::new();
        loop {
            match self.next_tag()? {
                Token::Close(name) if name == "dict" => return Ok(Value::Dict(map)),
                Token::Open(name) if name == "key" => {
                    let key = self.read_text("key")?;
                    let value = match self.next_tag()? {
                        Token::Open(tag) => self.read_value(&tag)?,
                        other => {
                            return Err(CodecError::parse(format!(
                                "key {key:?} has no value, found {}",
                                describe(&other)
                            )))
                        }
                    };
                    if map.insert(key.clone(), value).is_some() {
                        debug!(key = %key, "duplicate dict key, last one wins");
                    }
                }
                other => {
                    return Err(CodecError::parse(format!(
                        "expected <key> in <dict>, found {}",
                        describe(&other)
                    )))
                }
            }
        }
    }

    fn read_array(&mut self) -> CodecResult<Value> {
        let mut items = Vec::new();
        loop {
            match self.next_tag()? {
                Token::Close(name) if name == "array" => return Ok(Value::Array(items)),
                Token::Open(tag) => items.push(self.read_value(&tag)?),
                other => {
                    return Err(CodecError::parse(format!(
                        "expected a value in <array>, found {}",
                        describe(&other)
                    )))
                }
            }
        }
    }
}

fn describe(token: &Token) -> String {
    match token {
        Token::Open(name) => format!("<{name}>"),
        Token::Close(name) => format!("</{name}>"),
        Token::Text(text) => format!("text {text:?}"),
        Token::End => "end of document".to_string(),
    }
}

/// Parse a property-list document.
///
/// The root may be wrapped in `<plist>` or stand alone, but it must be a
/// dict or an array.
pub fn parse(bytes: &[u8]) -> CodecResult<Value> {
    let mut reader = PlistReader::new(bytes);
    let root = match reader.next_tag()? {
        Token::Open(name) if name == "plist" => {
            let inner = match reader.next_tag()? {
                Token::Open(tag) => reader.read_value(&tag)?,
                other => {
                    return Err(CodecError::parse(format!(
                        "empty <plist>, found {}",
                        describe(&other)
                    )))
                }
            };
            reader.expect_close("plist")?;
            inner
        }
        Token::Open(tag) => reader.read_value(&tag)?,
        other => {
            return Err(CodecError::parse(format!(
                "no root element, found {}",
                describe(&other)
            )))
        }
    };
    if !root.is_container() {
        return Err(CodecError::parse(format!(
            "root is a {}, not a dict or array",
            root.kind()
        )));
    }
    debug!(kind = %root.kind(), "parsed document");
    Ok(root)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
	<key>CFBundleName</key>
	<string>Demo &amp; Co</string>
	<key>Build</key>
	<integer>-42</integer>
	<key>Scale</key>
	<real>1.5</real>
	<key>Enabled</key>
	<true/>
	<key>Released</key>
	<date>2021-03-04T05:06:07Z</date>
	<key>Icon</key>
	<data>
	aGVs
	bG8=
	</data>
	<key>Tags</key>
	<array>
		<string>a</string>
		<false/>
		<dict/>
	</array>
</dict>
</plist>
"#;

    #[test]
    fn parses_every_kind() {
        let doc = parse(SAMPLE.as_bytes()).unwrap();
        let map = doc.as_dict().unwrap();
        assert_eq!(map["CFBundleName"], Value::from("Demo & Co"));
        assert_eq!(map["Build"], Value::Integer(-42));
        assert_eq!(map["Scale"], Value::Real(1.5));
        assert_eq!(map["Enabled"], Value::Bool(true));
        assert_eq!(map["Released"].kind(), pdoc_types::ValueKind::Date);
        assert_eq!(map["Icon"], Value::Blob(b"hello".to_vec()));
        assert_eq!(
            map["Tags"],
            Value::Array(vec![Value::from("a"), Value::Bool(false), Value::dict()])
        );
    }

    #[test]
    fn bare_root_without_plist_wrapper() {
        let doc = parse(b"<array><integer>1</integer></array>").unwrap();
        assert_eq!(doc, Value::Array(vec![Value::Integer(1)]));
    }

    #[test]
    fn string_whitespace_is_preserved() {
        let doc = parse(b"<array><string>  two  words </string><string/></array>").unwrap();
        assert_eq!(
            doc,
            Value::Array(vec![Value::from("  two  words "), Value::from("")])
        );
    }

    #[test]
    fn scalar_root_is_rejected() {
        let err = parse(b"<plist version=\"1.0\"><string>x</string></plist>").unwrap_err();
        assert!(matches!(err, CodecError::Parse { .. }));
        assert!(err.to_string().contains("not a dict or array"));
    }

    #[test]
    fn malformed_xml_is_rejected() {
        assert!(matches!(
            parse(b"<plist><dict><key>a</key>").unwrap_err(),
            CodecError::Parse { .. }
        ));
        assert!(matches!(parse(b"").unwrap_err(), CodecError::Parse { .. }));
    }

    #[test]
    fn dict_without_key_is_rejected() {
        let err = parse(b"<dict><string>orphan</string></dict>").unwrap_err();
        assert!(matches!(err, CodecError::Parse { .. }));
    }

    #[test]
    fn unknown_tag_is_reported() {
        let err = parse(b"<array><uid>3</uid></array>").unwrap_err();
        assert!(matches!(err, CodecError::UnknownValueKind(ref t) if t == "uid"));
    }

    #[test]
    fn bad_payloads_surface() {
        assert!(matches!(
            parse(b"<array><data>!!!</data></array>").unwrap_err(),
            CodecError::MalformedEncoding(_)
        ));
        assert!(matches!(
            parse(b"<array><integer>1.5</integer></array>").unwrap_err(),
            CodecError::Parse { .. }
        ));
    }
}
