//! Loading and saving documents on disk.

use std::fs;
use std::io::Write;
use std::path::Path;

use pdoc_types::Value;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::CodecResult;
use crate::reader::parse;
use crate::writer::serialize;

/// Read and parse the document at `path`.
pub fn load(path: impl AsRef<Path>) -> CodecResult<Value> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    let root = parse(&bytes)?;
    debug!(path = %path.display(), bytes = bytes.len(), "loaded document");
    Ok(root)
}

/// Serialize `root` and write it to `path`.
///
/// Nothing is written if the document cannot be serialized. Otherwise it
/// is written to a temporary file next to `path` and renamed
/// over it, so readers see either the old or the new contents. Concurrent
/// writers are not coordinated; the last rename wins.
pub fn save(root: &Value, path: impl AsRef<Path>) -> CodecResult<()> {
    let path = path.as_ref();
    let text = serialize(root)?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(text.as_bytes())?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    debug!(path = %path.display(), bytes = text.len(), "saved document");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CodecError;

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Info.plist");
        let doc: Value = [
            ("name", Value::from("demo")),
            ("blob", Value::Blob(b"\x00\x01\x02".to_vec())),
        ]
        .into_iter()
        .collect();
        save(&doc, &path).unwrap();
        assert_eq!(load(&path).unwrap(), doc);
    }

    #[test]
    fn save_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.plist");
        save(&Value::array(), &path).unwrap();
        save(&Value::Array(vec![Value::Integer(1)]), &path).unwrap();
        assert_eq!(load(&path).unwrap(), Value::Array(vec![Value::Integer(1)]));
    }

    #[test]
    fn unwritable_text_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.plist");
        let good: Value = [("name", Value::from("demo"))].into_iter().collect();
        save(&good, &path).unwrap();

        let bad: Value = [("name", Value::from("nul\u{0}byte"))].into_iter().collect();
        assert!(matches!(
            save(&bad, &path).unwrap_err(),
            CodecError::MalformedEncoding(_)
        ));
        assert_eq!(load(&path).unwrap(), good);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(dir.path().join("absent.plist")).unwrap_err();
        assert!(matches!(err, CodecError::Io(_)));
    }

    #[test]
    fn unparseable_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("junk.plist");
        fs::write(&path, "not xml at all").unwrap();
        assert!(matches!(load(&path).unwrap_err(), CodecError::Parse { .. }));
    }
}
