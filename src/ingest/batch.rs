// src/ingest/batch.rs
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::ingest::types::InputError;
use crate::model::CandidateItem;

/// Read a batch file holding a JSON array of items.
pub fn load_batch_file(path: &Path) -> Result<Vec<CandidateItem>, InputError> {
    let raw = fs::read_to_string(path).map_err(|source| InputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let items = parse_batch(&raw)?;
    info!(path = %path.display(), count = items.len(), "loaded batch file");
    Ok(items)
}

/// Parse a JSON array of items; the first bad record rejects the batch.
pub fn parse_batch(raw: &str) -> Result<Vec<CandidateItem>, InputError> {
    let value: Value = serde_json::from_str(raw)?;
    let Value::Array(records) = value else {
        return Err(InputError::NotAnArray);
    };
    records
        .into_iter()
        .enumerate()
        .map(|(index, rec)| {
            serde_json::from_value(rec).map_err(|source| InputError::InvalidItem { index, source })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_array_of_items() {
        let raw = r#"[
            {"title": "A", "url": "https://a.test", "source": "OpenAI", "tags": ["llm"]},
            {"title": "B", "url": "https://b.test", "extra": 1}
        ]"#;
        let items = parse_batch(raw).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].source.as_deref(), Some("OpenAI"));
        assert!(items[1].tags.is_empty());
    }

    #[test]
    fn object_root_is_rejected() {
        let err = parse_batch(r#"{"title": "A", "url": "u"}"#).unwrap_err();
        assert!(matches!(err, InputError::NotAnArray));
    }

    #[test]
    fn bad_record_names_its_index() {
        let raw = r#"[{"title": "A", "url": "u"}, {"title": "no url"}]"#;
        let err = parse_batch(raw).unwrap_err();
        assert!(matches!(err, InputError::InvalidItem { index: 1, .. }));
    }

    #[test]
    fn invalid_json_is_rejected() {
        assert!(matches!(parse_batch("[{"), Err(InputError::Json(_))));
    }

    #[test]
    fn missing_file_is_io_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = load_batch_file(&tmp.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, InputError::Io { .. }));
    }
}
