//! JSON encoding of the item envelope.

use crate::error::Result;
use crate::model::BacklogDocument;

/// JSON output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JsonFormat {
    /// Compact single-line JSON
    Compact,
    /// Pretty-printed with 2-space indentation
    #[default]
    Pretty,
}

/// Serialize the envelope as `{ "items": [...] }`.
pub fn to_json(doc: &BacklogDocument, format: JsonFormat) -> Result<String> {
    let json = match format {
        JsonFormat::Compact => serde_json::to_string(doc)?,
        JsonFormat::Pretty => serde_json::to_string_pretty(doc)?,
    };
    Ok(json)
}

/// Serialize with the default (pretty) layout.
pub fn to_json_default(doc: &BacklogDocument) -> Result<String> {
    to_json(doc, JsonFormat::Pretty)
}

/// Read an envelope back from JSON text.
pub fn from_json(json: &str) -> Result<BacklogDocument> {
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BacklogItem;

    fn sample() -> BacklogDocument {
        let mut epic = BacklogItem::heading("Heading 1", "Epic A", 0);
        epic.push_line("desc1", "\n");
        epic.add_picture("rId4".to_string(), "iVBORw0K".to_string(), "\n");
        BacklogDocument::new(vec![epic, BacklogItem::heading("Heading 2", "Story", 1)])
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json(&sample(), JsonFormat::Pretty).unwrap();
        assert!(json.starts_with("{\n  \"items\": ["));
        assert!(json.contains("\"styleName\": \"Heading 1\""));
        assert!(json.contains("\"content\": \"desc1\\nrId4\\n\""));
        assert!(json.contains("\"rId4\": \"iVBORw0K\""));
        assert!(json.contains("\"indent\": 1"));
    }

    #[test]
    fn test_to_json_compact() {
        let json = to_json(&sample(), JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n'));
        assert!(json.starts_with("{\"items\":[{\"styleName\":\"Heading 1\",\"name\":\"Epic A\""));
    }

    #[test]
    fn test_empty_envelope() {
        let json = to_json(&BacklogDocument::default(), JsonFormat::Compact).unwrap();
        assert_eq!(json, "{\"items\":[]}");
    }

    #[test]
    fn test_document_roundtrip() {
        let doc = sample();
        let parsed = from_json(&to_json_default(&doc).unwrap()).unwrap();
        assert_eq!(parsed, doc);
    }
}
