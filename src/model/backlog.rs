//! Backlog item records and the output envelope.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One logical unit of the output hierarchy.
///
/// Either the implicit leading item that collects content before the first
/// heading, or an item started by a heading paragraph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BacklogItem {
    /// Display name of the heading style that created the item
    pub style_name: String,

    /// Text of the heading paragraph
    pub name: String,

    /// Newline-terminated text and image reference lines, in document order
    pub content: String,

    /// Relationship id to base64-encoded image data
    pub pictures: BTreeMap<String, String>,

    /// Numbering level of the heading style
    pub indent: u32,
}

impl BacklogItem {
    /// Create the implicit leading item.
    pub fn implicit() -> Self {
        Self::default()
    }

    /// Create an item for a heading paragraph.
    pub fn heading(style_name: impl Into<String>, name: impl Into<String>, indent: u32) -> Self {
        Self {
            style_name: style_name.into(),
            name: name.into(),
            indent,
            ..Default::default()
        }
    }

    /// Whether the item has collected neither text nor pictures.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty() && self.pictures.is_empty()
    }

    /// Append one line of content followed by `terminator`.
    pub fn push_line(&mut self, line: &str, terminator: &str) {
        self.content.push_str(line);
        self.content.push_str(terminator);
    }

    /// Record an embedded picture and its reference line.
    pub fn add_picture(&mut self, id: String, encoded: String, terminator: &str) {
        self.push_line(&id, terminator);
        self.pictures.insert(id, encoded);
    }
}

/// The output envelope: `{ "items": [...] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BacklogDocument {
    /// Items in creation order
    pub items: Vec<BacklogItem>,
}

impl BacklogDocument {
    /// Wrap an ordered item list.
    pub fn new(items: Vec<BacklogItem>) -> Self {
        Self { items }
    }

    /// Number of items started by a heading paragraph.
    ///
    /// The implicit item is the only one with an empty style name, since a
    /// heading style always has a name starting with "heading".
    pub fn heading_count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| !item.style_name.is_empty())
            .count()
    }

    /// Total number of distinct pictures across all items.
    pub fn picture_count(&self) -> usize {
        self.items.iter().map(|item| item.pictures.len()).sum()
    }
}
