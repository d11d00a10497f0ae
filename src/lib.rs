//! # word2backlog
//!
//! Convert heading-structured Word documents into backlog item records.
//!
//! Every paragraph whose style name starts with "heading" opens a new item;
//! the paragraphs that follow it, and any pictures they embed, become that
//! item's content. Content before the first heading lands in an implicit
//! leading item.
//!
//! ## Quick Start
//!
//! ```no_run
//! use word2backlog::{convert_file, parse_file, ConvertOptions};
//!
//! // JSON text ready for ingestion
//! let json = convert_file("backlog.docx", &ConvertOptions::default())?;
//! std::fs::write("backlog.json", json)?;
//!
//! // Or the records themselves
//! let doc = parse_file("backlog.docx", &ConvertOptions::default())?;
//! for item in &doc.items {
//!     println!("{}{}", "  ".repeat(item.indent as usize), item.name);
//! }
//! # Ok::<(), word2backlog::Error>(())
//! ```
//!
//! ## Features
//!
//! - `ffi`: C-ABI bindings for foreign language integration

pub mod container;
pub mod docx;
pub mod error;
pub mod model;
pub mod options;
pub mod render;
pub mod walker;

#[cfg(feature = "ffi")]
pub mod ffi;

// Re-exports
pub use container::{OoxmlContainer, Relationship, Relationships};
pub use docx::{StyleCatalog, StyleDescriptor, WordParser};
pub use error::{Error, Result};
pub use model::{BacklogDocument, BacklogItem, DrawingRef, Paragraph};
pub use options::{ConvertOptions, LineEnding};
pub use render::JsonFormat;

use std::io::Read;
use std::path::Path;

/// Parse a .docx file into backlog items.
///
/// # Example
///
/// ```no_run
/// use word2backlog::{parse_file, ConvertOptions};
///
/// let doc = parse_file("backlog.docx", &ConvertOptions::default())?;
/// println!("Items: {}", doc.items.len());
/// # Ok::<(), word2backlog::Error>(())
/// ```
pub fn parse_file(path: impl AsRef<Path>, options: &ConvertOptions) -> Result<BacklogDocument> {
    WordParser::open(path)?.parse(options)
}

/// Parse a .docx package held in memory.
pub fn parse_bytes(data: &[u8], options: &ConvertOptions) -> Result<BacklogDocument> {
    WordParser::from_bytes(data.to_vec())?.parse(options)
}

/// Parse a .docx package from a byte stream.
pub fn parse_reader(reader: impl Read, options: &ConvertOptions) -> Result<BacklogDocument> {
    WordParser::from_reader(reader)?.parse(options)
}

/// Convert a .docx file to the JSON item envelope.
///
/// # Example
///
/// ```no_run
/// use word2backlog::{convert_file, ConvertOptions, JsonFormat};
///
/// let options = ConvertOptions::new().with_json_format(JsonFormat::Compact);
/// let json = convert_file("backlog.docx", &options)?;
/// assert!(json.starts_with("{\"items\":"));
/// # Ok::<(), word2backlog::Error>(())
/// ```
pub fn convert_file(path: impl AsRef<Path>, options: &ConvertOptions) -> Result<String> {
    let doc = parse_file(path, options)?;
    render::to_json(&doc, options.json_format)
}

/// Convert an in-memory .docx package to the JSON item envelope.
pub fn convert_bytes(data: &[u8], options: &ConvertOptions) -> Result<String> {
    let doc = parse_bytes(data, options)?;
    render::to_json(&doc, options.json_format)
}

/// Convert a .docx byte stream to the JSON item envelope.
pub fn convert_reader(reader: impl Read, options: &ConvertOptions) -> Result<String> {
    let doc = parse_reader(reader, options)?;
    render::to_json(&doc, options.json_format)
}
