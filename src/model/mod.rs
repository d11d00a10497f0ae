//! Data model for backlog conversion.
//!
//! Paragraphs are what the docx reader produces; backlog items are what the
//! walker builds from them and the renderer serializes.

mod backlog;
mod paragraph;

pub use backlog::*;
pub use paragraph::*;
