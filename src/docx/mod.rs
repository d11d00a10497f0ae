//! WordprocessingML (.docx) package reading.
//!
//! This module turns an Office Open XML word-processing package into the
//! pieces the walker needs: the style catalog, the paragraph sequence and a
//! resolver for embedded images.

mod body;
mod images;
mod parser;
mod styles;

pub use body::read_paragraphs;
pub use images::{encode_image, ImageResolver, ImageSource, ResolvedImage};
pub use parser::WordParser;
pub use styles::{is_heading_name, StyleCatalog, StyleDescriptor};
