//! Output rendering for backlog items.
//!
//! # Example
//!
//! ```no_run
//! use word2backlog::{parse_file, render::*, ConvertOptions};
//!
//! let doc = parse_file("backlog.docx", &ConvertOptions::default())?;
//! let json = to_json(&doc, JsonFormat::Compact)?;
//! # Ok::<(), word2backlog::Error>(())
//! ```

mod json;

pub use json::{from_json, to_json, to_json_default, JsonFormat};
