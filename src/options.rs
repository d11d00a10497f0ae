//! Conversion options.

use crate::render::JsonFormat;

/// Terminator appended after each content line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LineEnding {
    /// `\n`
    #[default]
    Lf,
    /// `\r\n`
    CrLf,
}

impl LineEnding {
    /// The terminator text.
    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

/// Options for converting a document into backlog items.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Terminator for content lines
    pub line_ending: LineEnding,

    /// Emit the implicit leading item even when nothing precedes the first
    /// heading
    pub keep_empty_preamble: bool,

    /// Layout of the JSON output
    pub json_format: JsonFormat,
}

impl ConvertOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the content line terminator.
    pub fn with_line_ending(mut self, line_ending: LineEnding) -> Self {
        self.line_ending = line_ending;
        self
    }

    /// Always emit the implicit leading item.
    pub fn with_keep_empty_preamble(mut self, keep: bool) -> Self {
        self.keep_empty_preamble = keep;
        self
    }

    /// Set the JSON layout.
    pub fn with_json_format(mut self, format: JsonFormat) -> Self {
        self.json_format = format;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ConvertOptions::default();
        assert_eq!(options.line_ending.as_str(), "\n");
        assert!(!options.keep_empty_preamble);
        assert_eq!(options.json_format, JsonFormat::Pretty);
    }

    #[test]
    fn test_builder() {
        let options = ConvertOptions::new()
            .with_line_ending(LineEnding::CrLf)
            .with_keep_empty_preamble(true)
            .with_json_format(JsonFormat::Compact);

        assert_eq!(options.line_ending.as_str(), "\r\n");
        assert!(options.keep_empty_preamble);
        assert_eq!(options.json_format, JsonFormat::Compact);
    }
}
