//! Paragraphs as read from the document body.

/// A drawing embedded in a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrawingRef {
    /// `r:embed` of the first `a:blip` inside the drawing, if any
    pub embed: Option<String>,
}

impl DrawingRef {
    /// Drawing with a picture reference.
    pub fn embedded(id: impl Into<String>) -> Self {
        Self {
            embed: Some(id.into()),
        }
    }
}

/// A block-level paragraph reduced to what structure detection needs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Paragraph {
    /// Paragraph style id (`w:pPr/w:pStyle`), absent for the default style
    pub style_id: Option<String>,

    /// Concatenated text of every run, including nested content
    pub text: String,

    /// Drawings in encounter order
    pub drawings: Vec<DrawingRef>,
}

impl Paragraph {
    /// Create an empty paragraph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an unstyled paragraph with text.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// Create a styled paragraph with text.
    pub fn styled(style_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            style_id: Some(style_id.into()),
            text: text.into(),
            ..Default::default()
        }
    }

    /// Add a drawing (builder style).
    pub fn with_drawing(mut self, drawing: DrawingRef) -> Self {
        self.drawings.push(drawing);
        self
    }
}
