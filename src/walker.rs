//! Grouping of paragraphs into backlog items.
//!
//! The walk is a fold over the paragraph sequence. Its state is the list of
//! frozen items plus the item currently collecting content; before the first
//! heading that is the implicit leading item.

use crate::docx::{ImageSource, StyleCatalog};
use crate::error::Result;
use crate::model::{BacklogItem, Paragraph};
use crate::options::ConvertOptions;

/// Accumulator of the walk.
#[derive(Debug, Clone)]
pub struct WalkState {
    items: Vec<BacklogItem>,
    current: BacklogItem,
    current_is_implicit: bool,
}

impl Default for WalkState {
    fn default() -> Self {
        Self::new()
    }
}

impl WalkState {
    /// State before any paragraph has been read.
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            current: BacklogItem::implicit(),
            current_is_implicit: true,
        }
    }

    /// The item content is currently attributed to.
    pub fn current(&self) -> &BacklogItem {
        &self.current
    }

    /// Apply one paragraph.
    pub fn step<I: ImageSource + ?Sized>(
        mut self,
        paragraph: &Paragraph,
        catalog: &StyleCatalog,
        images: &I,
        options: &ConvertOptions,
    ) -> Result<Self> {
        if let Some(style_id) = paragraph.style_id.as_deref() {
            let style = catalog.get(style_id)?;
            if style.is_heading() {
                log::trace!("heading {:?} ({})", paragraph.text, style.display_name());
                let next = BacklogItem::heading(
                    style.display_name(),
                    paragraph.text.as_str(),
                    style.indent_level(),
                );
                self.freeze(next, options);
                return Ok(self);
            }
        }

        let terminator = options.line_ending.as_str();
        let mut found_picture = false;
        for drawing in &paragraph.drawings {
            if let Some(image) = images.resolve(drawing)? {
                self.current.add_picture(image.id, image.encoded, terminator);
                found_picture = true;
            }
        }

        // Picture paragraphs contribute only their reference lines
        if !found_picture {
            self.current.push_line(&paragraph.text, terminator);
        }
        Ok(self)
    }

    /// Close the current item and make `next` current.
    fn freeze(&mut self, next: BacklogItem, options: &ConvertOptions) {
        let done = std::mem::replace(&mut self.current, next);
        if !self.current_is_implicit || options.keep_empty_preamble || !done.is_empty() {
            self.items.push(done);
        }
        self.current_is_implicit = false;
    }

    /// End of the paragraph sequence.
    ///
    /// The current item is always kept: either the last heading item, or the
    /// implicit item of a document without headings.
    pub fn finish(mut self) -> Vec<BacklogItem> {
        self.items.push(self.current);
        self.items
    }
}

/// Run the whole walk over a paragraph sequence.
pub fn walk<'p, P, I>(
    paragraphs: P,
    catalog: &StyleCatalog,
    images: &I,
    options: &ConvertOptions,
) -> Result<Vec<BacklogItem>>
where
    P: IntoIterator<Item = &'p Paragraph>,
    I: ImageSource + ?Sized,
{
    let state = paragraphs
        .into_iter()
        .try_fold(WalkState::new(), |state, paragraph| {
            state.step(paragraph, catalog, images, options)
        })?;

    let items = state.finish();
    log::debug!("walk produced {} items", items.len());
    Ok(items)
}
