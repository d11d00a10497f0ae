//! Embedded image resolution.

use crate::container::{OoxmlContainer, Relationships};
use crate::error::{Error, Result};
use crate::model::DrawingRef;
use base64::Engine;

/// Encode image bytes as standard padded base64.
pub fn encode_image(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

/// An image read from the package and encoded for inlining.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedImage {
    /// Relationship id the drawing referenced
    pub id: String,
    /// Base64 of the image part
    pub encoded: String,
}

/// Resolves drawing references against the main document part's
/// relationships.
pub struct ImageResolver<'a> {
    container: &'a OoxmlContainer,
    part_path: &'a str,
    relationships: &'a Relationships,
}

impl<'a> ImageResolver<'a> {
    /// Create a resolver for drawings found in `part_path`.
    pub fn new(
        container: &'a OoxmlContainer,
        part_path: &'a str,
        relationships: &'a Relationships,
    ) -> Self {
        Self {
            container,
            part_path,
            relationships,
        }
    }

    /// Resolve a drawing to its encoded image.
    ///
    /// Drawings without a picture reference (shapes, text boxes, charts) are
    /// not images and yield `None`. A picture reference that does not lead to
    /// a readable part is an error.
    pub fn resolve(&self, drawing: &DrawingRef) -> Result<Option<ResolvedImage>> {
        let Some(id) = drawing.embed.as_deref() else {
            return Ok(None);
        };

        let bytes = self.read_image(id)?;
        log::trace!("image {}: {} bytes", id, bytes.len());
        Ok(Some(ResolvedImage {
            id: id.to_string(),
            encoded: encode_image(&bytes),
        }))
    }

    /// Read the raw bytes of the part a relationship id points at.
    pub fn read_image(&self, id: &str) -> Result<Vec<u8>> {
        let rel = self
            .relationships
            .get(id)
            .ok_or_else(|| Error::unresolved(id, "no such relationship"))?;
        if rel.external {
            return Err(Error::unresolved(
                id,
                format!("relationship targets external resource {}", rel.target),
            ));
        }

        let path = OoxmlContainer::resolve_path(self.part_path, &rel.target);
        self.container
            .read_part(&path)?
            .ok_or_else(|| Error::unresolved(id, format!("missing part {}", path)))
    }
}

/// Paragraph-level source of images, so the walker can run without a package.
pub trait ImageSource {
    /// Resolve one drawing.
    fn resolve(&self, drawing: &DrawingRef) -> Result<Option<ResolvedImage>>;
}

impl ImageSource for ImageResolver<'_> {
    fn resolve(&self, drawing: &DrawingRef) -> Result<Option<ResolvedImage>> {
        ImageResolver::resolve(self, drawing)
    }
}
