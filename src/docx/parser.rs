//! Word document parser.

use crate::container::{OoxmlContainer, Relationships};
use crate::error::{Error, Result};
use crate::model::{BacklogDocument, Paragraph};
use crate::options::ConvertOptions;
use crate::walker;

use super::body::read_paragraphs;
use super::images::ImageResolver;
use super::styles::StyleCatalog;

/// Relationship type suffix of the style definitions part.
const STYLES_REL: &str = "/styles";

/// Parser for Word (.docx) packages.
pub struct WordParser {
    container: OoxmlContainer,
    main_path: String,
    relationships: Relationships,
    catalog: StyleCatalog,
}

impl WordParser {
    /// Open a .docx file for parsing.
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let container = OoxmlContainer::open(path)?;
        Self::from_container(container)
    }

    /// Create a parser from bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let container = OoxmlContainer::from_bytes(data)?;
        Self::from_container(container)
    }

    /// Create a parser from a reader.
    pub fn from_reader(reader: impl std::io::Read) -> Result<Self> {
        let container = OoxmlContainer::from_reader(reader)?;
        Self::from_container(container)
    }

    /// Create a parser from a container.
    ///
    /// Fails unless the package has both a main document and a style
    /// definitions part.
    pub fn from_container(container: OoxmlContainer) -> Result<Self> {
        let main_path = container.main_document_path()?;
        let relationships = container.read_relationships(&main_path)?;

        let styles_path = Self::styles_path(&container, &main_path, &relationships)?;
        let catalog = StyleCatalog::parse(&container.read_xml(&styles_path)?)?;

        log::debug!(
            "main document {}, styles {}, {} styles",
            main_path,
            styles_path,
            catalog.len()
        );

        Ok(Self {
            container,
            main_path,
            relationships,
            catalog,
        })
    }

    /// Locate the style definitions part through the main document's
    /// relationships, falling back to its sibling `styles.xml`.
    fn styles_path(
        container: &OoxmlContainer,
        main_path: &str,
        relationships: &Relationships,
    ) -> Result<String> {
        if let Some(rel) = relationships.find_by_type_suffix(STYLES_REL) {
            let path = OoxmlContainer::resolve_path(main_path, &rel.target);
            if container.exists(&path) {
                return Ok(path);
            }
        }

        let sibling = OoxmlContainer::resolve_path(main_path, "styles.xml");
        if container.exists(&sibling) {
            return Ok(sibling);
        }

        Err(Error::MalformedPackage(
            "package has no style definitions part".to_string(),
        ))
    }

    /// The style catalog of the document.
    pub fn catalog(&self) -> &StyleCatalog {
        &self.catalog
    }

    /// Read the paragraph sequence of the main document.
    pub fn paragraphs(&self) -> Result<Vec<Paragraph>> {
        let xml = self.container.read_xml(&self.main_path)?;
        read_paragraphs(&xml)
    }

    /// Resolver for images referenced from the main document.
    pub fn images(&self) -> ImageResolver<'_> {
        ImageResolver::new(&self.container, &self.main_path, &self.relationships)
    }

    /// Convert the document into backlog items.
    pub fn parse(&self, options: &ConvertOptions) -> Result<BacklogDocument> {
        let paragraphs = self.paragraphs()?;
        let items = walker::walk(&paragraphs, &self.catalog, &self.images(), options)?;
        Ok(BacklogDocument::new(items))
    }

    /// Path of the main document part inside the package.
    pub fn main_document_path(&self) -> &str {
        &self.main_path
    }
}

impl std::fmt::Debug for WordParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WordParser")
            .field("main_path", &self.main_path)
            .field("styles", &self.catalog.len())
            .finish()
    }
}
