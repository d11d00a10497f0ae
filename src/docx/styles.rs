//! Style catalog built from styles.xml.

use crate::error::{Error, Result};
use std::collections::HashMap;

/// Display-name prefix that marks a style as an outline heading.
const HEADING_PREFIX: &str = "heading";

/// Classification of one style definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleDescriptor {
    display_name: String,
    is_heading: bool,
    indent_level: u32,
}

impl StyleDescriptor {
    /// Classify a style from its display name and numbering level.
    pub fn new(display_name: impl Into<String>, indent_level: u32) -> Self {
        let display_name = display_name.into();
        Self {
            is_heading: is_heading_name(&display_name),
            display_name,
            indent_level,
        }
    }

    /// Style name (e.g., "Heading 1")
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Whether paragraphs with this style start a new backlog item.
    pub fn is_heading(&self) -> bool {
        self.is_heading
    }

    /// Numbering level reference of the style, 0 when it has none.
    pub fn indent_level(&self) -> u32 {
        self.indent_level
    }
}

/// Case-insensitive check for the "heading" prefix.
pub fn is_heading_name(name: &str) -> bool {
    name.get(..HEADING_PREFIX.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(HEADING_PREFIX))
}

/// Lookup from style id to its descriptor.
#[derive(Debug, Clone, Default)]
pub struct StyleCatalog {
    styles: HashMap<String, StyleDescriptor>,
}

/// A style definition while its element is still open.
#[derive(Default)]
struct PendingStyle {
    id: String,
    name: Option<String>,
    indent_level: Option<u32>,
    depth: u32,
    in_ppr: bool,
    in_numpr: bool,
}

impl PendingStyle {
    /// Pick up `w:name` and `w:ilvl`, whether written self-closing or not.
    fn read_leaf(&mut self, e: &quick_xml::events::BytesStart) -> Result<()> {
        match e.name().as_ref() {
            b"w:name" if self.depth == 0 => self.name = get_attr(e, b"w:val"),
            b"w:ilvl" if self.in_numpr => {
                self.indent_level = Some(parse_level(&self.id, e)?);
            }
            _ => {}
        }
        Ok(())
    }
}

impl StyleCatalog {
    /// Parse every `w:style` in a styles part.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut catalog = StyleCatalog::default();
        if xml.trim().is_empty() {
            return Ok(catalog);
        }

        let mut reader = quick_xml::Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        let mut current: Option<PendingStyle> = None;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(quick_xml::events::Event::Start(e)) => {
                    if let Some(ref mut style) = current {
                        style.read_leaf(&e)?;
                        style.depth += 1;
                        match e.name().as_ref() {
                            // Only the style's own pPr, not table-style conditional ones
                            b"w:pPr" if style.depth == 1 => style.in_ppr = true,
                            b"w:numPr" if style.in_ppr => style.in_numpr = true,
                            _ => {}
                        }
                    } else if e.name().as_ref() == b"w:style" {
                        current = Some(PendingStyle {
                            id: style_id(&e),
                            ..Default::default()
                        });
                    }
                }
                Ok(quick_xml::events::Event::Empty(e)) => match current {
                    Some(ref mut style) => style.read_leaf(&e)?,
                    None if e.name().as_ref() == b"w:style" => {
                        catalog.insert(PendingStyle {
                            id: style_id(&e),
                            ..Default::default()
                        })?;
                    }
                    None => {}
                },
                Ok(quick_xml::events::Event::End(e)) => {
                    let closes_style = e.name().as_ref() == b"w:style"
                        && current.as_ref().is_some_and(|s| s.depth == 0);
                    if closes_style {
                        if let Some(done) = current.take() {
                            catalog.insert(done)?;
                        }
                    } else if let Some(ref mut style) = current {
                        match e.name().as_ref() {
                            b"w:numPr" => style.in_numpr = false,
                            b"w:pPr" if style.depth == 1 => style.in_ppr = false,
                            _ => {}
                        }
                        style.depth = style.depth.saturating_sub(1);
                    }
                }
                Ok(quick_xml::events::Event::Eof) => break,
                Err(e) => {
                    return Err(Error::MalformedPackage(format!("styles part: {}", e)));
                }
                _ => {}
            }
            buf.clear();
        }

        log::debug!(
            "style catalog: {} styles, {} headings",
            catalog.len(),
            catalog.styles.values().filter(|s| s.is_heading()).count()
        );
        Ok(catalog)
    }

    fn insert(&mut self, style: PendingStyle) -> Result<()> {
        if style.id.is_empty() {
            return Err(Error::MalformedPackage(
                "style definition without w:styleId".to_string(),
            ));
        }
        if self.styles.contains_key(&style.id) {
            return Err(Error::MalformedPackage(format!(
                "duplicate style id: {}",
                style.id
            )));
        }

        let name = style.name.unwrap_or_else(|| style.id.clone());
        let descriptor = StyleDescriptor::new(name, style.indent_level.unwrap_or(0));
        self.styles.insert(style.id, descriptor);
        Ok(())
    }

    /// Look up a style id. A miss is an inconsistency between the body and
    /// the style table, never a default.
    pub fn get(&self, id: &str) -> Result<&StyleDescriptor> {
        self.styles
            .get(id)
            .ok_or_else(|| Error::UnknownStyleReference(id.to_string()))
    }

    /// Iterate over `(id, descriptor)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &StyleDescriptor)> {
        self.styles.iter().map(|(id, style)| (id.as_str(), style))
    }

    /// Number of styles.
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

impl FromIterator<(String, StyleDescriptor)> for StyleCatalog {
    fn from_iter<I: IntoIterator<Item = (String, StyleDescriptor)>>(iter: I) -> Self {
        Self {
            styles: iter.into_iter().collect(),
        }
    }
}

fn style_id(e: &quick_xml::events::BytesStart) -> String {
    get_attr(e, b"w:styleId").unwrap_or_default()
}

fn parse_level(style_id: &str, e: &quick_xml::events::BytesStart) -> Result<u32> {
    let val = get_attr(e, b"w:val").unwrap_or_default();
    val.trim().parse().map_err(|_| {
        Error::MalformedPackage(format!(
            "style {} has invalid numbering level {:?}",
            style_id, val
        ))
    })
}

/// Helper to get an attribute value as a string.
fn get_attr(e: &quick_xml::events::BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .map(|attr| String::from_utf8_lossy(&attr.value).to_string())
}
