//! ZIP container abstraction for OOXML packages.

use crate::error::{Error, Result};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::Path;

/// Relationship type suffix of the package's main document part.
const OFFICE_DOCUMENT_REL: &str = "/officeDocument";

/// Conventional location of the main document part.
const DEFAULT_MAIN_DOCUMENT: &str = "word/document.xml";

/// A relationship entry from a .rels file.
#[derive(Debug, Clone)]
pub struct Relationship {
    /// Relationship ID (e.g., "rId1")
    pub id: String,
    /// Relationship type URI
    pub rel_type: String,
    /// Target path (relative or absolute)
    pub target: String,
    /// Whether the target is external
    pub external: bool,
}

/// Collection of relationships parsed from a .rels file.
#[derive(Debug, Clone, Default)]
pub struct Relationships {
    /// Map from relationship ID to relationship data
    pub by_id: HashMap<String, Relationship>,
    /// Map from relationship type to list of relationships
    pub by_type: HashMap<String, Vec<Relationship>>,
}

impl Relationships {
    /// Create a new empty relationships collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a relationship by ID.
    pub fn get(&self, id: &str) -> Option<&Relationship> {
        self.by_id.get(id)
    }

    /// Find the first relationship whose type URI ends with `suffix`.
    ///
    /// Transitional and Strict OOXML use different namespace roots for the
    /// same relationship kinds, so matching is done on the trailing segment.
    pub fn find_by_type_suffix(&self, suffix: &str) -> Option<&Relationship> {
        self.by_type
            .iter()
            .filter(|(rel_type, _)| rel_type.ends_with(suffix))
            .flat_map(|(_, rels)| rels.iter())
            .min_by(|a, b| a.id.cmp(&b.id))
    }

    /// Add a relationship.
    pub fn add(&mut self, rel: Relationship) {
        self.by_type
            .entry(rel.rel_type.clone())
            .or_default()
            .push(rel.clone());
        self.by_id.insert(rel.id.clone(), rel);
    }

    /// Number of relationships.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

/// Fix XML encoding declaration from UTF-16 to UTF-8.
///
/// After UTF-16 content is decoded into a Rust `String`, the declaration
/// still names UTF-16 and quick-xml would try to re-decode it.
fn fix_xml_encoding_declaration(content: &str) -> String {
    if content.starts_with("<?xml") {
        if let Some(end_decl) = content.find("?>") {
            let decl = &content[..end_decl + 2];
            let rest = &content[end_decl + 2..];

            let fixed_decl = decl
                .replace("encoding=\"UTF-16\"", "encoding=\"UTF-8\"")
                .replace("encoding='UTF-16'", "encoding='UTF-8'")
                .replace("encoding=\"utf-16\"", "encoding=\"UTF-8\"")
                .replace("encoding='utf-16'", "encoding='UTF-8'");

            return format!("{}{}", fixed_decl, rest);
        }
    }
    content.to_string()
}

/// Decode XML bytes handling different encodings (UTF-8, UTF-16 LE/BE).
pub fn decode_xml_bytes(bytes: &[u8]) -> Result<String> {
    // UTF-8 BOM: EF BB BF
    if bytes.len() >= 3 && bytes[0] == 0xEF && bytes[1] == 0xBB && bytes[2] == 0xBF {
        return String::from_utf8(bytes[3..].to_vec())
            .map_err(|e| Error::MalformedPackage(format!("invalid UTF-8 in XML part: {}", e)));
    }

    // UTF-16 LE BOM: FF FE
    if bytes.len() >= 2 && bytes[0] == 0xFF && bytes[1] == 0xFE {
        let content = decode_utf16(&bytes[2..], u16::from_le_bytes)?;
        return Ok(fix_xml_encoding_declaration(&content));
    }

    // UTF-16 BE BOM: FE FF
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let content = decode_utf16(&bytes[2..], u16::from_be_bytes)?;
        return Ok(fix_xml_encoding_declaration(&content));
    }

    match String::from_utf8(bytes.to_vec()) {
        Ok(s) => Ok(s),
        Err(_) => {
            // No BOM: ASCII markup in UTF-16 leaves a zero in every other byte
            if bytes.len() >= 4 && bytes[1] == 0 && bytes[3] == 0 {
                decode_utf16(bytes, u16::from_le_bytes)
            } else if bytes.len() >= 4 && bytes[0] == 0 && bytes[2] == 0 {
                decode_utf16(bytes, u16::from_be_bytes)
            } else {
                Ok(String::from_utf8_lossy(bytes).into_owned())
            }
        }
    }
}

/// Decode UTF-16 bytes with the given byte order.
fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> Result<String> {
    let u16_iter = bytes.chunks_exact(2).map(|pair| unit([pair[0], pair[1]]));

    char::decode_utf16(u16_iter)
        .collect::<std::result::Result<String, _>>()
        .map_err(|e| Error::MalformedPackage(format!("invalid UTF-16 in XML part: {}", e)))
}

/// OOXML container abstraction over a ZIP archive.
///
/// The whole package is held in memory, so nothing outlives the container
/// and every exit path releases the input.
pub struct OoxmlContainer {
    archive: RefCell<zip::ZipArchive<Cursor<Vec<u8>>>>,
}

impl OoxmlContainer {
    /// Open an OOXML container from a file path.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use word2backlog::container::OoxmlContainer;
    ///
    /// let container = OoxmlContainer::open("backlog.docx")?;
    /// # Ok::<(), word2backlog::Error>(())
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(BufReader::new(file))
    }

    /// Create an OOXML container from a byte vector.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        log::debug!("opening package of {} bytes", data.len());
        let archive = zip::ZipArchive::new(Cursor::new(data))?;
        Ok(Self {
            archive: RefCell::new(archive),
        })
    }

    /// Create an OOXML container from a reader.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(data)
    }

    /// Read a part's raw bytes, or `None` if the archive has no such entry.
    pub fn read_part(&self, path: &str) -> Result<Option<Vec<u8>>> {
        let mut archive = self.archive.borrow_mut();
        let mut file = match archive.by_name(path) {
            Ok(file) => file,
            Err(zip::result::ZipError::FileNotFound) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;
        Ok(Some(data))
    }

    /// Read a binary part that must be present.
    pub fn read_binary(&self, path: &str) -> Result<Vec<u8>> {
        self.read_part(path)?
            .ok_or_else(|| Error::MalformedPackage(format!("missing part: {}", path)))
    }

    /// Read an XML part that must be present, decoding UTF-8 or UTF-16.
    pub fn read_xml(&self, path: &str) -> Result<String> {
        let bytes = self.read_binary(path)?;
        decode_xml_bytes(&bytes)
    }

    /// Check if a file exists in the archive.
    pub fn exists(&self, path: &str) -> bool {
        let archive = self.archive.borrow();
        let found = archive.file_names().any(|n| n == path);
        found
    }

    /// List all files in the archive.
    pub fn list_files(&self) -> Vec<String> {
        let archive = self.archive.borrow();
        archive.file_names().map(String::from).collect()
    }

    /// Read and parse the relationships owned by a part.
    pub fn read_relationships(&self, part_path: &str) -> Result<Relationships> {
        let rels_path = if part_path.is_empty() || part_path == "/" {
            "_rels/.rels".to_string()
        } else {
            let path = Path::new(part_path);
            let filename = path.file_name().unwrap_or_default().to_string_lossy();
            match path.parent().filter(|p| !p.as_os_str().is_empty()) {
                Some(parent) => format!("{}/_rels/{}.rels", parent.display(), filename),
                None => format!("_rels/{}.rels", filename),
            }
        };

        self.parse_relationships(&rels_path)
    }

    /// Read package-level relationships (_rels/.rels).
    pub fn read_package_relationships(&self) -> Result<Relationships> {
        self.parse_relationships("_rels/.rels")
    }

    /// Locate the main document part.
    ///
    /// Follows the package's officeDocument relationship, falling back to the
    /// conventional `word/document.xml`.
    pub fn main_document_path(&self) -> Result<String> {
        let rels = self.read_package_relationships()?;
        if let Some(rel) = rels.find_by_type_suffix(OFFICE_DOCUMENT_REL) {
            let path = Self::resolve_path("", &rel.target);
            if self.exists(&path) {
                return Ok(path);
            }
            log::debug!("officeDocument target {} is absent", path);
        }

        if self.exists(DEFAULT_MAIN_DOCUMENT) {
            return Ok(DEFAULT_MAIN_DOCUMENT.to_string());
        }

        Err(Error::MalformedPackage(
            "package has no main document part".to_string(),
        ))
    }

    /// Parse a relationships file. A missing .rels file is an empty set.
    fn parse_relationships(&self, rels_path: &str) -> Result<Relationships> {
        let content = match self.read_part(rels_path)? {
            Some(bytes) => decode_xml_bytes(&bytes)?,
            None => return Ok(Relationships::new()),
        };

        if content.trim().is_empty() {
            return Ok(Relationships::new());
        }

        let mut rels = Relationships::new();
        let mut reader = quick_xml::Reader::from_str(&content);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf) {
                Ok(quick_xml::events::Event::Empty(e)) | Ok(quick_xml::events::Event::Start(e))
                    if e.local_name().as_ref() == b"Relationship" =>
                {
                    let mut id = String::new();
                    let mut rel_type = String::new();
                    let mut target = String::new();
                    let mut external = false;

                    for attr in e.attributes().flatten() {
                        match attr.key.as_ref() {
                            b"Id" => id = String::from_utf8_lossy(&attr.value).to_string(),
                            b"Type" => rel_type = String::from_utf8_lossy(&attr.value).to_string(),
                            b"Target" => target = String::from_utf8_lossy(&attr.value).to_string(),
                            b"TargetMode" => {
                                external = String::from_utf8_lossy(&attr.value)
                                    .eq_ignore_ascii_case("external")
                            }
                            _ => {}
                        }
                    }

                    if !id.is_empty() {
                        rels.add(Relationship {
                            id,
                            rel_type,
                            target,
                            external,
                        });
                    }
                }
                Ok(quick_xml::events::Event::Eof) => break,
                Err(e) => {
                    return Err(Error::MalformedPackage(format!(
                        "{}: {}",
                        rels_path, e
                    )))
                }
                _ => {}
            }
            buf.clear();
        }

        log::debug!("{}: {} relationships", rels_path, rels.len());
        Ok(rels)
    }

    /// Resolve a relative path from a base part path.
    pub fn resolve_path(base: &str, relative: &str) -> String {
        if let Some(stripped) = relative.strip_prefix('/') {
            return stripped.to_string();
        }

        let base_dir = Path::new(base).parent().unwrap_or(Path::new(""));

        let mut result = base_dir.to_path_buf();
        for component in Path::new(relative).components() {
            match component {
                std::path::Component::ParentDir => {
                    result.pop();
                }
                std::path::Component::Normal(c) => {
                    result.push(c);
                }
                _ => {}
            }
        }

        result.to_string_lossy().replace('\\', "/")
    }
}

impl std::fmt::Debug for OoxmlContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OoxmlContainer")
            .field("files", &self.list_files().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn build_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut buffer = Vec::new();
        {
            let mut zip = zip::ZipWriter::new(Cursor::new(&mut buffer));
            let options = SimpleFileOptions::default();
            for (name, data) in entries {
                zip.start_file(*name, options).unwrap();
                zip.write_all(data).unwrap();
            }
            zip.finish().unwrap();
        }
        buffer
    }

    const PACKAGE_RELS: &[u8] = br#"<?xml version="1.0" encoding="UTF-8"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="/word/main.xml"/>
</Relationships>"#;

    #[test]
    fn test_resolve_path() {
        assert_eq!(
            OoxmlContainer::resolve_path("word/document.xml", "../media/image1.png"),
            "media/image1.png"
        );
        assert_eq!(
            OoxmlContainer::resolve_path("word/document.xml", "media/image1.png"),
            "word/media/image1.png"
        );
        assert_eq!(
            OoxmlContainer::resolve_path("word/document.xml", "/word/media/image2.jpeg"),
            "word/media/image2.jpeg"
        );
        assert_eq!(
            OoxmlContainer::resolve_path("", "word/document.xml"),
            "word/document.xml"
        );
    }

    #[test]
    fn test_relationships_collection() {
        let mut rels = Relationships::new();
        rels.add(Relationship {
            id: "rId1".to_string(),
            rel_type: "http://purl.oclc.org/ooxml/officeDocument/relationships/officeDocument"
                .to_string(),
            target: "word/document.xml".to_string(),
            external: false,
        });
        rels.add(Relationship {
            id: "rId2".to_string(),
            rel_type: "http://test/type1".to_string(),
            target: "target2.xml".to_string(),
            external: false,
        });

        assert!(rels.get("rId1").is_some());
        assert!(rels.get("rId3").is_none());
        assert_eq!(rels.len(), 2);
        assert_eq!(
            rels.find_by_type_suffix("/officeDocument").map(|r| r.id.as_str()),
            Some("rId1")
        );
    }

    #[test]
    fn test_main_document_from_package_rels() {
        let data = build_zip(&[
            ("_rels/.rels", PACKAGE_RELS),
            ("word/main.xml", b"<w:document/>"),
        ]);
        let container = OoxmlContainer::from_bytes(data).unwrap();
        assert_eq!(container.main_document_path().unwrap(), "word/main.xml");
    }

    #[test]
    fn test_main_document_fallback_and_missing() {
        let data = build_zip(&[("word/document.xml", b"<w:document/>")]);
        let container = OoxmlContainer::from_bytes(data).unwrap();
        assert_eq!(container.main_document_path().unwrap(), "word/document.xml");

        let data = build_zip(&[("other.xml", b"<x/>")]);
        let container = OoxmlContainer::from_bytes(data).unwrap();
        assert!(matches!(
            container.main_document_path(),
            Err(Error::MalformedPackage(_))
        ));
    }

    #[test]
    fn test_document_relationships_external_flag() {
        let rels = br#"<?xml version="1.0" encoding="UTF-8"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId4" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="media/image1.png"/>
  <Relationship Id="rId5" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="http://example.com/a.png" TargetMode="External"/>
</Relationships>"#;
        let data = build_zip(&[("word/_rels/document.xml.rels", rels)]);
        let container = OoxmlContainer::from_bytes(data).unwrap();
        let parsed = container.read_relationships("word/document.xml").unwrap();

        assert_eq!(parsed.get("rId4").unwrap().target, "media/image1.png");
        assert!(!parsed.get("rId4").unwrap().external);
        assert!(parsed.get("rId5").unwrap().external);
    }

    #[test]
    fn test_read_part_missing_is_none() {
        let data = build_zip(&[("word/document.xml", b"<w:document/>")]);
        let container = OoxmlContainer::from_bytes(data).unwrap();
        assert!(container.read_part("word/media/none.png").unwrap().is_none());
        assert!(matches!(
            container.read_xml("word/styles.xml"),
            Err(Error::MalformedPackage(_))
        ));
    }

    #[test]
    fn test_read_part_ignores_declared_size() {
        let mut data = build_zip(&[("word/media/image1.png", b"tiny")]);
        // Uncompressed size field of the central directory entry
        let central = data.windows(4).position(|w| w == b"PK\x01\x02").unwrap();
        data[central + 24..central + 28].copy_from_slice(&0xFFFF_FFF0u32.to_le_bytes());

        let container = match OoxmlContainer::from_bytes(data) {
            Ok(container) => container,
            Err(e) => {
                assert!(matches!(e, Error::MalformedPackage(_)));
                return;
            }
        };
        match container.read_part("word/media/image1.png") {
            Ok(Some(bytes)) => assert_eq!(bytes, b"tiny"),
            Ok(None) => panic!("entry should be present"),
            Err(e) => assert!(matches!(e, Error::StreamRead(_) | Error::MalformedPackage(_))),
        }
    }

    #[test]
    fn test_not_a_zip() {
        let result = OoxmlContainer::from_bytes(b"plain text, not a package".to_vec());
        assert!(matches!(result, Err(Error::MalformedPackage(_))));
    }

    #[test]
    fn test_utf16_decoding_function() {
        let utf16_le = b"\xFF\xFE<\0?\0x\0m\0l\0>\0";
        assert_eq!(decode_xml_bytes(utf16_le).unwrap(), "<?xml>");

        let utf16_be = b"\xFE\xFF\0<\0?\0x\0m\0l\0>";
        assert_eq!(decode_xml_bytes(utf16_be).unwrap(), "<?xml>");

        let utf8_bom = b"\xEF\xBB\xBF<?xml>";
        assert_eq!(decode_xml_bytes(utf8_bom).unwrap(), "<?xml>");

        assert_eq!(decode_xml_bytes(b"<?xml>").unwrap(), "<?xml>");
    }

    #[test]
    fn test_utf16_declaration_rewritten() {
        let decl = "<?xml version=\"1.0\" encoding=\"UTF-16\"?><a/>";
        let mut bytes = vec![0xFF, 0xFE];
        for unit in decl.encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        let decoded = decode_xml_bytes(&bytes).unwrap();
        assert_eq!(decoded, "<?xml version=\"1.0\" encoding=\"UTF-8\"?><a/>");
    }
}
