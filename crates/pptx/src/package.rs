//! OPC package access: ZIP parts, relationships and content types.

use crate::xml::{XmlDocument, XmlElement};
use doorplate_core::{Error, Result};
use indexmap::IndexMap;
use regex::Regex;
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek, Write};
use std::path::Path;
use std::sync::LazyLock;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

pub const REL_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
pub const REL_SLIDE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
pub const REL_SLIDE_LAYOUT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";
pub const REL_SLIDE_MASTER: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";

const RELATIONSHIPS_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const CONTENT_TYPES_PART: &str = "[Content_Types].xml";

/// Regex for numbered relationship ids.
static REL_ID_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^rId(\d+)$").unwrap());

/// All parts of a package, in archive order.
#[derive(Debug, Clone, Default)]
pub struct Package {
    parts: IndexMap<String, Vec<u8>>,
}

impl Package {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Read every file of the archive into memory.
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut archive = ZipArchive::new(reader)
            .map_err(|e| Error::ZipError(format!("Failed to open ZIP: {}", e)))?;

        let mut parts = IndexMap::new();
        for idx in 0..archive.len() {
            let mut file = archive
                .by_index(idx)
                .map_err(|e| Error::ZipError(format!("Failed to read entry {}: {}", idx, e)))?;
            if file.is_dir() {
                continue;
            }
            let name = file.name().trim_start_matches('/').to_string();
            let mut data = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut data)
                .map_err(|e| Error::ZipError(format!("Failed to read '{}': {}", name, e)))?;
            parts.insert(name, data);
        }

        Ok(Self { parts })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.parts.contains_key(name)
    }

    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.parts.keys().map(String::as_str)
    }

    pub fn xml_part(&self, name: &str) -> Result<XmlDocument> {
        let data = self
            .parts
            .get(name)
            .ok_or_else(|| Error::PptxParseError(format!("Part '{}' not found in package", name)))?;
        let text = std::str::from_utf8(data)
            .map_err(|e| Error::XmlError(format!("'{}' is not UTF-8: {}", name, e)))?;
        XmlDocument::parse(text).map_err(|e| Error::XmlError(format!("{}: {}", name, e)))
    }

    /// Relationships of a part; empty if it has none.
    pub fn relationships(&self, part: &str) -> Result<Relationships> {
        let path = rels_path(part);
        if !self.contains(&path) {
            return Ok(Relationships::default());
        }
        Relationships::from_document(&self.xml_part(&path)?)
    }

    pub fn set_part(&mut self, name: impl Into<String>, data: Vec<u8>) {
        self.parts.insert(name.into(), data);
    }

    /// Register a content type override for a part, if not already present.
    pub fn add_override(&mut self, part: &str, content_type: &str) -> Result<()> {
        let mut types = self.xml_part(CONTENT_TYPES_PART)?;
        let part_name = format!("/{}", part);
        let exists = types
            .root
            .elements()
            .any(|e| e.local_name() == "Override" && e.attr("PartName") == Some(part_name.as_str()));
        if !exists {
            types.root.children.push(crate::xml::XmlNode::Element(
                XmlElement::new("Override")
                    .with_attr("PartName", part_name)
                    .with_attr("ContentType", content_type),
            ));
            self.set_part(CONTENT_TYPES_PART, types.to_bytes()?);
        }
        Ok(())
    }

    /// Serialize the package as a ZIP archive.
    pub fn write_to<W: Write + Seek>(&self, writer: W) -> Result<()> {
        let mut zip = ZipWriter::new(writer);
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

        for (name, data) in &self.parts {
            zip.start_file(name.as_str(), options)
                .map_err(|e| Error::ZipError(format!("Failed to add '{}': {}", name, e)))?;
            zip.write_all(data)?;
        }

        zip.finish()
            .map_err(|e| Error::ZipError(format!("Failed to finish archive: {}", e)))?;
        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut cursor = Cursor::new(Vec::new());
        self.write_to(&mut cursor)?;
        Ok(cursor.into_inner())
    }
}

/// A single package relationship.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub id: String,
    pub rel_type: String,
    pub target: String,
    pub external: bool,
}

/// The relationships of one part.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Relationships {
    items: Vec<Relationship>,
}

impl Relationships {
    pub fn from_document(doc: &XmlDocument) -> Result<Self> {
        let mut items = Vec::new();
        for el in doc.root.elements().filter(|e| e.local_name() == "Relationship") {
            let (Some(id), Some(rel_type), Some(target)) =
                (el.attr("Id"), el.attr("Type"), el.attr("Target"))
            else {
                return Err(Error::PptxParseError(
                    "Relationship without Id, Type or Target".to_string(),
                ));
            };
            items.push(Relationship {
                id: id.to_string(),
                rel_type: rel_type.to_string(),
                target: target.to_string(),
                external: el.attr("TargetMode") == Some("External"),
            });
        }
        Ok(Self { items })
    }

    pub fn to_document(&self) -> XmlDocument {
        let mut root = XmlElement::new("Relationships").with_attr("xmlns", RELATIONSHIPS_NS);
        for rel in &self.items {
            let mut el = XmlElement::new("Relationship")
                .with_attr("Id", rel.id.as_str())
                .with_attr("Type", rel.rel_type.as_str())
                .with_attr("Target", rel.target.as_str());
            if rel.external {
                el.set_attr("TargetMode", "External");
            }
            root = root.with_child(el);
        }
        XmlDocument::new(root)
    }

    pub fn get(&self, id: &str) -> Option<&Relationship> {
        self.items.iter().find(|r| r.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.items.iter()
    }

    pub fn by_type<'a>(&'a self, rel_type: &'a str) -> impl Iterator<Item = &'a Relationship> {
        self.items.iter().filter(move |r| r.rel_type == rel_type)
    }

    /// Add an internal relationship and return its new id.
    pub fn add(&mut self, rel_type: &str, target: &str) -> String {
        let next = self
            .items
            .iter()
            .filter_map(|r| REL_ID_REGEX.captures(&r.id))
            .filter_map(|c| c[1].parse::<u32>().ok())
            .max()
            .unwrap_or(0)
            + 1;
        let id = format!("rId{}", next);
        self.items.push(Relationship {
            id: id.clone(),
            rel_type: rel_type.to_string(),
            target: target.to_string(),
            external: false,
        });
        id
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Location of a part's relationships part.
pub fn rels_path(part: &str) -> String {
    match part.rsplit_once('/') {
        Some((dir, file)) => format!("{}/_rels/{}.rels", dir, file),
        None => format!("_rels/{}.rels", part),
    }
}

/// Resolve a relationship target relative to the part that owns it.
pub fn resolve_target(base_part: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }

    let mut segments: Vec<&str> = match base_part.rsplit_once('/') {
        Some((dir, _)) => dir.split('/').collect(),
        None => Vec::new(),
    };
    for segment in target.split('/') {
        match segment {
            ".." => {
                segments.pop();
            }
            "." | "" => {}
            other => segments.push(other),
        }
    }
    segments.join("/")
}

/// Relative target from one part to another, as written in relationships.
pub fn relative_target(from_part: &str, to_part: &str) -> String {
    let from_dir: Vec<&str> = match from_part.rsplit_once('/') {
        Some((dir, _)) => dir.split('/').collect(),
        None => Vec::new(),
    };
    let to: Vec<&str> = to_part.split('/').collect();
    let (to_dir, to_file) = to.split_at(to.len() - 1);

    let common = from_dir
        .iter()
        .zip(to_dir)
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<&str> = vec![".."; from_dir.len() - common];
    parts.extend_from_slice(&to_dir[common..]);
    parts.extend_from_slice(to_file);
    parts.join("/")
}
