//! SVG room group extraction.

use doorplate_core::{Error, Result};
use roxmltree::{Document, Node, ParsingOptions};
use std::fs;
use std::path::Path;

pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// Reads room identifiers from the top-level groups of a drawing.
#[derive(Debug, Clone)]
pub struct RoomNameExtractor {
    /// Attribute holding the identifier, optionally `prefix:name`.
    attribute: String,
}

impl RoomNameExtractor {
    pub fn new(attribute: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
        }
    }

    /// Read and parse a drawing file.
    pub fn extract_from_path(&self, path: &Path) -> Result<Vec<String>> {
        let content = fs::read_to_string(path)?;
        let names = self.extract(&content)?;
        log::debug!("Found {} room groups in {}", names.len(), path.display());
        Ok(names)
    }

    /// Identifiers of the qualifying groups, in document order.
    pub fn extract(&self, svg: &str) -> Result<Vec<String>> {
        let options = ParsingOptions {
            allow_dtd: true,
            ..Default::default()
        };
        let doc = Document::parse_with_options(svg, options)
            .map_err(|e| Error::DrawingParseError(e.to_string()))?;

        doc.root_element()
            .children()
            .filter(|n| is_svg_group(n) && has_child_elements(n))
            .enumerate()
            .map(|(index, group)| {
                self.identifier(&group)
                    .filter(|id| !id.is_empty())
                    .map(str::to_string)
                    .ok_or_else(|| Error::MissingGroupAttribute {
                        index,
                        attribute: self.attribute.clone(),
                    })
            })
            .collect()
    }

    fn identifier<'a>(&self, node: &Node<'a, '_>) -> Option<&'a str> {
        match self.attribute.split_once(':') {
            Some((prefix, local)) => {
                let namespace = node.lookup_namespace_uri(Some(prefix))?;
                node.attribute((namespace, local))
            }
            None => node.attribute(self.attribute.as_str()),
        }
    }
}

impl Default for RoomNameExtractor {
    fn default() -> Self {
        Self::new(doorplate_core::config::DEFAULT_NAME_ATTRIBUTE)
    }
}

fn is_svg_group(node: &Node) -> bool {
    node.is_element()
        && node.tag_name().name() == "g"
        && node.tag_name().namespace() == Some(SVG_NAMESPACE)
}

fn has_child_elements(node: &Node) -> bool {
    node.descendants().skip(1).any(|n| n.is_element())
}
