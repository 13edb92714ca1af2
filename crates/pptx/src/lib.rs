//! PPTX (Office Open XML) backend for door plate generation.
//!
//! A .pptx file is a ZIP archive of XML parts. [`PptxDeck`] loads the parts
//! that matter (presentation, slides, masters and layouts) into editable
//! trees and implements [`doorplate_core::Deck`] over them; every other part
//! is carried through unchanged on save.

pub mod deck;
pub mod package;
pub mod shapes;
pub mod xml;

#[cfg(test)]
pub(crate) mod testing;

pub use deck::PptxDeck;
pub use package::{Package, Relationship, Relationships};
pub use xml::{XmlDocument, XmlElement, XmlNode};
