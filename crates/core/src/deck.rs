//! The presentation object model the generator works against.
//!
//! Backends (see `doorplate-pptx`) implement [`Deck`] over a real document;
//! the generator only ever talks to this trait.

use crate::error::Result;
use crate::types::{LayoutInfo, LayoutRef, ShapeInfo, SlideRef};

/// An editable presentation.
pub trait Deck {
    /// Number of slides, including generated ones.
    fn slide_count(&self) -> usize;

    /// Top-level shapes of a slide, in document order.
    fn slide_shapes(&self, slide: SlideRef) -> Result<Vec<ShapeInfo>>;

    /// Set the name of a shape.
    fn rename_shape(&mut self, slide: SlideRef, shape: usize, name: &str) -> Result<()>;

    /// Replace the text of a shape. Lines become paragraphs.
    fn set_shape_text(&mut self, slide: SlideRef, shape: usize, text: &str) -> Result<()>;

    /// Make a click on the shape jump to `target`, replacing any previous link.
    fn link_shape(&mut self, slide: SlideRef, shape: usize, target: SlideRef) -> Result<()>;

    /// All master layouts across all slide masters.
    fn layouts(&self) -> Vec<LayoutInfo>;

    /// Shapes of a layout, in document order.
    fn layout_shapes(&self, layout: LayoutRef) -> Result<Vec<ShapeInfo>>;

    /// Append a new slide instantiated from a layout.
    ///
    /// Shapes of the new slide do not carry the layout's names.
    fn add_slide(&mut self, layout: LayoutRef) -> Result<SlideRef>;
}
