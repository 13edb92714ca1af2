//! In-memory [`Deck`] used by the unit tests.

use crate::deck::Deck;
use crate::error::{Error, Result};
use crate::types::{LayoutInfo, LayoutRef, Offset, ShapeInfo, SlideRef};

#[derive(Debug, Clone)]
struct FakeShape {
    name: String,
    offset: Option<Offset>,
    text: Option<String>,
    link: Option<SlideRef>,
}

#[derive(Debug, Default)]
struct FakeSlide {
    layout: Option<LayoutRef>,
    shapes: Vec<FakeShape>,
}

#[derive(Debug)]
struct FakeLayout {
    name: String,
    shapes: Vec<FakeShape>,
}

/// Slides and layouts held in vectors.
///
/// Slides created from a layout get their shapes in reverse layout order with
/// generic names, so tests notice when matching relies on order or names.
#[derive(Debug, Default)]
pub struct FakeDeck {
    slides: Vec<FakeSlide>,
    layouts: Vec<FakeLayout>,
}

fn make_shapes(shapes: Vec<(&str, Option<(i64, i64)>)>) -> Vec<FakeShape> {
    shapes
        .into_iter()
        .map(|(name, offset)| FakeShape {
            name: name.to_string(),
            offset: offset.map(|(top, left)| Offset::new(top, left)),
            text: None,
            link: None,
        })
        .collect()
}

impl FakeDeck {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_slide(&mut self, shapes: Vec<(&str, Option<(i64, i64)>)>) -> SlideRef {
        self.slides.push(FakeSlide {
            layout: None,
            shapes: make_shapes(shapes),
        });
        SlideRef(self.slides.len() - 1)
    }

    pub fn push_layout(&mut self, name: &str, shapes: Vec<(&str, Option<(i64, i64)>)>) -> LayoutRef {
        self.layouts.push(FakeLayout {
            name: name.to_string(),
            shapes: make_shapes(shapes),
        });
        LayoutRef(self.layouts.len() - 1)
    }

    pub fn names(&self, slide: SlideRef) -> Vec<String> {
        self.slides[slide.0]
            .shapes
            .iter()
            .map(|s| s.name.clone())
            .collect()
    }

    fn find(&self, slide: SlideRef, name: &str) -> Option<&FakeShape> {
        self.slides
            .get(slide.0)?
            .shapes
            .iter()
            .find(|s| s.name == name)
    }

    pub fn text(&self, slide: SlideRef, name: &str) -> Option<String> {
        self.find(slide, name).and_then(|s| s.text.clone())
    }

    pub fn link(&self, slide: SlideRef, name: &str) -> Option<SlideRef> {
        self.find(slide, name).and_then(|s| s.link)
    }

    pub fn slide_layout(&self, slide: SlideRef) -> Option<LayoutRef> {
        self.slides.get(slide.0).and_then(|s| s.layout)
    }

    fn shape_mut(&mut self, slide: SlideRef, shape: usize) -> Result<&mut FakeShape> {
        self.slides
            .get_mut(slide.0)
            .and_then(|s| s.shapes.get_mut(shape))
            .ok_or_else(|| Error::InvalidReference(format!("shape {} on slide {}", shape, slide.0)))
    }
}

fn infos(shapes: &[FakeShape]) -> Vec<ShapeInfo> {
    shapes
        .iter()
        .enumerate()
        .map(|(index, s)| ShapeInfo::new(index, s.name.clone(), s.offset))
        .collect()
}

impl Deck for FakeDeck {
    fn slide_count(&self) -> usize {
        self.slides.len()
    }

    fn slide_shapes(&self, slide: SlideRef) -> Result<Vec<ShapeInfo>> {
        self.slides
            .get(slide.0)
            .map(|s| infos(&s.shapes))
            .ok_or_else(|| Error::InvalidReference(format!("slide {}", slide.0)))
    }

    fn rename_shape(&mut self, slide: SlideRef, shape: usize, name: &str) -> Result<()> {
        self.shape_mut(slide, shape)?.name = name.to_string();
        Ok(())
    }

    fn set_shape_text(&mut self, slide: SlideRef, shape: usize, text: &str) -> Result<()> {
        self.shape_mut(slide, shape)?.text = Some(text.to_string());
        Ok(())
    }

    fn link_shape(&mut self, slide: SlideRef, shape: usize, target: SlideRef) -> Result<()> {
        self.shape_mut(slide, shape)?.link = Some(target);
        Ok(())
    }

    fn layouts(&self) -> Vec<LayoutInfo> {
        self.layouts
            .iter()
            .enumerate()
            .map(|(i, l)| LayoutInfo {
                layout: LayoutRef(i),
                name: l.name.clone(),
            })
            .collect()
    }

    fn layout_shapes(&self, layout: LayoutRef) -> Result<Vec<ShapeInfo>> {
        self.layouts
            .get(layout.0)
            .map(|l| infos(&l.shapes))
            .ok_or_else(|| Error::InvalidReference(format!("layout {}", layout.0)))
    }

    fn add_slide(&mut self, layout: LayoutRef) -> Result<SlideRef> {
        let source = self
            .layouts
            .get(layout.0)
            .ok_or_else(|| Error::InvalidReference(format!("layout {}", layout.0)))?;

        let shapes = source
            .shapes
            .iter()
            .rev()
            .enumerate()
            .map(|(i, s)| FakeShape {
                name: format!("Placeholder {}", i + 1),
                offset: s.offset,
                text: None,
                link: None,
            })
            .collect();

        self.slides.push(FakeSlide {
            layout: Some(layout),
            shapes,
        });
        Ok(SlideRef(self.slides.len() - 1))
    }
}
