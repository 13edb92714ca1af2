//! [`Deck`] implementation over a .pptx package.

use crate::package::{
    relative_target, rels_path, resolve_target, Package, Relationships, REL_OFFICE_DOCUMENT,
    REL_SLIDE, REL_SLIDE_LAYOUT, REL_SLIDE_MASTER,
};
use crate::shapes;
use crate::xml::{XmlDocument, XmlElement, XmlNode};
use doorplate_core::{Deck, Error, LayoutInfo, LayoutRef, Offset, Result, ShapeInfo, SlideRef};
use regex::Regex;
use std::io::{Read, Seek};
use std::path::Path;
use std::sync::LazyLock;

const NS_MAIN: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
const NS_DRAWING: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const NS_RELATIONSHIPS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

const SLIDE_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.slide+xml";
const DEFAULT_PRESENTATION_PART: &str = "ppt/presentation.xml";

/// Smallest id PowerPoint accepts in `p:sldId`.
const MIN_SLIDE_ID: u32 = 256;

/// Children of `p:presentation` that come after `p:sldIdLst`.
const AFTER_SLIDE_ID_LIST: &[&str] = &[
    "sldSz",
    "notesSz",
    "smartTags",
    "embeddedFontLst",
    "custShowLst",
    "photoAlbum",
    "custDataLst",
    "kinsoku",
    "defaultTextStyle",
    "modifyVerifier",
    "extLst",
];

/// Regex for slide part names.
static SLIDE_PART_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ppt/slides/slide(\d+)\.xml$").unwrap());

#[derive(Debug, Clone)]
struct SlidePart {
    path: String,
    xml: XmlDocument,
    rels: Relationships,
    dirty: bool,
    new: bool,
}

#[derive(Debug, Clone)]
struct LayoutPart {
    path: String,
    name: String,
    xml: XmlDocument,
    /// Index into `PptxDeck::masters`.
    master: usize,
}

/// An open presentation. Edits stay in memory until [`PptxDeck::save`].
#[derive(Debug, Clone)]
pub struct PptxDeck {
    package: Package,
    presentation_path: String,
    presentation: XmlDocument,
    presentation_rels: Relationships,
    slides: Vec<SlidePart>,
    masters: Vec<XmlDocument>,
    layouts: Vec<LayoutPart>,
}

impl PptxDeck {
    pub fn open(path: &Path) -> Result<Self> {
        log::debug!("Opening presentation {}", path.display());
        Self::from_package(Package::open(path)?)
    }

    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        Self::from_package(Package::from_reader(reader)?)
    }

    pub fn from_package(package: Package) -> Result<Self> {
        let presentation_path = package
            .relationships("")?
            .by_type(REL_OFFICE_DOCUMENT)
            .next()
            .map(|rel| resolve_target("", &rel.target))
            .unwrap_or_else(|| DEFAULT_PRESENTATION_PART.to_string());

        let presentation = package.xml_part(&presentation_path)?;
        let presentation_rels = package.relationships(&presentation_path)?;

        let mut slides = Vec::new();
        for rel_id in id_list(&presentation.root, "sldIdLst") {
            let path = part_target(&presentation_rels, &presentation_path, rel_id)?;
            slides.push(SlidePart {
                xml: package.xml_part(&path)?,
                rels: package.relationships(&path)?,
                path,
                dirty: false,
                new: false,
            });
        }

        let mut masters = Vec::new();
        let mut layouts = Vec::new();
        let mut master_paths: Vec<String> = id_list(&presentation.root, "sldMasterIdLst")
            .map(|rel_id| part_target(&presentation_rels, &presentation_path, rel_id))
            .collect::<Result<_>>()?;
        if master_paths.is_empty() {
            master_paths = presentation_rels
                .by_type(REL_SLIDE_MASTER)
                .map(|rel| resolve_target(&presentation_path, &rel.target))
                .collect();
        }

        for master_path in &master_paths {
            let master = package.xml_part(master_path)?;
            let master_rels = package.relationships(master_path)?;

            let mut layout_paths: Vec<String> = id_list(&master.root, "sldLayoutIdLst")
                .map(|rel_id| part_target(&master_rels, master_path, rel_id))
                .collect::<Result<_>>()?;
            if layout_paths.is_empty() {
                layout_paths = master_rels
                    .by_type(REL_SLIDE_LAYOUT)
                    .map(|rel| resolve_target(master_path, &rel.target))
                    .collect();
            }

            for path in layout_paths {
                let xml = package.xml_part(&path)?;
                let name = xml
                    .root
                    .child("cSld")
                    .and_then(|c| c.attr("name"))
                    .unwrap_or("")
                    .to_string();
                layouts.push(LayoutPart {
                    path,
                    name,
                    xml,
                    master: masters.len(),
                });
            }
            masters.push(master);
        }

        log::debug!(
            "Presentation has {} slides and {} layouts in {} masters",
            slides.len(),
            layouts.len(),
            masters.len()
        );

        Ok(Self {
            package,
            presentation_path,
            presentation,
            presentation_rels,
            slides,
            masters,
            layouts,
        })
    }

    /// Write the presentation to `path`, replacing any existing file.
    pub fn save(&mut self, path: &Path) -> Result<()> {
        let bytes = self.to_bytes()?;
        std::fs::write(path, bytes)?;
        log::debug!("Saved presentation to {}", path.display());
        Ok(())
    }

    /// Serialize the presentation with all edits applied.
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        for slide in self.slides.iter_mut().filter(|s| s.dirty) {
            self.package.set_part(slide.path.clone(), slide.xml.to_bytes()?);
            self.package
                .set_part(rels_path(&slide.path), slide.rels.to_document().to_bytes()?);
            if slide.new {
                self.package.add_override(&slide.path, SLIDE_CONTENT_TYPE)?;
                slide.new = false;
            }
            slide.dirty = false;
        }

        self.package
            .set_part(self.presentation_path.clone(), self.presentation.to_bytes()?);
        self.package.set_part(
            rels_path(&self.presentation_path),
            self.presentation_rels.to_document().to_bytes()?,
        );

        self.package.to_bytes()
    }

    /// Part name of a slide, e.g. `ppt/slides/slide3.xml`.
    pub fn slide_path(&self, slide: SlideRef) -> Result<&str> {
        Ok(self.slide(slide)?.path.as_str())
    }

    /// Text of a shape, paragraphs joined by newlines.
    pub fn shape_text(&self, slide: SlideRef, shape: usize) -> Result<String> {
        let tree = shapes::sp_tree(&self.slide(slide)?.xml.root)?;
        let shape = shapes::shapes(tree)
            .nth(shape)
            .ok_or_else(|| Error::InvalidReference(format!("shape {}", shape)))?;
        Ok(shapes::text(shape))
    }

    /// Slide a shape jumps to when clicked.
    pub fn shape_link(&self, slide: SlideRef, shape: usize) -> Result<Option<SlideRef>> {
        let part = self.slide(slide)?;
        let tree = shapes::sp_tree(&part.xml.root)?;
        let shape = shapes::shapes(tree)
            .nth(shape)
            .ok_or_else(|| Error::InvalidReference(format!("shape {}", shape)))?;

        let Some(rel) = shapes::slide_link(shape).and_then(|id| part.rels.get(id)) else {
            return Ok(None);
        };
        let target = resolve_target(&part.path, &rel.target);
        Ok(self
            .slides
            .iter()
            .position(|s| s.path == target)
            .map(SlideRef))
    }

    /// Layout a slide was created from.
    pub fn slide_layout(&self, slide: SlideRef) -> Result<Option<LayoutRef>> {
        Ok(self.layout_of(self.slide(slide)?).map(LayoutRef))
    }

    fn layout_of(&self, part: &SlidePart) -> Option<usize> {
        let rel = part.rels.by_type(REL_SLIDE_LAYOUT).next()?;
        let target = resolve_target(&part.path, &rel.target);
        self.layouts.iter().position(|l| l.path == target)
    }

    /// Position of a layout shape, inherited from the master placeholder if
    /// the shape has none of its own.
    fn layout_offset(&self, layout: &LayoutPart, shape: &XmlElement) -> Option<Offset> {
        shapes::offset(shape).or_else(|| {
            let master = shapes::sp_tree(&self.masters.get(layout.master)?.root).ok()?;
            shapes::offset(shapes::master_placeholder(shape, master)?)
        })
    }

    /// Shapes of a slide with effective positions: placeholders without
    /// their own position take it from the layout (and through it the master).
    fn slide_shape_infos(&self, part: &SlidePart) -> Result<Vec<ShapeInfo>> {
        let tree = shapes::sp_tree(&part.xml.root)?;
        let layout = self.layout_of(part).map(|idx| &self.layouts[idx]);

        let mut infos = shapes::shape_infos(tree);
        for (info, shape) in infos.iter_mut().zip(shapes::shapes(tree)) {
            if info.offset.is_some() {
                continue;
            }
            info.offset = layout.and_then(|layout| {
                let layout_tree = shapes::sp_tree(&layout.xml.root).ok()?;
                let base = shapes::layout_placeholder(shape, layout_tree)?;
                self.layout_offset(layout, base)
            });
        }
        Ok(infos)
    }

    fn slide(&self, slide: SlideRef) -> Result<&SlidePart> {
        self.slides.get(slide.0).ok_or(Error::SlideIndexOutOfRange {
            index: slide.0,
            count: self.slides.len(),
        })
    }

    fn slide_mut(&mut self, slide: SlideRef) -> Result<&mut SlidePart> {
        let count = self.slides.len();
        self.slides.get_mut(slide.0).ok_or(Error::SlideIndexOutOfRange {
            index: slide.0,
            count,
        })
    }

    fn layout(&self, layout: LayoutRef) -> Result<&LayoutPart> {
        self.layouts
            .get(layout.0)
            .ok_or_else(|| Error::InvalidReference(format!("layout {}", layout.0)))
    }

    /// Edit one shape of a slide and mark the slide for writing.
    fn edit_shape(
        &mut self,
        slide: SlideRef,
        shape: usize,
        edit: impl FnOnce(&mut XmlElement) -> Result<()>,
    ) -> Result<()> {
        let part = self.slide_mut(slide)?;
        let tree = shapes::sp_tree_mut(&mut part.xml.root)?;
        edit(shapes::shape_mut(tree, shape)?)?;
        part.dirty = true;
        Ok(())
    }

    fn next_slide_path(&self) -> String {
        let number = self
            .package
            .part_names()
            .chain(self.slides.iter().map(|s| s.path.as_str()))
            .filter_map(|name| SLIDE_PART_REGEX.captures(name))
            .filter_map(|c| c[1].parse::<u32>().ok())
            .max()
            .unwrap_or(0)
            + 1;
        format!("ppt/slides/slide{}.xml", number)
    }

    /// Register a slide part in `p:sldIdLst`.
    fn append_slide_id(&mut self, rel_id: &str) {
        let root = &mut self.presentation.root;
        let prefix = root.prefix().map(|p| format!("{}:", p)).unwrap_or_default();

        if root.child("sldIdLst").is_none() {
            let at = AFTER_SLIDE_ID_LIST
                .iter()
                .filter_map(|local| root.position(local))
                .min()
                .unwrap_or(root.children.len());
            root.children.insert(
                at,
                XmlNode::Element(XmlElement::new(format!("{}sldIdLst", prefix))),
            );
        }
        ensure_namespace(root, "r", NS_RELATIONSHIPS);

        if let Some(list) = root.child_mut("sldIdLst") {
            let id = list
                .elements()
                .filter_map(|e| e.attr("id")?.parse::<u32>().ok())
                .max()
                .map_or(MIN_SLIDE_ID, |max| (max + 1).max(MIN_SLIDE_ID));
            list.children.push(XmlNode::Element(
                XmlElement::new(format!("{}sldId", prefix))
                    .with_attr("id", id.to_string())
                    .with_attr("r:id", rel_id),
            ));
        }
    }
}

impl Deck for PptxDeck {
    fn slide_count(&self) -> usize {
        self.slides.len()
    }

    fn slide_shapes(&self, slide: SlideRef) -> Result<Vec<ShapeInfo>> {
        self.slide_shape_infos(self.slide(slide)?)
    }

    fn rename_shape(&mut self, slide: SlideRef, shape: usize, name: &str) -> Result<()> {
        self.edit_shape(slide, shape, |el| shapes::set_name(el, name))
    }

    fn set_shape_text(&mut self, slide: SlideRef, shape: usize, text: &str) -> Result<()> {
        self.edit_shape(slide, shape, |el| shapes::set_text(el, text))
    }

    fn link_shape(&mut self, slide: SlideRef, shape: usize, target: SlideRef) -> Result<()> {
        let target_path = self.slide(target)?.path.clone();
        let part = self.slide_mut(slide)?;
        let relative = relative_target(&part.path, &target_path);

        let existing = part
            .rels
            .by_type(REL_SLIDE)
            .find(|rel| rel.target == relative)
            .map(|rel| rel.id.clone());
        let rel_id = match existing {
            Some(id) => id,
            None => part.rels.add(REL_SLIDE, &relative),
        };

        ensure_namespace(&mut part.xml.root, "r", NS_RELATIONSHIPS);
        self.edit_shape(slide, shape, |el| shapes::set_slide_link(el, &rel_id))
    }

    fn layouts(&self) -> Vec<LayoutInfo> {
        self.layouts
            .iter()
            .enumerate()
            .map(|(idx, layout)| LayoutInfo {
                layout: LayoutRef(idx),
                name: layout.name.clone(),
            })
            .collect()
    }

    fn layout_shapes(&self, layout: LayoutRef) -> Result<Vec<ShapeInfo>> {
        let layout = self.layout(layout)?;
        let tree = shapes::sp_tree(&layout.xml.root)?;
        Ok(shapes::shapes(tree)
            .enumerate()
            .map(|(index, shape)| {
                let name = shapes::name(shape).unwrap_or("");
                ShapeInfo::new(index, name, self.layout_offset(layout, shape))
            })
            .collect())
    }

    fn add_slide(&mut self, layout: LayoutRef) -> Result<SlideRef> {
        let path = self.next_slide_path();
        let layout_part = self.layout(layout)?;

        let mut tree = XmlElement::new("p:spTree")
            .with_child(
                XmlElement::new("p:nvGrpSpPr")
                    .with_child(
                        XmlElement::new("p:cNvPr")
                            .with_attr("id", "1")
                            .with_attr("name", ""),
                    )
                    .with_child(XmlElement::new("p:cNvGrpSpPr"))
                    .with_child(XmlElement::new("p:nvPr")),
            )
            .with_child(XmlElement::new("p:grpSpPr"));

        let mut next_id = 2;
        for layout_shape in shapes::shapes(shapes::sp_tree(&layout_part.xml.root)?) {
            if let Some(placeholder) = shapes::clone_placeholder(layout_shape, next_id) {
                tree = tree.with_child(placeholder);
                next_id += 1;
            }
        }

        let root = XmlElement::new("p:sld")
            .with_attr("xmlns:a", NS_DRAWING)
            .with_attr("xmlns:r", NS_RELATIONSHIPS)
            .with_attr("xmlns:p", NS_MAIN)
            .with_child(XmlElement::new("p:cSld").with_child(tree))
            .with_child(
                XmlElement::new("p:clrMapOvr").with_child(XmlElement::new("a:masterClrMapping")),
            );

        let mut rels = Relationships::default();
        rels.add(REL_SLIDE_LAYOUT, &relative_target(&path, &layout_part.path));
        log::debug!(
            "Adding {} from layout '{}' with {} placeholders",
            path,
            layout_part.name,
            next_id - 2
        );

        let rel_id = self
            .presentation_rels
            .add(REL_SLIDE, &relative_target(&self.presentation_path, &path));
        self.append_slide_id(&rel_id);

        self.slides.push(SlidePart {
            path,
            xml: XmlDocument::new(root),
            rels,
            dirty: true,
            new: true,
        });
        Ok(SlideRef(self.slides.len() - 1))
    }
}

/// Relationship ids (`r:id`) listed under `root/<list>`.
fn id_list<'a>(root: &'a XmlElement, list: &str) -> impl Iterator<Item = &'a str> {
    root.child(list)
        .into_iter()
        .flat_map(|l| l.elements())
        .filter_map(|e| e.prefixed_attr("id"))
}

fn part_target(rels: &Relationships, base_part: &str, rel_id: &str) -> Result<String> {
    let rel = rels.get(rel_id).ok_or_else(|| {
        Error::PptxParseError(format!(
            "'{}' refers to missing relationship '{}'",
            base_part, rel_id
        ))
    })?;
    Ok(resolve_target(base_part, &rel.target))
}

fn ensure_namespace(root: &mut XmlElement, prefix: &str, uri: &str) {
    let key = format!("xmlns:{}", prefix);
    if root.attr(&key).is_none() {
        root.set_attr(key, uri);
    }
}
