//! Shape-level edits on PresentationML shape trees.

use crate::xml::{XmlElement, XmlNode};
use doorplate_core::{Error, Offset, Result, ShapeInfo};

/// Local names of elements that are shapes inside `p:spTree`.
const SHAPE_ELEMENTS: &[&str] = &["sp", "grpSp", "pic", "graphicFrame", "cxnSp", "contentPart"];

/// Placeholder types a new slide does not inherit.
const NON_CLONEABLE_PLACEHOLDERS: &[&str] = &["dt", "ftr", "sldNum"];

pub const SLIDE_JUMP_ACTION: &str = "ppaction://hlinksldjump";

pub fn is_shape(el: &XmlElement) -> bool {
    SHAPE_ELEMENTS.contains(&el.local_name())
}

/// The `p:spTree` of a slide, layout or master root.
pub fn sp_tree(root: &XmlElement) -> Result<&XmlElement> {
    root.path(&["cSld", "spTree"])
        .ok_or_else(|| Error::PptxParseError(format!("'{}' has no shape tree", root.name)))
}

pub fn sp_tree_mut(root: &mut XmlElement) -> Result<&mut XmlElement> {
    let name = root.name.clone();
    root.path_mut(&["cSld", "spTree"])
        .ok_or_else(|| Error::PptxParseError(format!("'{}' has no shape tree", name)))
}

/// Top-level shapes, in document order.
pub fn shapes(tree: &XmlElement) -> impl Iterator<Item = &XmlElement> {
    tree.elements().filter(|e| is_shape(e))
}

/// The `index`-th top-level shape.
pub fn shape_mut(tree: &mut XmlElement, index: usize) -> Result<&mut XmlElement> {
    tree.elements_mut()
        .filter(|e| is_shape(e))
        .nth(index)
        .ok_or_else(|| Error::InvalidReference(format!("shape {}", index)))
}

pub fn shape_infos(tree: &XmlElement) -> Vec<ShapeInfo> {
    shapes(tree)
        .enumerate()
        .map(|(index, shape)| ShapeInfo::new(index, name(shape).unwrap_or(""), offset(shape)))
        .collect()
}

/// The non-visual properties (`p:nvSpPr`, `p:nvPicPr`, ...) of a shape.
fn non_visual(shape: &XmlElement) -> Option<&XmlElement> {
    shape.elements().find(|e| e.local_name().starts_with("nv"))
}

fn c_nv_pr_mut(shape: &mut XmlElement) -> Result<&mut XmlElement> {
    let name = shape.name.clone();
    shape
        .elements_mut()
        .find(|e| e.local_name().starts_with("nv"))
        .and_then(|nv| nv.child_mut("cNvPr"))
        .ok_or_else(|| Error::PptxParseError(format!("'{}' has no cNvPr", name)))
}

pub fn name(shape: &XmlElement) -> Option<&str> {
    non_visual(shape)?.child("cNvPr")?.attr("name")
}

pub fn id(shape: &XmlElement) -> Option<u32> {
    non_visual(shape)?.child("cNvPr")?.attr("id")?.parse().ok()
}

pub fn set_name(shape: &mut XmlElement, name: &str) -> Result<()> {
    c_nv_pr_mut(shape)?.set_attr("name", name);
    Ok(())
}

/// Position from `a:xfrm/a:off`: `y` is top, `x` is left.
pub fn offset(shape: &XmlElement) -> Option<Offset> {
    let xfrm = shape
        .elements()
        .find(|e| matches!(e.local_name(), "spPr" | "grpSpPr"))
        .and_then(|pr| pr.child("xfrm"))
        .or_else(|| shape.child("xfrm"))?;
    let off = xfrm.child("off")?;
    Some(Offset::new(
        off.attr("y")?.parse().ok()?,
        off.attr("x")?.parse().ok()?,
    ))
}

/// Placeholder type and index of a shape. Absent attributes take the schema
/// defaults, `obj` and 0.
pub fn placeholder(shape: &XmlElement) -> Option<(&str, u32)> {
    let ph = non_visual(shape)?.path(&["nvPr", "ph"])?;
    let idx = ph.attr("idx").and_then(|i| i.parse().ok()).unwrap_or(0);
    Some((ph.attr("type").unwrap_or("obj"), idx))
}

/// Master placeholder type a layout placeholder of `ph_type` inherits from.
fn master_type(ph_type: &str) -> &str {
    match ph_type {
        "title" | "ctrTitle" => "title",
        "dt" | "ftr" | "sldNum" => ph_type,
        _ => "body",
    }
}

/// Placeholder in a layout tree a slide placeholder inherits from (same idx).
pub fn layout_placeholder<'a>(
    slide_shape: &XmlElement,
    layout_tree: &'a XmlElement,
) -> Option<&'a XmlElement> {
    let (_, idx) = placeholder(slide_shape)?;
    shapes(layout_tree).find(|s| placeholder(s).is_some_and(|(_, i)| i == idx))
}

/// Placeholder in a master tree a layout placeholder inherits from (same
/// base type).
pub fn master_placeholder<'a>(
    layout_shape: &XmlElement,
    master_tree: &'a XmlElement,
) -> Option<&'a XmlElement> {
    let (ph_type, _) = placeholder(layout_shape)?;
    let wanted = master_type(ph_type);
    shapes(master_tree).find(|s| placeholder(s).is_some_and(|(t, _)| t == wanted))
}

/// Make a click on the shape jump to the slide behind `rel_id`.
pub fn set_slide_link(shape: &mut XmlElement, rel_id: &str) -> Result<()> {
    let pr = c_nv_pr_mut(shape)?;
    pr.remove_children("hlinkClick");
    let link = XmlElement::new("a:hlinkClick")
        .with_attr("r:id", rel_id)
        .with_attr("action", SLIDE_JUMP_ACTION);
    // hlinkClick is the first child of cNvPr
    pr.children.insert(0, XmlNode::Element(link));
    Ok(())
}

/// Relationship id of the shape's click link, if any.
pub fn slide_link(shape: &XmlElement) -> Option<&str> {
    non_visual(shape)?
        .child("cNvPr")?
        .child("hlinkClick")?
        .prefixed_attr("id")
}

/// Replace the shape's text, one paragraph per line.
///
/// Paragraph and run properties of the first existing paragraph are reused so
/// text keeps the formatting set up in the layout.
pub fn set_text(shape: &mut XmlElement, text: &str) -> Result<()> {
    if shape.local_name() != "sp" {
        return Err(Error::InvalidReference(format!(
            "'{}' cannot hold text",
            shape.name
        )));
    }

    if shape.child("txBody").is_none() {
        let body = XmlElement::new("p:txBody")
            .with_child(XmlElement::new("a:bodyPr"))
            .with_child(XmlElement::new("a:lstStyle"));
        let at = shape.position("extLst").unwrap_or(shape.children.len());
        shape.children.insert(at, XmlNode::Element(body));
    }
    let body = shape
        .child_mut("txBody")
        .ok_or_else(|| Error::PptxParseError("txBody vanished".to_string()))?;

    let first = body.child("p");
    let p_pr = first.and_then(|p| p.child("pPr")).cloned();
    let r_pr = first
        .and_then(|p| p.child("r"))
        .and_then(|r| r.child("rPr"))
        .or_else(|| first.and_then(|p| p.child("endParaRPr")))
        .cloned()
        .map(|mut pr| {
            pr.name = "a:rPr".to_string();
            pr
        });

    body.remove_children("p");
    let at = body.position("extLst").unwrap_or(body.children.len());

    let paragraphs = text.split('\n').map(|line| {
        let mut p = XmlElement::new("a:p");
        if let Some(pr) = &p_pr {
            p = p.with_child(pr.clone());
        }
        if !line.is_empty() {
            let mut r = XmlElement::new("a:r");
            if let Some(pr) = &r_pr {
                r = r.with_child(pr.clone());
            }
            let mut t = XmlElement::new("a:t");
            t.children.push(XmlNode::Text(line.trim_end_matches('\r').to_string()));
            p = p.with_child(r.with_child(t));
        }
        XmlNode::Element(p)
    });
    body.children.splice(at..at, paragraphs);

    Ok(())
}

/// Concatenated `a:t` text of a shape, paragraphs joined by newlines.
pub fn text(shape: &XmlElement) -> String {
    shape
        .child("txBody")
        .map(|body| {
            body.elements()
                .filter(|e| e.local_name() == "p")
                .map(|p| p.text())
                .collect::<Vec<_>>()
                .join("\n")
        })
        .unwrap_or_default()
}

/// A placeholder for a new slide cloned from a layout placeholder.
///
/// The clone carries the layout's explicit geometry but a generic name.
/// Returns None for non-placeholders and for date, footer and slide number
/// placeholders.
pub fn clone_placeholder(layout_shape: &XmlElement, id: u32) -> Option<XmlElement> {
    if layout_shape.local_name() != "sp" {
        return None;
    }
    let ph = layout_shape.path(&["nvSpPr", "nvPr", "ph"])?;
    if ph
        .attr("type")
        .is_some_and(|t| NON_CLONEABLE_PLACEHOLDERS.contains(&t))
    {
        return None;
    }

    let mut new_ph = XmlElement::new("p:ph");
    new_ph.attributes = ph.attributes.clone();

    let mut sp_pr = XmlElement::new("p:spPr");
    if let Some(xfrm) = layout_shape.path(&["spPr", "xfrm"]) {
        sp_pr = sp_pr.with_child(xfrm.clone());
    }

    Some(
        XmlElement::new("p:sp")
            .with_child(
                XmlElement::new("p:nvSpPr")
                    .with_child(
                        XmlElement::new("p:cNvPr")
                            .with_attr("id", id.to_string())
                            .with_attr("name", format!("Placeholder {}", id - 1)),
                    )
                    .with_child(
                        XmlElement::new("p:cNvSpPr")
                            .with_child(XmlElement::new("a:spLocks").with_attr("noGrp", "1")),
                    )
                    .with_child(XmlElement::new("p:nvPr").with_child(new_ph)),
            )
            .with_child(sp_pr),
    )
}
