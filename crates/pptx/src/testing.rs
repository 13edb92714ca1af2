//! A small presentation built in memory for tests.
//!
//! One slide (`Title 1`, `Rectangle 2`, `Rectangle 3`) and one master with
//! two layouts, [`LAYOUT_STANDARD`] and [`LAYOUT_WIDE`]. The master's title
//! placeholder sits at top 400, left 300; its body placeholder at top 1200,
//! left 300.

use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::ZipWriter;

pub const LAYOUT_STANDARD: &str = "Standard";
pub const LAYOUT_WIDE: &str = "Wide";

const NS: &str = r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#;
const RELS_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const REL_BASE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

fn sp(id: u32, name: &str, ph: Option<&str>, x: i64, y: i64) -> String {
    let nv_pr = match ph {
        Some(ph) => format!("<p:nvPr>{}</p:nvPr>", ph),
        None => "<p:nvPr/>".to_string(),
    };
    format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="{name}"/><p:cNvSpPr/>{nv_pr}</p:nvSpPr><p:spPr><a:xfrm><a:off x="{x}" y="{y}"/><a:ext cx="1000" cy="400"/></a:xfrm></p:spPr><p:txBody><a:bodyPr/><a:lstStyle/><a:p><a:r><a:rPr lang="de-DE" sz="2400"/><a:t>{name}</a:t></a:r></a:p></p:txBody></p:sp>"#
    )
}

fn sp_tree(shapes: &[String]) -> String {
    format!(
        r#"<p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/>{}</p:spTree>"#,
        shapes.concat()
    )
}

fn rels(items: &[(&str, &str, &str)]) -> String {
    let items: String = items
        .iter()
        .map(|(id, kind, target)| {
            format!(
                r#"<Relationship Id="{id}" Type="{REL_BASE}/{kind}" Target="{target}"/>"#
            )
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="{RELS_NS}">{items}</Relationships>"#
    )
}

fn layout(name: &str, shapes: &[String]) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:sldLayout {NS}><p:cSld name="{name}">{}</p:cSld></p:sldLayout>"#,
        sp_tree(shapes)
    )
}

/// Bytes of a minimal but well-formed .pptx.
pub fn minimal_pptx() -> Vec<u8> {
    let title = r#"<p:ph type="title"/>"#;
    let body = r#"<p:ph idx="1"/>"#;
    let date = r#"<p:ph type="dt" sz="half" idx="10"/>"#;

    let parts: Vec<(&str, String)> = vec![
        (
            "[Content_Types].xml",
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/><Override PartName="/ppt/slides/slide1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/><Override PartName="/ppt/slideMasters/slideMaster1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml"/><Override PartName="/ppt/slideLayouts/slideLayout1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml"/><Override PartName="/ppt/slideLayouts/slideLayout2.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml"/></Types>"#.to_string(),
        ),
        (
            "_rels/.rels",
            rels(&[("rId1", "officeDocument", "ppt/presentation.xml")]),
        ),
        (
            "ppt/presentation.xml",
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:presentation {NS}><p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst><p:sldIdLst><p:sldId id="256" r:id="rId2"/></p:sldIdLst><p:sldSz cx="9144000" cy="6858000"/><p:notesSz cx="6858000" cy="9144000"/></p:presentation>"#
            ),
        ),
        (
            "ppt/_rels/presentation.xml.rels",
            rels(&[
                ("rId1", "slideMaster", "slideMasters/slideMaster1.xml"),
                ("rId2", "slide", "slides/slide1.xml"),
            ]),
        ),
        (
            "ppt/slides/slide1.xml",
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:sld {NS}><p:cSld>{}</p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>"#,
                sp_tree(&[
                    sp(2, "Title 1", Some(title), 0, 0),
                    sp(3, "Rectangle 2", None, 1000, 1000),
                    sp(4, "Rectangle 3", None, 2000, 1000),
                ])
            ),
        ),
        (
            "ppt/slides/_rels/slide1.xml.rels",
            rels(&[("rId1", "slideLayout", "../slideLayouts/slideLayout1.xml")]),
        ),
        (
            "ppt/slideMasters/slideMaster1.xml",
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:sldMaster {NS}><p:cSld>{}</p:cSld><p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/><p:sldLayoutId id="2147483650" r:id="rId2"/></p:sldLayoutIdLst></p:sldMaster>"#,
                sp_tree(&[
                    sp(2, "Title Placeholder", Some(title), 300, 400),
                    sp(3, "Text Placeholder", Some(r#"<p:ph type="body" idx="1"/>"#), 300, 1200),
                ])
            ),
        ),
        (
            "ppt/slideMasters/_rels/slideMaster1.xml.rels",
            rels(&[
                ("rId1", "slideLayout", "../slideLayouts/slideLayout1.xml"),
                ("rId2", "slideLayout", "../slideLayouts/slideLayout2.xml"),
            ]),
        ),
        (
            "ppt/slideLayouts/slideLayout1.xml",
            layout(
                LAYOUT_STANDARD,
                &[
                    sp(2, "Raumnr", Some(title), 100, 200),
                    sp(3, "Nutzung", Some(body), 100, 900),
                    sp(4, "Date Placeholder", Some(date), 100, 1500),
                ],
            ),
        ),
        (
            "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
            rels(&[("rId1", "slideMaster", "../slideMasters/slideMaster1.xml")]),
        ),
        (
            "ppt/slideLayouts/slideLayout2.xml",
            layout(
                LAYOUT_WIDE,
                &[
                    sp(2, "Raumnr", Some(title), 50, 50),
                    sp(3, "Nutzung", Some(body), 50, 700),
                    sp(4, "Logo", None, 10, 10),
                ],
            ),
        ),
        (
            "ppt/slideLayouts/_rels/slideLayout2.xml.rels",
            rels(&[("rId1", "slideMaster", "../slideMasters/slideMaster1.xml")]),
        ),
    ];

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, data) in parts {
        zip.start_file(name, FileOptions::default()).unwrap();
        zip.write_all(data.as_bytes()).unwrap();
    }
    zip.finish().unwrap().into_inner()
}
