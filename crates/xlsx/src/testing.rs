//! A small workbook built in memory for tests.
//!
//! Two worksheets:
//! - [`SHEET_ROOMS`] is used from A1: a title row, the header in row 3, the
//!   description row 4, and data in rows 5 to 8.
//! - [`SHEET_ANNEX`] has its used range start at C3: header in row 3, data in
//!   rows 5 to 7.
//!
//! Cells that parse as numbers are written as numeric cells, everything else
//! as inline strings. Empty values leave the cell out.

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use zip::write::FileOptions;
use zip::ZipWriter;

pub const SHEET_ROOMS: &str = "Rooms";
pub const SHEET_ANNEX: &str = "Annex";

const REL_BASE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

const ROOMS: &[(u32, &[&str])] = &[
    (1, &["Room master list"]),
    (3, &["Raumnr", "Bereich", "Layout", "Schild", "Nutzung", "Fläche"]),
    (4, &["Room number", "Section", "Layout", "Plate?", "Usage", "Area"]),
    (5, &["1/1", "A", "Standard", "ja", "Office", "23"]),
    (6, &["1/2", "B", "Standard", "ja", "Lab", "12.5"]),
    (7, &["1/1", "A", "Wide", "ja", "Office annex", "12.5"]),
    (8, &["2/1", "A", "", "nein", "Store"]),
];

const ANNEX: &[(u32, &[&str])] = &[
    (3, &["Raumnr", "Bereich", "Layout", "Schild", "Nutzung"]),
    (4, &["Room number", "Section", "Layout", "Plate?", "Usage"]),
    (5, &["9/1", "B", "Standard", "ja", "Workshop"]),
    (6, &["9/2", "A", "Standard", "ja", "Depot"]),
    (7, &["9/3", "B", "Wide", "nein", "Garage"]),
];

fn cell(reference: &str, value: &str) -> String {
    if value.parse::<f64>().is_ok() {
        format!(r#"<c r="{reference}"><v>{value}</v></c>"#)
    } else {
        format!(r#"<c r="{reference}" t="inlineStr"><is><t>{value}</t></is></c>"#)
    }
}

fn worksheet(rows: &[(u32, &[&str])], first_column: u8) -> String {
    let rows: String = rows
        .iter()
        .map(|(row, values)| {
            let cells: String = values
                .iter()
                .enumerate()
                .filter(|(_, value)| !value.is_empty())
                .map(|(col, value)| {
                    let column = (first_column + col as u8) as char;
                    cell(&format!("{column}{row}"), value)
                })
                .collect();
            format!(r#"<row r="{row}">{cells}</row>"#)
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>{rows}</sheetData></worksheet>"#
    )
}

/// Bytes of a minimal but well-formed .xlsx.
pub fn minimal_xlsx() -> Vec<u8> {
    let parts: Vec<(&str, String)> = vec![
        (
            "[Content_Types].xml",
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/><Override PartName="/xl/worksheets/sheet2.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/></Types>"#.to_string(),
        ),
        (
            "_rels/.rels",
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="{REL_BASE}/officeDocument" Target="xl/workbook.xml"/></Relationships>"#
            ),
        ),
        (
            "xl/workbook.xml",
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="{REL_BASE}"><sheets><sheet name="{SHEET_ROOMS}" sheetId="1" r:id="rId1"/><sheet name="{SHEET_ANNEX}" sheetId="2" r:id="rId2"/></sheets></workbook>"#
            ),
        ),
        (
            "xl/_rels/workbook.xml.rels",
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="{REL_BASE}/worksheet" Target="worksheets/sheet1.xml"/><Relationship Id="rId2" Type="{REL_BASE}/worksheet" Target="worksheets/sheet2.xml"/></Relationships>"#
            ),
        ),
        ("xl/worksheets/sheet1.xml", worksheet(ROOMS, b'A')),
        ("xl/worksheets/sheet2.xml", worksheet(ANNEX, b'C')),
    ];

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, data) in parts {
        zip.start_file(name, FileOptions::default()).unwrap();
        zip.write_all(data.as_bytes()).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

/// Write [`minimal_xlsx`] into `dir` and return its path.
pub fn write_workbook(dir: &Path) -> PathBuf {
    let path = dir.join("rooms.xlsx");
    std::fs::write(&path, minimal_xlsx()).unwrap();
    path
}
