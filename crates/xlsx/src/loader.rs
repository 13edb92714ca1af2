//! Worksheet reading, section filtering and room grouping.

use calamine::{open_workbook_auto, Data, Range, Reader};
use doorplate_core::{Error, Result, RoomGroups, RoomKey, RoomRecord, SheetOptions};
use indexmap::IndexMap;
use std::path::Path;

/// Loads room rows from a workbook.
#[derive(Debug, Clone)]
pub struct SpreadsheetLoader {
    options: SheetOptions,
}

impl SpreadsheetLoader {
    pub fn new(options: SheetOptions) -> Self {
        Self { options }
    }

    /// Open a workbook and group the rows of the configured section.
    pub fn load(&self, path: &Path) -> Result<RoomGroups> {
        let mut workbook = open_workbook_auto(path)
            .map_err(|e| Error::SpreadsheetError(format!("{}: {}", path.display(), e)))?;

        let range = match &self.options.sheet {
            Some(name) => workbook
                .worksheet_range(name)
                .map_err(|e| Error::SpreadsheetError(format!("Worksheet '{}': {}", name, e)))?,
            None => workbook
                .worksheet_range_at(0)
                .ok_or_else(|| Error::SpreadsheetError("Workbook has no worksheets".to_string()))?
                .map_err(|e| Error::SpreadsheetError(e.to_string()))?,
        };

        let rows = range_to_rows(&range);
        log::debug!("Read {} rows from {}", rows.len(), path.display());

        group_rows(&rows, &self.options)
    }
}

/// Stringify a cell the way it is shown on a door plate.
///
/// Whole numbers lose their fractional part (`23.0` becomes `23`); empty
/// and error cells become empty strings.
pub fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// Stringified rows indexed from the first sheet row, so row numbers match
/// what the user sees even when the used range starts further down.
fn range_to_rows(range: &Range<Data>) -> Vec<Vec<String>> {
    let (start_row, start_col) = range.start().unwrap_or((0, 0));
    let mut rows: Vec<Vec<String>> = vec![Vec::new(); start_row as usize];

    for row in range.rows() {
        let mut cells = vec![String::new(); start_col as usize];
        cells.extend(row.iter().map(cell_to_string));
        rows.push(cells);
    }

    rows
}

/// Group stringified rows by room key.
///
/// `rows[options.header_row]` names the columns, the next
/// `options.skip_rows` rows are skipped and the rest is data.
pub fn group_rows(rows: &[Vec<String>], options: &SheetOptions) -> Result<RoomGroups> {
    let header = rows.get(options.header_row).ok_or_else(|| {
        Error::SpreadsheetError(format!(
            "Header row {} is beyond the end of the sheet ({} rows)",
            options.header_row + 1,
            rows.len()
        ))
    })?;

    let mut columns: IndexMap<String, usize> = IndexMap::new();
    for (idx, name) in header.iter().enumerate() {
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        if columns.contains_key(name) {
            log::warn!("Column '{}' appears more than once; using the first one", name);
            continue;
        }
        columns.insert(name.to_string(), idx);
    }

    let column = |name: &str| {
        columns
            .get(name)
            .copied()
            .ok_or_else(|| Error::MissingColumn(name.to_string()))
    };
    let [room, layout, section, relevant] = options.required_columns();
    let (room, layout, section, relevant) =
        (column(room)?, column(layout)?, column(section)?, column(relevant)?);

    fn cell(row: &[String], idx: usize) -> &str {
        row.get(idx).map(String::as_str).unwrap_or("")
    }

    let mut groups = RoomGroups::new();
    let first_data_row = options.header_row + 1 + options.skip_rows;

    for (idx, row) in rows.iter().enumerate().skip(first_data_row) {
        if cell(row, section) != options.section_value {
            continue;
        }

        let key = cell(row, room).trim();
        if key.is_empty() {
            log::debug!("Row {} has no room key, skipping", idx + 1);
            continue;
        }

        let layout = cell(row, layout).trim();
        let record = RoomRecord {
            row: idx + 1,
            layout: (!layout.is_empty()).then(|| layout.to_string()),
            relevant: cell(row, relevant) == options.relevant_value,
            values: columns
                .iter()
                .map(|(name, &col)| (name.clone(), cell(row, col).to_string()))
                .collect(),
        };

        groups.push(RoomKey::new(key), record);
    }

    Ok(groups)
}
