//! Spreadsheet loader for door plate generation.
//!
//! Reads the room master sheet (.xlsx, .xlsm, .xls, .ods), keeps the rows of
//! one section and groups them by room key.

pub mod loader;

#[cfg(test)]
pub(crate) mod testing;

pub use loader::{cell_to_string, group_rows, SpreadsheetLoader};
