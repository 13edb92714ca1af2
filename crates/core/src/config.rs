//! Run configuration and partial (profile) configuration.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_COLUMN_ROOM: &str = "Raumnr";
pub const DEFAULT_COLUMN_LAYOUT: &str = "Layout";
pub const DEFAULT_COLUMN_SECTION: &str = "Bereich";
pub const DEFAULT_COLUMN_RELEVANT: &str = "Schild";
pub const DEFAULT_RELEVANT_VALUE: &str = "ja";
pub const DEFAULT_HEADER_ROW: usize = 2;
pub const DEFAULT_SKIP_ROWS: usize = 1;
pub const DEFAULT_SHAPE_EXCLUDE: &str = "IGNORE";
pub const DEFAULT_SHAPE_PREFIX: &str = "Raum_";
pub const DEFAULT_NAME_ATTRIBUTE: &str = "id";

/// What to do with a generated shape that has no value in its row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingValuePolicy {
    /// Leave the shape blank and record it in the report.
    #[default]
    Warn,
    /// Fail the run.
    Abort,
}

impl std::str::FromStr for MissingValuePolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "warn" => Ok(Self::Warn),
            "abort" => Ok(Self::Abort),
            other => Err(format!("unknown missing value policy '{}'", other)),
        }
    }
}

/// Spreadsheet columns and filters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetOptions {
    /// Worksheet name. None means the first worksheet.
    pub sheet: Option<String>,

    /// 0-based row holding the column names.
    pub header_row: usize,

    /// Human-readable rows directly below the header.
    pub skip_rows: usize,

    pub column_room: String,
    pub column_layout: String,
    pub column_section: String,
    pub column_relevant: String,

    /// Rows whose section column equals this value are loaded.
    pub section_value: String,

    /// Marker in the relevance column meaning "produce a slide".
    pub relevant_value: String,
}

impl SheetOptions {
    /// Options with the default column names for a section.
    pub fn for_section(section_value: impl Into<String>) -> Self {
        Self {
            sheet: None,
            header_row: DEFAULT_HEADER_ROW,
            skip_rows: DEFAULT_SKIP_ROWS,
            column_room: DEFAULT_COLUMN_ROOM.to_string(),
            column_layout: DEFAULT_COLUMN_LAYOUT.to_string(),
            column_section: DEFAULT_COLUMN_SECTION.to_string(),
            column_relevant: DEFAULT_COLUMN_RELEVANT.to_string(),
            section_value: section_value.into(),
            relevant_value: DEFAULT_RELEVANT_VALUE.to_string(),
        }
    }

    /// Columns that must exist in the header.
    pub fn required_columns(&self) -> [&str; 4] {
        [
            &self.column_room,
            &self.column_layout,
            &self.column_section,
            &self.column_relevant,
        ]
    }
}

/// Everything a run needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    pub excel_path: PathBuf,
    pub pptx_path: PathBuf,
    pub svg_path: PathBuf,
    pub result_path: PathBuf,
    pub sheet: SheetOptions,
    pub pptx_slide_idx: usize,
    pub pptx_shape_exclude: String,
    pub pptx_shape_prefix: String,
    pub svg_name_attribute: String,
    pub missing_value: MissingValuePolicy,
}

/// A possibly incomplete set of run options, as stored in a profile.
///
/// Serialized as a flat key-value object; unset keys are not written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileValues {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excel_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pptx_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub svg_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excel_sheet: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excel_header_row: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excel_skip_rows: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excel_section_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excel_column_room: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excel_column_layout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excel_column_section: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excel_column_relevant: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excel_relevant_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pptx_slide_idx: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pptx_shape_exclude: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pptx_shape_prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub svg_name_attribute: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing_value: Option<MissingValuePolicy>,
}

macro_rules! overlay {
    ($base:ident, $top:ident, $($field:ident),+ $(,)?) => {
        $( if $top.$field.is_some() { $base.$field = $top.$field.clone(); } )+
    };
}

impl ProfileValues {
    /// Values set in `other` replace the ones in `self`.
    pub fn merge(mut self, other: &ProfileValues) -> Self {
        overlay!(
            self,
            other,
            excel_path,
            pptx_path,
            svg_path,
            result_path,
            excel_sheet,
            excel_header_row,
            excel_skip_rows,
            excel_section_value,
            excel_column_room,
            excel_column_layout,
            excel_column_section,
            excel_column_relevant,
            excel_relevant_value,
            pptx_slide_idx,
            pptx_shape_exclude,
            pptx_shape_prefix,
            svg_name_attribute,
            missing_value,
        );
        self
    }

    /// Fill defaults and check that paths and section are present.
    pub fn resolve(&self) -> Result<RunConfig> {
        let mut missing = Vec::new();
        let mut require_path = |value: &Option<PathBuf>, key: &str| match value {
            Some(v) => v.clone(),
            None => {
                missing.push(key.to_string());
                PathBuf::new()
            }
        };

        let excel_path = require_path(&self.excel_path, "excel_path");
        let pptx_path = require_path(&self.pptx_path, "pptx_path");
        let svg_path = require_path(&self.svg_path, "svg_path");
        let result_path = require_path(&self.result_path, "result_path");

        let section_value = match &self.excel_section_value {
            Some(v) => v.clone(),
            None => {
                missing.push("excel_section_value".to_string());
                String::new()
            }
        };

        if !missing.is_empty() {
            return Err(Error::IncompleteProfile(missing));
        }

        let or = |value: &Option<String>, default: &str| {
            value.clone().unwrap_or_else(|| default.to_string())
        };

        Ok(RunConfig {
            excel_path,
            pptx_path,
            svg_path,
            result_path,
            sheet: SheetOptions {
                sheet: self.excel_sheet.clone(),
                header_row: self.excel_header_row.unwrap_or(DEFAULT_HEADER_ROW),
                skip_rows: self.excel_skip_rows.unwrap_or(DEFAULT_SKIP_ROWS),
                column_room: or(&self.excel_column_room, DEFAULT_COLUMN_ROOM),
                column_layout: or(&self.excel_column_layout, DEFAULT_COLUMN_LAYOUT),
                column_section: or(&self.excel_column_section, DEFAULT_COLUMN_SECTION),
                column_relevant: or(&self.excel_column_relevant, DEFAULT_COLUMN_RELEVANT),
                section_value,
                relevant_value: or(&self.excel_relevant_value, DEFAULT_RELEVANT_VALUE),
            },
            pptx_slide_idx: self.pptx_slide_idx.unwrap_or(0),
            pptx_shape_exclude: or(&self.pptx_shape_exclude, DEFAULT_SHAPE_EXCLUDE),
            pptx_shape_prefix: or(&self.pptx_shape_prefix, DEFAULT_SHAPE_PREFIX),
            svg_name_attribute: or(&self.svg_name_attribute, DEFAULT_NAME_ATTRIBUTE),
            missing_value: self.missing_value.unwrap_or_default(),
        })
    }
}

impl From<&RunConfig> for ProfileValues {
    fn from(config: &RunConfig) -> Self {
        Self {
            excel_path: Some(config.excel_path.clone()),
            pptx_path: Some(config.pptx_path.clone()),
            svg_path: Some(config.svg_path.clone()),
            result_path: Some(config.result_path.clone()),
            excel_sheet: config.sheet.sheet.clone(),
            excel_header_row: Some(config.sheet.header_row),
            excel_skip_rows: Some(config.sheet.skip_rows),
            excel_section_value: Some(config.sheet.section_value.clone()),
            excel_column_room: Some(config.sheet.column_room.clone()),
            excel_column_layout: Some(config.sheet.column_layout.clone()),
            excel_column_section: Some(config.sheet.column_section.clone()),
            excel_column_relevant: Some(config.sheet.column_relevant.clone()),
            excel_relevant_value: Some(config.sheet.relevant_value.clone()),
            pptx_slide_idx: Some(config.pptx_slide_idx),
            pptx_shape_exclude: Some(config.pptx_shape_exclude.clone()),
            pptx_shape_prefix: Some(config.pptx_shape_prefix.clone()),
            svg_name_attribute: Some(config.svg_name_attribute.clone()),
            missing_value: Some(config.missing_value),
        }
    }
}
