//! Run options shared by `run`, `profile create` and `profile run`.

use clap::Args;
use doorplate_core::{MissingValuePolicy, ProfileValues};
use std::path::PathBuf;

/// Every option is optional here; defaults and required values are applied
/// when the options are resolved, after any profile has been overlaid.
#[derive(Args, Debug, Clone, Default)]
pub struct RunOptions {
    /// Path to the room master spreadsheet (.xlsx, .xlsm, .xls, .ods)
    #[arg(long)]
    pub excel_path: Option<PathBuf>,

    /// Path to the PowerPoint template with the master layouts
    #[arg(long)]
    pub pptx_path: Option<PathBuf>,

    /// Path to the SVG floor plan
    #[arg(long)]
    pub svg_path: Option<PathBuf>,

    /// Path of the generated presentation
    #[arg(long)]
    pub result_path: Option<PathBuf>,

    /// Worksheet to read (default: first sheet)
    #[arg(long)]
    pub excel_sheet: Option<String>,

    /// 0-based row holding the column names (default: 2)
    #[arg(long)]
    pub excel_header_row: Option<usize>,

    /// Rows after the header row that are skipped (default: 1)
    #[arg(long)]
    pub excel_skip_rows: Option<usize>,

    /// Section to generate slides for
    #[arg(long)]
    pub excel_section_value: Option<String>,

    /// Column holding the room number (default: Raumnr)
    #[arg(long)]
    pub excel_column_room: Option<String>,

    /// Column holding the master layout name (default: Layout)
    #[arg(long)]
    pub excel_column_layout: Option<String>,

    /// Column holding the section (default: Bereich)
    #[arg(long)]
    pub excel_column_section: Option<String>,

    /// Column marking rows that get a door plate (default: Schild)
    #[arg(long)]
    pub excel_column_relevant: Option<String>,

    /// Marker for relevant rows (default: ja)
    #[arg(long)]
    pub excel_relevant_value: Option<String>,

    /// Index of the slide holding the floor plan shapes (default: 0)
    #[arg(long)]
    pub pptx_slide_idx: Option<usize>,

    /// Name of the shape that is never renamed or filled (default: IGNORE)
    #[arg(long)]
    pub pptx_shape_exclude: Option<String>,

    /// Name prefix of room placeholder shapes (default: Raum_)
    #[arg(long)]
    pub pptx_shape_prefix: Option<String>,

    /// SVG group attribute holding the room name (default: id)
    #[arg(long)]
    pub svg_name_attribute: Option<String>,

    /// What to do when a layout shape has no matching column: warn or abort
    #[arg(long)]
    pub missing_value: Option<MissingValuePolicy>,
}

impl From<&RunOptions> for ProfileValues {
    fn from(options: &RunOptions) -> Self {
        Self {
            excel_path: options.excel_path.clone(),
            pptx_path: options.pptx_path.clone(),
            svg_path: options.svg_path.clone(),
            result_path: options.result_path.clone(),
            excel_sheet: options.excel_sheet.clone(),
            excel_header_row: options.excel_header_row,
            excel_skip_rows: options.excel_skip_rows,
            excel_section_value: options.excel_section_value.clone(),
            excel_column_room: options.excel_column_room.clone(),
            excel_column_layout: options.excel_column_layout.clone(),
            excel_column_section: options.excel_column_section.clone(),
            excel_column_relevant: options.excel_column_relevant.clone(),
            excel_relevant_value: options.excel_relevant_value.clone(),
            pptx_slide_idx: options.pptx_slide_idx,
            pptx_shape_exclude: options.pptx_shape_exclude.clone(),
            pptx_shape_prefix: options.pptx_shape_prefix.clone(),
            svg_name_attribute: options.svg_name_attribute.clone(),
            missing_value: options.missing_value,
        }
    }
}
