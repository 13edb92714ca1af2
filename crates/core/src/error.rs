//! Error types for door plate slide generation.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a generation run.
///
/// Conditions that only affect a single room, row or shape are not errors;
/// they are collected in a [`GenerationReport`](crate::GenerationReport).
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to open, read or write a file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// ZIP archive error (for PPTX).
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// XML parsing or writing error (for PPTX).
    #[error("XML error: {0}")]
    XmlError(String),

    /// The PPTX package is structurally invalid.
    #[error("PPTX structure error: {0}")]
    PptxParseError(String),

    /// The floor plan drawing could not be parsed.
    #[error("Drawing parse error: {0}")]
    DrawingParseError(String),

    /// A room group in the drawing has no identifier.
    #[error("Drawing group #{index} has no '{attribute}' attribute")]
    MissingGroupAttribute { index: usize, attribute: String },

    /// The spreadsheet could not be opened or read.
    #[error("Spreadsheet error: {0}")]
    SpreadsheetError(String),

    /// A configured column is not present in the spreadsheet header.
    #[error("Spreadsheet column '{0}' not found")]
    MissingColumn(String),

    /// The configured source slide does not exist.
    #[error("Slide index {index} out of range (presentation has {count} slides)")]
    SlideIndexOutOfRange { index: usize, count: usize },

    /// Placeholder shapes and drawing names are out of sync.
    #[error("Source slide has {shapes} shapes but the drawing has {names} room groups")]
    ShapeCountMismatch { shapes: usize, names: usize },

    /// Two master layouts share a name.
    #[error("Master layout name '{0}' is used more than once")]
    DuplicateLayout(String),

    /// Two shapes of a layout sit at the same position, so names cannot be mirrored.
    #[error("Layout '{layout}' has several shapes at top={top}, left={left}")]
    DuplicateGeometry { layout: String, top: i64, left: i64 },

    /// A generated shape has no value in its row (abort policy only).
    #[error("Room '{room}' with layout '{layout}' has no value for shape '{shape}'")]
    MissingValue {
        room: String,
        layout: String,
        shape: String,
    },

    /// A slide, shape or layout handle does not refer to anything in the deck.
    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    /// The requested profile is not stored.
    #[error("Profile '{0}' not found. Please create it first")]
    ProfileNotFound(String),

    /// A profile lacks values that a run needs.
    #[error("Profile is missing required values: {}", .0.join(", "))]
    IncompleteProfile(Vec<String>),

    /// The profile file could not be (de)serialized.
    #[error("Profile store error: {0}")]
    ProfileError(#[from] serde_json::Error),
}
