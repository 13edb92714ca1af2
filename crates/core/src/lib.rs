//! Core domain types, shape matching, slide generation and run profiles
//! for generating door plate slides.

pub mod config;
pub mod deck;
pub mod error;
pub mod generator;
pub mod matcher;
pub mod profile;
pub mod report;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{MissingValuePolicy, ProfileValues, RunConfig, SheetOptions};
pub use deck::Deck;
pub use error::{Error, Result};
pub use generator::{generate_slides, named_layouts, GenerateOptions};
pub use matcher::{mirror_shape_names, rename_placeholders, select_shapes, GeometryNames};
pub use profile::{
    JsonProfileStore, MemoryProfileStore, ProfileStore, DEFAULT_PROFILE, LATEST_PROFILE,
};
pub use report::{GenerationReport, ReportSummary, RoomOutcome, RowOutcome, SkipReason};
pub use types::{
    LayoutInfo, LayoutRef, Offset, RoomGroups, RoomKey, RoomRecord, ShapeInfo, SlideRef,
};
