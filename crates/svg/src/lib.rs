//! Room name extraction from SVG floor plan drawings.
//!
//! Every top-level group that contains at least one element is a room
//! symbol; bare groups are decoration and are skipped.

pub mod extractor;

pub use extractor::RoomNameExtractor;
