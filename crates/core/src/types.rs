//! Domain types shared by the loaders, the presentation backend and the generator.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;

/// Identifier correlating a drawing group, a placeholder shape and a
/// spreadsheet row group, e.g. `1/23`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomKey(String);

impl RoomKey {
    /// Wrap an already normalized key.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Derive the key from a placeholder shape name.
    ///
    /// Shape names cannot carry `/`, so `Raum_1_23` with prefix `Raum_`
    /// becomes `1/23`.
    pub fn from_shape_name(name: &str, prefix: &str) -> Self {
        let stripped = if prefix.is_empty() {
            name
        } else {
            name.strip_prefix(prefix).unwrap_or(name)
        };
        Self(stripped.replace('_', "/"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for RoomKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Content for a single slide, taken from one spreadsheet row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomRecord {
    /// 1-based row number in the worksheet.
    pub row: usize,

    /// Master layout to instantiate. None if the cell was blank.
    pub layout: Option<String>,

    /// Whether the row is marked to produce a slide.
    pub relevant: bool,

    /// Every column of the row, stringified. Blank cells are empty strings.
    pub values: IndexMap<String, String>,
}

impl RoomRecord {
    /// Value of a column, if the row has that column.
    pub fn value(&self, column: &str) -> Option<&str> {
        self.values.get(column).map(String::as_str)
    }
}

/// Spreadsheet rows grouped by room key.
///
/// Groups are kept in key order, rows inside a group in sheet order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoomGroups {
    rooms: BTreeMap<RoomKey, Vec<RoomRecord>>,
}

impl RoomGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record to the group of `key`.
    pub fn push(&mut self, key: RoomKey, record: RoomRecord) {
        self.rooms.entry(key).or_default().push(record);
    }

    /// Records for a room, in sheet order.
    pub fn get(&self, key: &str) -> Option<&[RoomRecord]> {
        self.rooms.get(key).map(Vec::as_slice)
    }

    /// Number of rooms.
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RoomKey, &[RoomRecord])> {
        self.rooms.iter().map(|(k, v)| (k, v.as_slice()))
    }
}

/// Position of a shape's top-left corner, in EMU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Offset {
    pub top: i64,
    pub left: i64,
}

impl Offset {
    pub fn new(top: i64, left: i64) -> Self {
        Self { top, left }
    }
}

/// Handle of a slide in a deck (0-based position in the slide list).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlideRef(pub usize);

/// Handle of a master layout in a deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayoutRef(pub usize);

/// A shape as seen by the matcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeInfo {
    /// Position in the slide's shape tree; stable while the slide is edited.
    pub index: usize,

    pub name: String,

    /// None if the shape has no explicit geometry.
    pub offset: Option<Offset>,
}

impl ShapeInfo {
    pub fn new(index: usize, name: impl Into<String>, offset: Option<Offset>) -> Self {
        Self {
            index,
            name: name.into(),
            offset,
        }
    }
}

/// A master layout reachable from one of the slide masters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutInfo {
    pub layout: LayoutRef,
    pub name: String,
}
