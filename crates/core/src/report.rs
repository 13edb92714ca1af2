//! Outcome of a generation run.
//!
//! The generator never logs recoverable conditions itself. It records them
//! here and the caller decides whether to call [`GenerationReport::log`].

use crate::types::{RoomKey, SlideRef};
use std::fmt;

/// Why a row did not produce a slide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The relevance column does not hold the relevant marker.
    NotRelevant,
    /// The layout column is blank.
    NoLayout,
    /// No master layout carries this name.
    UnknownLayout(String),
}

/// A slide created for a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedSlide {
    pub slide: SlideRef,
    pub layout: String,
    /// Whether the room's placeholder links to this slide.
    pub linked: bool,
    /// Shapes left blank because the row has no such column.
    pub missing_values: Vec<String>,
    /// Shapes whose position matched no layout shape.
    pub unmatched_shapes: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    Generated(GeneratedSlide),
    Skipped(SkipReason),
}

/// One spreadsheet row of a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowReport {
    /// 1-based worksheet row.
    pub row: usize,
    pub outcome: RowOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomOutcome {
    /// The spreadsheet has no rows for this room in the selected section.
    NoData,
    Rows(Vec<RowReport>),
}

/// One placeholder shape of the source slide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomReport {
    pub key: RoomKey,
    pub shape: String,
    pub outcome: RoomOutcome,
}

impl RoomReport {
    /// Slides generated for this room, in row order.
    pub fn generated(&self) -> impl Iterator<Item = &GeneratedSlide> {
        let rows: &[RowReport] = match &self.outcome {
            RoomOutcome::Rows(rows) => rows,
            RoomOutcome::NoData => &[],
        };
        rows.iter().filter_map(|r| match &r.outcome {
            RowOutcome::Generated(g) => Some(g),
            RowOutcome::Skipped(_) => None,
        })
    }
}

/// Everything the generator did, room by room in processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    pub rooms: Vec<RoomReport>,
}

/// Counters over a [`GenerationReport`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportSummary {
    pub rooms: usize,
    pub rooms_without_data: usize,
    pub slides: usize,
    pub not_relevant: usize,
    pub no_layout: usize,
    pub unknown_layout: usize,
    pub missing_values: usize,
}

impl fmt::Display for ReportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} slides generated for {} rooms ({} without data); skipped rows: {} not relevant, {} without layout, {} with unknown layout; {} missing values",
            self.slides,
            self.rooms,
            self.rooms_without_data,
            self.not_relevant,
            self.no_layout,
            self.unknown_layout,
            self.missing_values
        )
    }
}

impl GenerationReport {
    pub fn room(&self, key: &str) -> Option<&RoomReport> {
        self.rooms.iter().find(|r| r.key.as_str() == key)
    }

    pub fn summary(&self) -> ReportSummary {
        let mut summary = ReportSummary {
            rooms: self.rooms.len(),
            ..Default::default()
        };

        for room in &self.rooms {
            let rows = match &room.outcome {
                RoomOutcome::NoData => {
                    summary.rooms_without_data += 1;
                    continue;
                }
                RoomOutcome::Rows(rows) => rows,
            };
            for row in rows {
                match &row.outcome {
                    RowOutcome::Generated(g) => {
                        summary.slides += 1;
                        summary.missing_values += g.missing_values.len();
                    }
                    RowOutcome::Skipped(SkipReason::NotRelevant) => summary.not_relevant += 1,
                    RowOutcome::Skipped(SkipReason::NoLayout) => summary.no_layout += 1,
                    RowOutcome::Skipped(SkipReason::UnknownLayout(_)) => {
                        summary.unknown_layout += 1
                    }
                }
            }
        }

        summary
    }

    /// Emit one log record per notable outcome.
    pub fn log(&self) {
        for room in &self.rooms {
            let rows = match &room.outcome {
                RoomOutcome::NoData => {
                    log::info!(
                        "Room '{}' from drawing/presentation does not have any data in the spreadsheet",
                        room.key
                    );
                    continue;
                }
                RoomOutcome::Rows(rows) => rows,
            };

            for row in rows {
                match &row.outcome {
                    RowOutcome::Skipped(SkipReason::NotRelevant) => log::info!(
                        "Room '{}' (row {}) skipped: not marked as relevant",
                        room.key,
                        row.row
                    ),
                    RowOutcome::Skipped(SkipReason::NoLayout) => log::warn!(
                        "Room '{}' (row {}) skipped: no layout given",
                        room.key,
                        row.row
                    ),
                    RowOutcome::Skipped(SkipReason::UnknownLayout(layout)) => log::warn!(
                        "Room '{}' (row {}) skipped: no master layout named '{}'",
                        room.key,
                        row.row,
                        layout
                    ),
                    RowOutcome::Generated(g) => {
                        log::debug!(
                            "Room '{}' (row {}) -> slide {} using layout '{}'",
                            room.key,
                            row.row,
                            g.slide.0 + 1,
                            g.layout
                        );
                        for shape in &g.missing_values {
                            log::warn!(
                                "Room '{}' with layout '{}' has no data for shape '{}'",
                                room.key,
                                g.layout,
                                shape
                            );
                        }
                        if g.unmatched_shapes > 0 {
                            log::warn!(
                                "Room '{}': {} shapes of layout '{}' could not be matched by position",
                                room.key,
                                g.unmatched_shapes,
                                g.layout
                            );
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generated(slide: usize, missing: &[&str]) -> RowOutcome {
        RowOutcome::Generated(GeneratedSlide {
            slide: SlideRef(slide),
            layout: "Standard".to_string(),
            linked: slide == 1,
            missing_values: missing.iter().map(|s| s.to_string()).collect(),
            unmatched_shapes: 0,
        })
    }

    #[test]
    fn test_summary_counts() {
        let report = GenerationReport {
            rooms: vec![
                RoomReport {
                    key: RoomKey::new("1/1"),
                    shape: "Raum_1_1".to_string(),
                    outcome: RoomOutcome::Rows(vec![
                        RowReport {
                            row: 5,
                            outcome: RowOutcome::Skipped(SkipReason::NotRelevant),
                        },
                        RowReport {
                            row: 6,
                            outcome: generated(1, &["Nutzung"]),
                        },
                        RowReport {
                            row: 7,
                            outcome: generated(2, &[]),
                        },
                        RowReport {
                            row: 8,
                            outcome: RowOutcome::Skipped(SkipReason::UnknownLayout(
                                "Gone".to_string(),
                            )),
                        },
                    ]),
                },
                RoomReport {
                    key: RoomKey::new("1/2"),
                    shape: "Raum_1_2".to_string(),
                    outcome: RoomOutcome::NoData,
                },
            ],
        };

        let summary = report.summary();
        assert_eq!(summary.rooms, 2);
        assert_eq!(summary.rooms_without_data, 1);
        assert_eq!(summary.slides, 2);
        assert_eq!(summary.not_relevant, 1);
        assert_eq!(summary.no_layout, 0);
        assert_eq!(summary.unknown_layout, 1);
        assert_eq!(summary.missing_values, 1);

        let slides: Vec<SlideRef> = report
            .room("1/1")
            .unwrap()
            .generated()
            .map(|g| g.slide)
            .collect();
        assert_eq!(slides, vec![SlideRef(1), SlideRef(2)]);
        assert_eq!(report.room("1/2").unwrap().generated().count(), 0);
        assert!(summary.to_string().starts_with("2 slides generated for 2 rooms"));
    }
}
