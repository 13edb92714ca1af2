//! Slide generation: one slide per relevant spreadsheet row, linked from the
//! room's placeholder shape.

use crate::config::{MissingValuePolicy, RunConfig};
use crate::deck::Deck;
use crate::error::{Error, Result};
use crate::matcher::{mirror_shape_names, select_shapes, GeometryNames};
use crate::report::{
    GeneratedSlide, GenerationReport, RoomOutcome, RoomReport, RowOutcome, RowReport, SkipReason,
};
use crate::types::{LayoutRef, RoomGroups, RoomKey, RoomRecord, ShapeInfo, SlideRef};
use std::collections::HashMap;

/// Presentation-side settings of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Slide holding the room placeholders.
    pub slide_index: usize,
    /// Name prefix of room placeholders.
    pub prefix: String,
    /// Shape never renamed or filled.
    pub exclude: String,
    pub missing_value: MissingValuePolicy,
}

impl From<&RunConfig> for GenerateOptions {
    fn from(config: &RunConfig) -> Self {
        Self {
            slide_index: config.pptx_slide_idx,
            prefix: config.pptx_shape_prefix.clone(),
            exclude: config.pptx_shape_exclude.clone(),
            missing_value: config.missing_value,
        }
    }
}

/// Master layouts by name.
///
/// Fails if two layouts, possibly under different masters, share a name.
pub fn named_layouts<D: Deck + ?Sized>(deck: &D) -> Result<HashMap<String, LayoutRef>> {
    let mut layouts = HashMap::new();
    for info in deck.layouts() {
        if layouts.insert(info.name.clone(), info.layout).is_some() {
            return Err(Error::DuplicateLayout(info.name));
        }
    }
    Ok(layouts)
}

/// Generate slides for every room placeholder on the source slide.
///
/// Rooms are processed in placeholder name order, rows in sheet order, so the
/// resulting deck is reproducible. Nothing is logged; see
/// [`GenerationReport::log`].
pub fn generate_slides<D: Deck + ?Sized>(
    deck: &mut D,
    rooms: &RoomGroups,
    options: &GenerateOptions,
) -> Result<GenerationReport> {
    let source = SlideRef(options.slide_index);
    let count = deck.slide_count();
    if source.0 >= count {
        return Err(Error::SlideIndexOutOfRange {
            index: source.0,
            count,
        });
    }

    let layouts = named_layouts(deck)?;

    let mut placeholders = select_shapes(
        deck.slide_shapes(source)?,
        Some(&options.exclude),
        Some(&options.prefix),
    );
    placeholders.sort_by(|a, b| a.name.cmp(&b.name));

    let mut generator = Generator {
        deck,
        layouts,
        geometry: HashMap::new(),
        source,
        options,
    };

    let mut report = GenerationReport::default();
    for placeholder in placeholders {
        let key = RoomKey::from_shape_name(&placeholder.name, &options.prefix);
        let outcome = match rooms.get(key.as_str()) {
            Some(records) => RoomOutcome::Rows(generator.room(&key, &placeholder, records)?),
            None => RoomOutcome::NoData,
        };
        report.rooms.push(RoomReport {
            key,
            shape: placeholder.name,
            outcome,
        });
    }

    Ok(report)
}

struct Generator<'a, D: Deck + ?Sized> {
    deck: &'a mut D,
    layouts: HashMap<String, LayoutRef>,
    geometry: HashMap<LayoutRef, GeometryNames>,
    source: SlideRef,
    options: &'a GenerateOptions,
}

impl<D: Deck + ?Sized> Generator<'_, D> {
    fn room(
        &mut self,
        key: &RoomKey,
        placeholder: &ShapeInfo,
        records: &[RoomRecord],
    ) -> Result<Vec<RowReport>> {
        let mut rows = Vec::with_capacity(records.len());
        let mut linked = false;

        for record in records {
            let outcome = match self.row(key, record)? {
                Ok(mut generated) => {
                    // A shape has a single link slot: the first slide wins
                    if !linked {
                        self.deck
                            .link_shape(self.source, placeholder.index, generated.slide)?;
                        generated.linked = true;
                        linked = true;
                    }
                    RowOutcome::Generated(generated)
                }
                Err(reason) => RowOutcome::Skipped(reason),
            };
            rows.push(RowReport {
                row: record.row,
                outcome,
            });
        }

        Ok(rows)
    }

    fn row(
        &mut self,
        key: &RoomKey,
        record: &RoomRecord,
    ) -> Result<std::result::Result<GeneratedSlide, SkipReason>> {
        if !record.relevant {
            return Ok(Err(SkipReason::NotRelevant));
        }
        let Some(layout_name) = record.layout.as_deref() else {
            return Ok(Err(SkipReason::NoLayout));
        };
        let Some(&layout) = self.layouts.get(layout_name) else {
            return Ok(Err(SkipReason::UnknownLayout(layout_name.to_string())));
        };

        if !self.geometry.contains_key(&layout) {
            let names = GeometryNames::from_shapes(&self.deck.layout_shapes(layout)?);
            names.ensure_unique(layout_name)?;
            self.geometry.insert(layout, names);
        }
        let geometry = &self.geometry[&layout];

        let slide = self.deck.add_slide(layout)?;
        let unmatched = mirror_shape_names(&mut *self.deck, geometry, slide)?;

        let shapes = select_shapes(
            self.deck.slide_shapes(slide)?,
            Some(&self.options.exclude),
            None,
        );

        let mut missing_values = Vec::new();
        for shape in shapes.iter().filter(|s| !unmatched.contains(&s.index)) {
            match record.value(&shape.name) {
                Some(text) => self.deck.set_shape_text(slide, shape.index, text)?,
                None if self.options.missing_value == MissingValuePolicy::Abort => {
                    return Err(Error::MissingValue {
                        room: key.to_string(),
                        layout: layout_name.to_string(),
                        shape: shape.name.clone(),
                    });
                }
                None => missing_values.push(shape.name.clone()),
            }
        }

        Ok(Ok(GeneratedSlide {
            slide,
            layout: layout_name.to_string(),
            linked: false,
            missing_values,
            unmatched_shapes: unmatched.len(),
        }))
    }
}
