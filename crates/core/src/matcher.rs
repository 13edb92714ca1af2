//! Shape matching: placeholder renaming and layout-to-slide name mirroring.

use crate::deck::Deck;
use crate::error::{Error, Result};
use crate::types::{Offset, ShapeInfo, SlideRef};
use std::collections::HashMap;

/// Filter shapes by exact exclude name and by name prefix.
pub fn select_shapes(
    shapes: Vec<ShapeInfo>,
    exclude: Option<&str>,
    prefix: Option<&str>,
) -> Vec<ShapeInfo> {
    shapes
        .into_iter()
        .filter(|s| exclude.map_or(true, |ex| s.name != ex))
        .filter(|s| prefix.map_or(true, |p| s.name.starts_with(p)))
        .collect()
}

/// Rename the shapes of `slide` (except `exclude`) to `names`, pairing them in
/// document order.
///
/// Nothing is renamed unless both sides have the same length.
pub fn rename_placeholders<D: Deck + ?Sized>(
    deck: &mut D,
    slide: SlideRef,
    names: &[String],
    exclude: &str,
) -> Result<()> {
    let count = deck.slide_count();
    if slide.0 >= count {
        return Err(Error::SlideIndexOutOfRange {
            index: slide.0,
            count,
        });
    }

    let shapes = select_shapes(deck.slide_shapes(slide)?, Some(exclude), None);
    if shapes.len() != names.len() {
        return Err(Error::ShapeCountMismatch {
            shapes: shapes.len(),
            names: names.len(),
        });
    }

    for (shape, name) in shapes.iter().zip(names) {
        log::debug!("Renaming shape '{}' to '{}'", shape.name, name);
        deck.rename_shape(slide, shape.index, name)?;
    }

    Ok(())
}

/// Shape names keyed by position.
///
/// Shapes sharing a position overwrite each other (last one wins); the
/// overwritten positions are kept in `collisions`.
#[derive(Debug, Default)]
pub struct GeometryNames {
    names: HashMap<Offset, String>,
    collisions: Vec<Offset>,
}

impl GeometryNames {
    /// Index named shapes by their offset. Shapes without geometry are left out.
    pub fn from_shapes(shapes: &[ShapeInfo]) -> Self {
        let mut map = Self::default();
        for shape in shapes {
            let Some(offset) = shape.offset else {
                continue;
            };
            if map.names.insert(offset, shape.name.clone()).is_some()
                && !map.collisions.contains(&offset)
            {
                map.collisions.push(offset);
            }
        }
        map
    }

    pub fn get(&self, offset: &Offset) -> Option<&str> {
        self.names.get(offset).map(String::as_str)
    }

    /// Positions held by more than one shape.
    pub fn collisions(&self) -> &[Offset] {
        &self.collisions
    }

    /// Fail on the first shared position.
    pub fn ensure_unique(&self, layout: &str) -> Result<()> {
        match self.collisions.first() {
            Some(offset) => Err(Error::DuplicateGeometry {
                layout: layout.to_string(),
                top: offset.top,
                left: offset.left,
            }),
            None => Ok(()),
        }
    }
}

/// Copy names from `source` onto the shapes of `slide` that sit at the same
/// position. Shape order is irrelevant.
///
/// Returns the indices of slide shapes that found no counterpart; they keep
/// their current name.
pub fn mirror_shape_names<D: Deck + ?Sized>(
    deck: &mut D,
    source: &GeometryNames,
    slide: SlideRef,
) -> Result<Vec<usize>> {
    let mut unmatched = Vec::new();

    for shape in deck.slide_shapes(slide)? {
        match shape.offset.as_ref().and_then(|o| source.get(o)) {
            Some(name) => {
                let name = name.to_string();
                deck.rename_shape(slide, shape.index, &name)?;
            }
            None => unmatched.push(shape.index),
        }
    }

    Ok(unmatched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeDeck;

    fn shape(index: usize, name: &str, top: i64, left: i64) -> ShapeInfo {
        ShapeInfo::new(index, name, Some(Offset::new(top, left)))
    }

    #[test]
    fn test_select_shapes() {
        let shapes = vec![
            shape(0, "Raum_1", 0, 0),
            shape(1, "IGNORE", 0, 1),
            shape(2, "Title", 0, 2),
            shape(3, "Raum_2", 0, 3),
        ];

        let names: Vec<String> = select_shapes(shapes.clone(), Some("IGNORE"), None)
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["Raum_1", "Title", "Raum_2"]);

        let names: Vec<String> = select_shapes(shapes, None, Some("Raum_"))
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["Raum_1", "Raum_2"]);
    }

    #[test]
    fn test_rename_placeholders_pairs_in_order() {
        let mut deck = FakeDeck::new();
        let slide = deck.push_slide(vec![
            ("Freeform 1", Some((0, 0))),
            ("IGNORE", Some((0, 10))),
            ("Freeform 2", Some((0, 20))),
        ]);

        let names = vec!["Raum_1_1".to_string(), "Raum_1_2".to_string()];
        rename_placeholders(&mut deck, slide, &names, "IGNORE").unwrap();

        assert_eq!(deck.names(slide), vec!["Raum_1_1", "IGNORE", "Raum_1_2"]);
    }

    #[test]
    fn test_rename_placeholders_count_mismatch_renames_nothing() {
        let mut deck = FakeDeck::new();
        let slide = deck.push_slide(vec![
            ("Freeform 1", Some((0, 0))),
            ("Freeform 2", Some((0, 20))),
        ]);

        let names = vec!["Raum_1".to_string()];
        let err = rename_placeholders(&mut deck, slide, &names, "IGNORE").unwrap_err();

        assert!(matches!(
            err,
            Error::ShapeCountMismatch {
                shapes: 2,
                names: 1
            }
        ));
        assert_eq!(deck.names(slide), vec!["Freeform 1", "Freeform 2"]);
    }

    #[test]
    fn test_rename_placeholders_bad_slide_index() {
        let mut deck = FakeDeck::new();
        let err = rename_placeholders(&mut deck, SlideRef(3), &[], "IGNORE").unwrap_err();
        assert!(matches!(err, Error::SlideIndexOutOfRange { index: 3, count: 0 }));
    }

    #[test]
    fn test_geometry_names_last_write_wins() {
        let shapes = vec![
            shape(0, "first", 10, 10),
            shape(1, "second", 10, 10),
            ShapeInfo::new(2, "floating", None),
        ];
        let map = GeometryNames::from_shapes(&shapes);

        assert_eq!(map.get(&Offset::new(10, 10)), Some("second"));
        assert_eq!(map.collisions(), &[Offset::new(10, 10)]);
        assert!(matches!(
            map.ensure_unique("Standard"),
            Err(Error::DuplicateGeometry { top: 10, left: 10, .. })
        ));
    }

    #[test]
    fn test_mirror_ignores_traversal_order() {
        let layout = vec![shape(0, "Raumnr", 100, 200), shape(1, "Nutzung", 300, 200)];
        let source = GeometryNames::from_shapes(&layout);
        assert!(source.ensure_unique("Standard").is_ok());

        let mut deck = FakeDeck::new();
        // Reverse order compared to the layout, plus one shape without a counterpart
        let slide = deck.push_slide(vec![
            ("Placeholder 1", Some((300, 200))),
            ("Placeholder 2", Some((100, 200))),
            ("Placeholder 3", Some((999, 0))),
        ]);

        let unmatched = mirror_shape_names(&mut deck, &source, slide).unwrap();

        assert_eq!(deck.names(slide), vec!["Nutzung", "Raumnr", "Placeholder 3"]);
        assert_eq!(unmatched, vec![2]);
    }
}
