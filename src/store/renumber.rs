//! Class reordering as a pure function.

use std::collections::HashMap;

use thiserror::Error;

use crate::model::{BoxAnnotation, ClassDef, ClassId};

/// Why a reorder request was refused.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReorderError {
    /// The new order does not list every existing class exactly once
    #[error("new order must list each of the {expected} classes exactly once")]
    NotAPermutation {
        /// Number of classes currently defined
        expected: usize,
    },
}

/// Class list and boxes after a reorder.
#[derive(Debug, Clone, PartialEq)]
pub struct Renumbered {
    pub classes: Vec<ClassDef>,
    pub boxes: Vec<BoxAnnotation>,
}

/// Renumber classes to `0..N-1` following `new_order` (a permutation of the
/// current class ids) and rewrite every box's class id to match.
///
/// The relabel happens in two phases: first an old-id to new-id map is built
/// from the new order, then all boxes are rewritten from that map. Boxes
/// whose class is not defined are dropped so no box can reference a class
/// absent from the result.
pub fn renumber_classes(
    classes: &[ClassDef],
    new_order: &[ClassId],
    boxes: &[BoxAnnotation],
) -> Result<Renumbered, ReorderError> {
    let by_id: HashMap<ClassId, &ClassDef> = classes.iter().map(|c| (c.id, c)).collect();

    let mut mapping: HashMap<ClassId, ClassId> = HashMap::with_capacity(new_order.len());
    for (new_id, old_id) in new_order.iter().enumerate() {
        if !by_id.contains_key(old_id) || mapping.insert(*old_id, new_id as ClassId).is_some() {
            return Err(ReorderError::NotAPermutation {
                expected: classes.len(),
            });
        }
    }
    if mapping.len() != classes.len() {
        return Err(ReorderError::NotAPermutation {
            expected: classes.len(),
        });
    }

    let new_classes = new_order
        .iter()
        .enumerate()
        .filter_map(|(new_id, old_id)| {
            by_id.get(old_id).map(|c| ClassDef {
                id: new_id as ClassId,
                name: c.name.clone(),
                color: c.color,
            })
        })
        .collect();

    let new_boxes = boxes
        .iter()
        .filter_map(|b| match mapping.get(&b.class_id) {
            Some(&new_id) => Some(BoxAnnotation {
                class_id: new_id,
                ..b.clone()
            }),
            None => {
                log::warn!("Dropping {} with undefined class {}", b.id, b.class_id);
                None
            }
        })
        .collect();

    Ok(Renumbered {
        classes: new_classes,
        boxes: new_boxes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::model::{BoxId, ImageId};

    fn classes_abc() -> Vec<ClassDef> {
        vec![
            ClassDef::new(0, "A"),
            ClassDef::new(1, "B"),
            ClassDef::new(2, "C"),
        ]
    }

    fn boxes_for(ids: &[ClassId]) -> Vec<BoxAnnotation> {
        ids.iter()
            .enumerate()
            .map(|(i, &class_id)| {
                BoxAnnotation::new(
                    BoxId(i as u64 + 1),
                    ImageId(1),
                    class_id,
                    Rect::new(0.0, 0.0, 10.0, 10.0),
                )
            })
            .collect()
    }

    #[test]
    fn test_reorder_abc_to_cab() {
        let classes = classes_abc();
        let boxes = boxes_for(&[0, 1, 2, 2]);

        let result = renumber_classes(&classes, &[2, 0, 1], &boxes).unwrap();

        let names: Vec<_> = result
            .classes
            .iter()
            .map(|c| (c.id, c.name.as_str()))
            .collect();
        assert_eq!(names, vec![(0, "C"), (1, "A"), (2, "B")]);

        // A: 0 -> 1, B: 1 -> 2, C: 2 -> 0
        let ids: Vec<_> = result.boxes.iter().map(|b| b.class_id).collect();
        assert_eq!(ids, vec![1, 2, 0, 0]);

        // Colors travel with their class
        assert_eq!(result.classes[0].color, classes[2].color);
    }

    #[test]
    fn test_reorder_does_not_mutate_inputs() {
        let classes = classes_abc();
        let boxes = boxes_for(&[0]);
        let _ = renumber_classes(&classes, &[1, 2, 0], &boxes).unwrap();
        assert_eq!(classes[0].name, "A");
        assert_eq!(boxes[0].class_id, 0);
    }

    #[test]
    fn test_reorder_compacts_gaps() {
        let classes = vec![ClassDef::new(0, "dog"), ClassDef::new(2, "cat")];
        let boxes = boxes_for(&[2, 0]);
        let result = renumber_classes(&classes, &[2, 0], &boxes).unwrap();
        assert_eq!(result.classes[0].name, "cat");
        assert_eq!(result.classes[1].id, 1);
        let ids: Vec<_> = result.boxes.iter().map(|b| b.class_id).collect();
        assert_eq!(ids, vec![0, 1]);
    }

    #[test]
    fn test_reorder_rejects_non_permutations() {
        let classes = classes_abc();
        let boxes = boxes_for(&[0]);
        let orders: [&[ClassId]; 4] = [&[0, 1], &[0, 1, 1], &[0, 1, 2, 3], &[0, 1, 7]];
        for order in orders {
            assert_eq!(
                renumber_classes(&classes, order, &boxes),
                Err(ReorderError::NotAPermutation { expected: 3 })
            );
        }
    }

    #[test]
    fn test_reorder_drops_orphan_boxes() {
        let classes = classes_abc();
        let boxes = boxes_for(&[0, 9]);
        let result = renumber_classes(&classes, &[0, 1, 2], &boxes).unwrap();
        assert_eq!(result.boxes.len(), 1);
        assert!(
            result
                .boxes
                .iter()
                .all(|b| result.classes.iter().any(|c| c.id == b.class_id))
        );
    }
}
