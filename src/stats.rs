//! Dataset-quality statistics computed from a project snapshot.
//!
//! This runs off the interaction path, typically right before export.

use std::collections::BTreeMap;

use crate::geometry::{intersection_area, iou};
use crate::model::{BoxAnnotation, ClassId, ImageId, ImageStatus};
use crate::store::ProjectSnapshot;

/// Summary numbers for one project.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatasetStats {
    pub image_count: usize,
    pub labeled_images: usize,
    pub new_images: usize,
    pub box_count: usize,
    /// Box count per class id, including classes with no boxes.
    pub boxes_per_class: BTreeMap<ClassId, usize>,
    /// Same-image box pairs with a positive overlap area.
    pub overlapping_pairs: usize,
    /// Mean IoU over the overlapping pairs; 0 when there are none.
    pub mean_overlap_iou: f64,
}

impl DatasetStats {
    pub fn compute(snapshot: &ProjectSnapshot) -> Self {
        let file = &snapshot.file;
        let mut stats = DatasetStats {
            image_count: file.images.len(),
            box_count: file.boxes.len(),
            ..Default::default()
        };

        for image in &file.images {
            match image.status {
                ImageStatus::Labeled => stats.labeled_images += 1,
                ImageStatus::New => stats.new_images += 1,
            }
        }

        for class in &file.classes {
            stats.boxes_per_class.insert(class.id, 0);
        }
        for b in &file.boxes {
            *stats.boxes_per_class.entry(b.class_id).or_insert(0) += 1;
        }

        let mut by_image: BTreeMap<ImageId, Vec<&BoxAnnotation>> = BTreeMap::new();
        for b in &file.boxes {
            by_image.entry(b.image_id).or_default().push(b);
        }

        let mut iou_sum = 0.0;
        for boxes in by_image.values() {
            for (i, a) in boxes.iter().enumerate() {
                for b in &boxes[i + 1..] {
                    let (ra, rb) = (a.rect(), b.rect());
                    if intersection_area(&ra, &rb) > 0.0 {
                        stats.overlapping_pairs += 1;
                        iou_sum += iou(&ra, &rb);
                    }
                }
            }
        }
        if stats.overlapping_pairs > 0 {
            stats.mean_overlap_iou = iou_sum / stats.overlapping_pairs as f64;
        }

        log::debug!(
            "Dataset stats: {} images, {} boxes, {} overlapping pairs",
            stats.image_count,
            stats.box_count,
            stats.overlapping_pairs
        );
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::store::{AnnotationStore, NewImage, ProjectStore};

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_compute() {
        let mut store = ProjectStore::new("stats");
        store.add_class("person");
        store.add_class("car");
        store.add_class("unused");
        let a = store.add_image(NewImage::new("a.jpg", 100, 100, "blob:a"));
        let b = store.add_image(NewImage::new("b.jpg", 100, 100, "blob:b"));
        store.add_image(NewImage::new("c.jpg", 100, 100, "blob:c"));

        store.create_box(Rect::new(0.0, 0.0, 20.0, 20.0), 0, a);
        store.create_box(Rect::new(10.0, 0.0, 20.0, 20.0), 0, a);
        // Touching only at an edge: not an overlap
        store.create_box(Rect::new(30.0, 0.0, 10.0, 10.0), 1, a);
        // Same coordinates on another image never pair up
        store.create_box(Rect::new(0.0, 0.0, 20.0, 20.0), 1, b);

        let stats = DatasetStats::compute(&store.snapshot());

        assert_eq!(stats.image_count, 3);
        assert_eq!(stats.labeled_images, 2);
        assert_eq!(stats.new_images, 1);
        assert_eq!(stats.box_count, 4);
        assert_eq!(stats.boxes_per_class.get(&0), Some(&2));
        assert_eq!(stats.boxes_per_class.get(&1), Some(&2));
        assert_eq!(stats.boxes_per_class.get(&2), Some(&0));
        assert_eq!(stats.overlapping_pairs, 1);
        // 200 / (400 + 400 - 200)
        assert!((stats.mean_overlap_iou - 1.0 / 3.0).abs() < EPSILON);
    }

    #[test]
    fn test_empty_project() {
        let stats = DatasetStats::compute(&ProjectStore::new("empty").snapshot());
        assert_eq!(stats, DatasetStats::default());
    }
}
