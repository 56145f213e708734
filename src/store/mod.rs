//! Authoritative in-memory annotation store.
//!
//! The canvas never reaches into global state; it receives an
//! [`AnnotationStore`] implementation and talks to it through the narrow
//! mutation API below. [`ProjectStore`] is the in-process implementation,
//! [`SharedProjectStore`] wraps it for hosts where a background auto-save
//! races user edits.

mod auto_save;
mod project;
mod renumber;
mod shared;
mod snapshot;

pub use auto_save::AutoSaveManager;
pub use project::{NewImage, ProjectStore, YoloExport, YoloImportSummary};
pub use renumber::{ReorderError, Renumbered, renumber_classes};
pub use shared::SharedProjectStore;
pub use snapshot::ProjectSnapshot;

use crate::geometry::Rect;
use crate::model::{BoxAnnotation, BoxId, BoxPatch, ClassDef, ClassId, ImageId};

/// Store contract consumed by the canvas.
///
/// All calls are synchronous and immediately consistent. Mutations that name
/// an unknown id are logged no-ops, never errors.
pub trait AnnotationStore {
    /// Create a box and return its id, or `None` when the image or class is unknown
    /// or the rectangle has no area inside the image.
    fn create_box(&mut self, rect: Rect, class_id: ClassId, image_id: ImageId) -> Option<BoxId>;

    /// Apply a partial update to a box.
    fn update_box(&mut self, id: BoxId, patch: BoxPatch);

    /// Delete a box.
    fn delete_box(&mut self, id: BoxId);

    /// Boxes of one image in insertion (render) order.
    fn list_boxes_for_image(&self, image_id: ImageId) -> Vec<BoxAnnotation>;

    /// Look up a single box.
    fn get_box(&self, id: BoxId) -> Option<BoxAnnotation>;

    /// Class list ordered by id.
    fn classes(&self) -> Vec<ClassDef>;
}
