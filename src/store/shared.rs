//! Lock-guarded store handle for hosts that persist from another thread.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::AnnotationStore;
use super::project::ProjectStore;
use super::snapshot::ProjectSnapshot;
use crate::geometry::Rect;
use crate::model::{BoxAnnotation, BoxId, BoxPatch, ClassDef, ClassId, ImageId};

/// Cloneable handle to one [`ProjectStore`].
///
/// Each mutation takes the write lock for its whole duration and
/// [`SharedProjectStore::snapshot`] copies under the read lock, so a
/// snapshot always observes whole mutations.
#[derive(Debug, Clone, Default)]
pub struct SharedProjectStore {
    inner: Arc<RwLock<ProjectStore>>,
}

impl SharedProjectStore {
    pub fn new(store: ProjectStore) -> Self {
        Self {
            inner: Arc::new(RwLock::new(store)),
        }
    }

    // A panic while holding the lock cannot leave a half-applied mutation
    // visible: every store method validates before it writes.
    fn read(&self) -> RwLockReadGuard<'_, ProjectStore> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ProjectStore> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run a read-only closure against the store.
    pub fn with<R>(&self, f: impl FnOnce(&ProjectStore) -> R) -> R {
        f(&self.read())
    }

    /// Run a mutating closure against the store as one atomic step.
    pub fn with_mut<R>(&self, f: impl FnOnce(&mut ProjectStore) -> R) -> R {
        f(&mut self.write())
    }

    pub fn revision(&self) -> u64 {
        self.read().revision()
    }

    pub fn snapshot(&self) -> ProjectSnapshot {
        self.read().snapshot()
    }
}

impl AnnotationStore for SharedProjectStore {
    fn create_box(&mut self, rect: Rect, class_id: ClassId, image_id: ImageId) -> Option<BoxId> {
        self.write().create_box(rect, class_id, image_id)
    }

    fn update_box(&mut self, id: BoxId, patch: BoxPatch) {
        self.write().update_box(id, patch);
    }

    fn delete_box(&mut self, id: BoxId) {
        self.write().delete_box(id);
    }

    fn list_boxes_for_image(&self, image_id: ImageId) -> Vec<BoxAnnotation> {
        self.read().list_boxes_for_image(image_id)
    }

    fn get_box(&self, id: BoxId) -> Option<BoxAnnotation> {
        self.read().get_box(id)
    }

    fn classes(&self) -> Vec<ClassDef> {
        self.read().classes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::NewImage;
    use std::thread;

    #[test]
    fn test_snapshot_sees_whole_mutations() {
        let shared = SharedProjectStore::default();
        let image = shared.with_mut(|store| {
            store.add_class("person");
            store.add_image(NewImage::new("a.jpg", 500, 500, "blob:a"))
        });

        let writer = {
            let mut handle = shared.clone();
            thread::spawn(move || {
                for i in 0..200 {
                    let x = (i % 400) as f64;
                    handle.create_box(Rect::new(x, x, 20.0, 20.0), 0, image);
                }
            })
        };
        for _ in 0..50 {
            let snapshot = shared.snapshot();
            let file = &snapshot.file;
            // Every captured box belongs to a captured image with consistent status
            assert!(file.boxes.iter().all(|b| b.image_id == image));
            let labeled = file.images[0].status == crate::model::ImageStatus::Labeled;
            assert_eq!(labeled, !file.boxes.is_empty());
        }
        writer.join().unwrap();

        assert_eq!(shared.with(|s| s.boxes().len()), 200);
    }
}
