//! In-memory project aggregate: images, boxes and classes.

use std::collections::HashSet;

use super::renumber::{ReorderError, renumber_classes};
use super::snapshot::ProjectSnapshot;
use super::AnnotationStore;
use crate::constants::MAX_CLASS_ID;
use crate::format::{
    FormatError, ProjectFile, YoloDiagnostic, YoloLineError, classes_to_text, image_to_yolo_text,
    parse_yolo_line,
};
use crate::geometry::{Rect, clip_rect};
use crate::model::{
    BoxAnnotation, BoxId, BoxPatch, ClassDef, ClassId, Color, ImageId, ImageRecord, ImageStatus,
    Provenance, Timestamp, now_millis,
};

/// Parameters for adding an image.
#[derive(Debug, Clone, PartialEq)]
pub struct NewImage {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub uri: String,
    pub provenance: Option<Provenance>,
}

impl NewImage {
    pub fn new(name: impl Into<String>, width: u32, height: u32, uri: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            uri: uri.into(),
            provenance: None,
        }
    }

    pub fn with_provenance(mut self, provenance: Provenance) -> Self {
        self.provenance = Some(provenance);
        self
    }
}

/// Texts produced for dataset export, ready for external packaging.
#[derive(Debug, Clone, PartialEq)]
pub struct YoloExport {
    pub classes_txt: String,
    /// One label file body per image, in image order.
    pub labels: Vec<(ImageId, String)>,
}

/// Outcome of importing one YOLO label file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct YoloImportSummary {
    pub created: Vec<BoxId>,
    pub diagnostics: Vec<YoloDiagnostic>,
}

/// The current project: owns ordered collections of images, boxes and classes.
#[derive(Debug, Clone)]
pub struct ProjectStore {
    name: String,
    created_at: Timestamp,
    updated_at: Timestamp,
    images: Vec<ImageRecord>,
    boxes: Vec<BoxAnnotation>,
    classes: Vec<ClassDef>,
    next_image_id: u64,
    next_box_id: u64,
    /// Incremented on every mutation.
    revision: u64,
}

impl ProjectStore {
    pub fn new(name: impl Into<String>) -> Self {
        let now = now_millis();
        Self {
            name: name.into(),
            created_at: now,
            updated_at: now,
            images: Vec::new(),
            boxes: Vec::new(),
            classes: Vec::new(),
            next_image_id: 1,
            next_box_id: 1,
            revision: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.touch();
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// Monotonic mutation counter, used to detect unsaved changes.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn images(&self) -> &[ImageRecord] {
        &self.images
    }

    pub fn boxes(&self) -> &[BoxAnnotation] {
        &self.boxes
    }

    pub fn class_list(&self) -> &[ClassDef] {
        &self.classes
    }

    pub fn image(&self, id: ImageId) -> Option<&ImageRecord> {
        self.images.iter().find(|i| i.id == id)
    }

    pub fn class(&self, id: ClassId) -> Option<&ClassDef> {
        self.classes.iter().find(|c| c.id == id)
    }

    fn touch(&mut self) {
        self.updated_at = now_millis();
        self.revision += 1;
    }

    /// Re-derive the status of one image from its box count.
    fn refresh_image_status(&mut self, image_id: ImageId) {
        let count = self.boxes.iter().filter(|b| b.image_id == image_id).count();
        let now = now_millis();
        if let Some(image) = self.images.iter_mut().find(|i| i.id == image_id) {
            image.status = ImageStatus::from_box_count(count);
            image.updated_at = now;
        }
    }

    // ========================================================================
    // Images
    // ========================================================================

    /// Add an image and return its id.
    pub fn add_image(&mut self, image: NewImage) -> ImageId {
        let id = ImageId(self.next_image_id);
        self.next_image_id += 1;
        let now = now_millis();
        log::debug!(
            "Adding {} '{}' ({}x{})",
            id,
            image.name,
            image.width,
            image.height
        );
        self.images.push(ImageRecord {
            id,
            name: image.name,
            width: image.width,
            height: image.height,
            uri: image.uri,
            status: ImageStatus::New,
            provenance: image.provenance,
            created_at: now,
            updated_at: now,
        });
        self.touch();
        id
    }

    /// Add several images at once, preserving order.
    pub fn add_images(&mut self, images: impl IntoIterator<Item = NewImage>) -> Vec<ImageId> {
        images.into_iter().map(|i| self.add_image(i)).collect()
    }

    /// Remove an image and every box that references it.
    pub fn remove_image(&mut self, id: ImageId) -> Option<ImageRecord> {
        let Some(pos) = self.images.iter().position(|i| i.id == id) else {
            log::warn!("remove_image: {} does not exist", id);
            return None;
        };
        let removed = self.images.remove(pos);
        let before = self.boxes.len();
        self.boxes.retain(|b| b.image_id != id);
        log::info!(
            "Removed {} and {} box(es)",
            id,
            before - self.boxes.len()
        );
        self.touch();
        Some(removed)
    }

    /// Derived lifecycle status of an image.
    pub fn image_status(&self, id: ImageId) -> Option<ImageStatus> {
        self.image(id)?;
        let count = self.boxes.iter().filter(|b| b.image_id == id).count();
        Some(ImageStatus::from_box_count(count))
    }

    // ========================================================================
    // Classes
    // ========================================================================

    /// Add a class with a generated color.
    ///
    /// Ids continue after the highest existing id. Once that reaches
    /// [`MAX_CLASS_ID`] the lowest free id is reused. Returns `None` when
    /// every id is taken.
    pub fn add_class(&mut self, name: impl Into<String>) -> Option<ClassId> {
        let Some(id) = self.next_class_id() else {
            log::warn!("add_class: no free class id below {}", MAX_CLASS_ID);
            return None;
        };
        self.classes.push(ClassDef::new(id, name));
        self.classes.sort_by_key(|c| c.id);
        self.touch();
        Some(id)
    }

    fn next_class_id(&self) -> Option<ClassId> {
        let Some(highest) = self.classes.iter().map(|c| c.id).max() else {
            return Some(0);
        };
        if let Some(next) = highest.checked_add(1)
            && next <= MAX_CLASS_ID
        {
            return Some(next);
        }
        let used: HashSet<ClassId> = self.classes.iter().map(|c| c.id).collect();
        (0..=MAX_CLASS_ID).find(|id| !used.contains(id))
    }

    pub fn add_class_with_color(
        &mut self,
        name: impl Into<String>,
        color: Color,
    ) -> Option<ClassId> {
        let id = self.add_class(name)?;
        self.set_class_color(id, color);
        Some(id)
    }

    pub fn rename_class(&mut self, id: ClassId, name: impl Into<String>) {
        match self.classes.iter_mut().find(|c| c.id == id) {
            Some(class) => {
                class.name = name.into();
                self.touch();
            }
            None => log::warn!("rename_class: class {} does not exist", id),
        }
    }

    pub fn set_class_color(&mut self, id: ClassId, color: Color) {
        match self.classes.iter_mut().find(|c| c.id == id) {
            Some(class) => {
                class.color = color;
                self.touch();
            }
            None => log::warn!("set_class_color: class {} does not exist", id),
        }
    }

    /// Delete a class and every box labeled with it. Remaining ids are kept.
    ///
    /// Returns the number of boxes removed.
    pub fn delete_class(&mut self, id: ClassId) -> usize {
        let Some(pos) = self.classes.iter().position(|c| c.id == id) else {
            log::warn!("delete_class: class {} does not exist", id);
            return 0;
        };
        self.classes.remove(pos);

        let affected: HashSet<ImageId> = self
            .boxes
            .iter()
            .filter(|b| b.class_id == id)
            .map(|b| b.image_id)
            .collect();
        let before = self.boxes.len();
        self.boxes.retain(|b| b.class_id != id);
        let removed = before - self.boxes.len();
        for image_id in affected {
            self.refresh_image_status(image_id);
        }
        log::info!("Deleted class {} and {} box(es)", id, removed);
        self.touch();
        removed
    }

    /// Reorder classes; ids become `0..N-1` in the new order and all boxes are relabeled.
    pub fn reorder_classes(&mut self, new_order: &[ClassId]) -> Result<(), ReorderError> {
        let renumbered = renumber_classes(&self.classes, new_order, &self.boxes)?;
        self.classes = renumbered.classes;
        self.boxes = renumbered.boxes;
        log::info!("Reordered {} classes", self.classes.len());
        self.touch();
        Ok(())
    }

    // ========================================================================
    // Boxes
    // ========================================================================

    pub fn boxes_for_image(&self, image_id: ImageId) -> impl Iterator<Item = &BoxAnnotation> {
        self.boxes.iter().filter(move |b| b.image_id == image_id)
    }

    fn image_bounds(&self, image_id: ImageId) -> Option<(f64, f64)> {
        self.image(image_id).map(|i| i.size())
    }

    // ========================================================================
    // Snapshots and persistence boundary
    // ========================================================================

    /// Serializable copy of the whole project.
    pub fn to_project_file(&self) -> ProjectFile {
        ProjectFile {
            version: ProjectFile::CURRENT_VERSION,
            name: self.name.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
            images: self.images.clone(),
            classes: self.classes.clone(),
            boxes: self.boxes.clone(),
        }
    }

    /// Full copy for the asynchronous persistence path.
    pub fn snapshot(&self) -> ProjectSnapshot {
        ProjectSnapshot {
            revision: self.revision,
            taken_at: now_millis(),
            file: self.to_project_file(),
        }
    }

    /// Rebuild a store from a project file, validating every reference.
    ///
    /// Boxes are clipped into their image; boxes left without area are dropped.
    pub fn from_project_file(file: ProjectFile) -> Result<Self, FormatError> {
        let mut image_ids = HashSet::new();
        for image in &file.images {
            if !image_ids.insert(image.id) {
                return Err(FormatError::DuplicateId(image.id.to_string()));
            }
            if !image.has_valid_dimensions() {
                return Err(FormatError::InvalidDimensions {
                    width: image.width,
                    height: image.height,
                });
            }
        }

        let mut class_ids = HashSet::new();
        for class in &file.classes {
            if class.id > MAX_CLASS_ID {
                return Err(FormatError::ClassIdOutOfRange {
                    id: class.id,
                    max: MAX_CLASS_ID,
                });
            }
            if !class_ids.insert(class.id) {
                return Err(FormatError::DuplicateId(format!("class {}", class.id)));
            }
        }

        let mut box_ids = HashSet::new();
        let mut boxes = Vec::with_capacity(file.boxes.len());
        for mut b in file.boxes {
            if !box_ids.insert(b.id) {
                return Err(FormatError::DuplicateId(b.id.to_string()));
            }
            let image = file
                .images
                .iter()
                .find(|i| i.id == b.image_id)
                .ok_or(FormatError::ImageNotFound(b.image_id))?;
            if !class_ids.contains(&b.class_id) {
                return Err(FormatError::ClassNotFound(b.class_id));
            }
            let (w, h) = image.size();
            let clipped = clip_rect(b.rect(), w, h);
            if clipped.is_degenerate() {
                log::warn!("Dropping {}: no area inside {}", b.id, image.id);
                continue;
            }
            b.set_rect(clipped);
            boxes.push(b);
        }

        let mut classes = file.classes;
        classes.sort_by_key(|c| c.id);

        let mut store = Self {
            name: file.name,
            created_at: file.created_at,
            updated_at: file.updated_at,
            next_image_id: image_ids.iter().map(|i| i.0 + 1).max().unwrap_or(1),
            next_box_id: box_ids.iter().map(|b| b.0 + 1).max().unwrap_or(1),
            images: file.images,
            boxes,
            classes,
            revision: 0,
        };
        for image in &mut store.images {
            let count = store.boxes.iter().filter(|b| b.image_id == image.id).count();
            image.status = ImageStatus::from_box_count(count);
        }
        log::info!(
            "Loaded project '{}': {} images, {} boxes, {} classes",
            store.name,
            store.images.len(),
            store.boxes.len(),
            store.classes.len()
        );
        Ok(store)
    }

    // ========================================================================
    // YOLO import/export
    // ========================================================================

    /// Produce `classes.txt` and one label text per image.
    ///
    /// Hidden boxes are exported; visibility is a display concern only.
    pub fn export_yolo(&self) -> YoloExport {
        let labels = self
            .images
            .iter()
            .map(|image| {
                let boxes: Vec<BoxAnnotation> = self.boxes_for_image(image.id).cloned().collect();
                (image.id, image_to_yolo_text(&boxes, image.width, image.height))
            })
            .collect();
        log::info!(
            "Exported YOLO labels for {} images ({} boxes)",
            self.images.len(),
            self.boxes.len()
        );
        YoloExport {
            classes_txt: classes_to_text(&self.classes),
            labels,
        }
    }

    /// Parse a label file for one image and add its valid boxes.
    ///
    /// Malformed lines and lines naming an unknown class are skipped with a diagnostic.
    pub fn import_yolo_labels(
        &mut self,
        image_id: ImageId,
        content: &str,
    ) -> Result<YoloImportSummary, FormatError> {
        let image = self
            .image(image_id)
            .ok_or(FormatError::ImageNotFound(image_id))?;
        let (width, height) = (image.width, image.height);
        if !image.has_valid_dimensions() {
            return Err(FormatError::InvalidDimensions { width, height });
        }

        let mut summary = YoloImportSummary::default();
        for (idx, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let parsed = parse_yolo_line(line, width, height).and_then(|parsed| {
                match self.class(parsed.class_id) {
                    Some(_) => Ok(parsed),
                    None => Err(YoloLineError::UnknownClass(parsed.class_id)),
                }
            });
            match parsed {
                Ok(parsed) => {
                    if let Some(id) = self.create_box(parsed.rect, parsed.class_id, image_id) {
                        summary.created.push(id);
                    }
                }
                Err(error) => {
                    log::warn!("Skipping YOLO line {}: {} ({:?})", idx + 1, error, line);
                    summary.diagnostics.push(YoloDiagnostic {
                        line: idx + 1,
                        content: line.to_string(),
                        error,
                    });
                }
            }
        }
        log::info!(
            "Imported {} box(es) into {} ({} diagnostics)",
            summary.created.len(),
            image_id,
            summary.diagnostics.len()
        );
        Ok(summary)
    }
}

impl Default for ProjectStore {
    fn default() -> Self {
        Self::new("Untitled")
    }
}

impl AnnotationStore for ProjectStore {
    fn create_box(&mut self, rect: Rect, class_id: ClassId, image_id: ImageId) -> Option<BoxId> {
        let Some((w, h)) = self.image_bounds(image_id) else {
            log::warn!("create_box: {} does not exist", image_id);
            return None;
        };
        if self.class(class_id).is_none() {
            log::warn!("create_box: class {} does not exist", class_id);
            return None;
        }
        let rect = clip_rect(rect, w, h);
        if rect.is_degenerate() {
            log::warn!("create_box: rectangle has no area inside {}", image_id);
            return None;
        }

        let id = BoxId(self.next_box_id);
        self.next_box_id += 1;
        self.boxes
            .push(BoxAnnotation::new(id, image_id, class_id, rect));
        self.refresh_image_status(image_id);
        self.touch();
        log::debug!("Created {} on {} (class {})", id, image_id, class_id);
        Some(id)
    }

    fn update_box(&mut self, id: BoxId, patch: BoxPatch) {
        let Some(pos) = self.boxes.iter().position(|b| b.id == id) else {
            log::warn!("update_box: {} does not exist", id);
            return;
        };
        let image_id = self.boxes[pos].image_id;
        let bounds = self.image_bounds(image_id);
        let class_ok = patch.class_id.map(|c| self.class(c).is_some());

        let target = &mut self.boxes[pos];
        if patch.touches_rect() {
            let requested = patch.apply_to_rect(target.rect());
            let clipped = match bounds {
                Some((w, h)) => clip_rect(requested, w, h),
                None => requested,
            };
            if clipped.is_degenerate() {
                log::debug!("update_box: rejected degenerate rectangle for {}", id);
            } else {
                target.set_rect(clipped);
            }
        }
        match (patch.class_id, class_ok) {
            (Some(class_id), Some(true)) => target.class_id = class_id,
            (Some(class_id), _) => {
                log::warn!("update_box: class {} does not exist", class_id)
            }
            (None, _) => {}
        }
        if let Some(locked) = patch.locked {
            target.locked = locked;
        }
        if let Some(hidden) = patch.hidden {
            target.hidden = hidden;
        }
        self.touch();
    }

    fn delete_box(&mut self, id: BoxId) {
        let Some(pos) = self.boxes.iter().position(|b| b.id == id) else {
            log::warn!("delete_box: {} does not exist", id);
            return;
        };
        let removed = self.boxes.remove(pos);
        self.refresh_image_status(removed.image_id);
        self.touch();
        log::debug!("Deleted {}", id);
    }

    fn list_boxes_for_image(&self, image_id: ImageId) -> Vec<BoxAnnotation> {
        self.boxes_for_image(image_id).cloned().collect()
    }

    fn get_box(&self, id: BoxId) -> Option<BoxAnnotation> {
        self.boxes.iter().find(|b| b.id == id).cloned()
    }

    fn classes(&self) -> Vec<ClassDef> {
        self.classes.clone()
    }
}
