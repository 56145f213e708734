//! Data model: images, bounding boxes and class definitions.

mod annotation;
mod class_def;
mod image;

pub use annotation::{BoxAnnotation, BoxId, BoxPatch};
pub use class_def::{ClassDef, ClassId, Color, default_color};
pub use image::{ImageId, ImageRecord, ImageStatus, Provenance};

/// Milliseconds since the Unix epoch.
pub type Timestamp = u64;

/// Current wall-clock time as a [`Timestamp`].
pub fn now_millis() -> Timestamp {
    web_time::SystemTime::now()
        .duration_since(web_time::SystemTime::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
