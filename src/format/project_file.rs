//! Typed project file crossing the persistence boundary.
//!
//! Every entity is a strict serde type with `deny_unknown_fields`, so payloads
//! of unexpected shape are rejected while deserializing instead of being
//! trusted.
//!
//! ```json
//! {
//!   "version": 1,
//!   "name": "street-scenes",
//!   "created_at": 1760000000000,
//!   "updated_at": 1760000000000,
//!   "images": [{ "id": 1, "name": "a.jpg", "width": 640, "height": 480, ... }],
//!   "classes": [{ "id": 0, "name": "car", "color": [255, 0, 0] }],
//!   "boxes": [{ "id": 1, "image_id": 1, "class_id": 0, "x": 10.0, ... }]
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::format::error::FormatError;
use crate::model::{BoxAnnotation, ClassDef, ImageRecord, Timestamp};

/// Serialized form of a whole project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectFile {
    pub version: u32,
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    #[serde(default)]
    pub images: Vec<ImageRecord>,
    #[serde(default)]
    pub classes: Vec<ClassDef>,
    #[serde(default)]
    pub boxes: Vec<BoxAnnotation>,
}

impl ProjectFile {
    /// Version written by this build.
    pub const CURRENT_VERSION: u32 = 1;

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, FormatError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize and check the version.
    pub fn from_json(json: &str) -> Result<Self, FormatError> {
        let file: Self = serde_json::from_str(json)?;
        if file.version != Self::CURRENT_VERSION {
            return Err(FormatError::UnsupportedVersion {
                expected: Self::CURRENT_VERSION,
                found: file.version,
            });
        }
        Ok(file)
    }
}
