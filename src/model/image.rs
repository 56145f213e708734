//! Annotatable image records.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Timestamp;

/// Unique identifier for an image within a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageId(pub u64);

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "image#{}", self.0)
    }
}

/// Lifecycle status, derived from whether the image owns any box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageStatus {
    #[default]
    New,
    Labeled,
}

impl ImageStatus {
    pub fn from_box_count(count: usize) -> Self {
        if count > 0 {
            ImageStatus::Labeled
        } else {
            ImageStatus::New
        }
    }
}

/// Where an image came from when it was derived from another document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Provenance {
    /// Name of the source document (e.g. a multi-page PDF).
    pub source_name: String,
    /// 1-based page number within the source.
    pub page: u32,
    pub page_count: u32,
}

/// One annotatable raster image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImageRecord {
    pub id: ImageId,
    pub name: String,
    pub width: u32,
    pub height: u32,
    /// Resolved source URI (remote or local blob), decided by the caller.
    pub uri: String,
    #[serde(default)]
    pub status: ImageStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provenance: Option<Provenance>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ImageRecord {
    /// Pixel dimensions as floats, for geometry.
    pub fn size(&self) -> (f64, f64) {
        (self.width as f64, self.height as f64)
    }

    pub fn has_valid_dimensions(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}
