//! Error types for annotation format operations.

use thiserror::Error;

use crate::model::{ClassId, ImageId};

/// Errors that abort a whole format operation.
#[derive(Error, Debug)]
pub enum FormatError {
    /// JSON parsing or serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Image dimensions are required but not positive
    #[error("Invalid image dimensions {width}x{height}")]
    InvalidDimensions {
        /// Image width in pixels
        width: u32,
        /// Image height in pixels
        height: u32,
    },

    /// Project file was written by an incompatible version
    #[error("Unsupported project file version {found} (expected {expected})")]
    UnsupportedVersion {
        /// Version this build reads
        expected: u32,
        /// Version found in the file
        found: u32,
    },

    /// Referenced image does not exist
    #[error("Image not found: {0}")]
    ImageNotFound(ImageId),

    /// Class ID referenced but not defined
    #[error("Class not found: {0}")]
    ClassNotFound(ClassId),

    /// Class id above the supported maximum
    #[error("Class id {id} exceeds the maximum of {max}")]
    ClassIdOutOfRange {
        /// Offending id
        id: ClassId,
        /// Highest accepted id
        max: ClassId,
    },

    /// Two entities share an identifier
    #[error("Duplicate identifier: {0}")]
    DuplicateId(String),
}

/// Why a single YOLO label line was rejected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum YoloLineError {
    /// The line does not have exactly five fields
    #[error("expected 5 fields, found {found}")]
    FieldCount {
        /// Number of whitespace-separated fields on the line
        found: usize,
    },

    /// The class id is not a non-negative integer
    #[error("invalid class id '{token}'")]
    InvalidClassId {
        /// Offending token
        token: String,
    },

    /// A coordinate field is not a number
    #[error("invalid {field} '{token}'")]
    InvalidNumber {
        /// Field name
        field: &'static str,
        /// Offending token
        token: String,
    },

    /// A coordinate field is outside [0, 1]
    #[error("{field} {value} is outside [0, 1]")]
    OutOfRange {
        /// Field name
        field: &'static str,
        /// Parsed value
        value: f64,
    },

    /// The box has no area once mapped into the image
    #[error("box has no area inside the image")]
    Degenerate,

    /// The class id is not part of the project
    #[error("unknown class id {0}")]
    UnknownClass(ClassId),
}
