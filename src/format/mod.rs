//! Annotation text formats crossing the import/export boundary.
//!
//! ## Supported Formats
//!
//! - **YOLO TXT**: one normalized `class xc yc w h` line per box
//! - **classes.txt**: one class name per line, line number = class id
//! - **Project JSON**: strictly typed snapshot of a whole project
//!
//! ## Usage
//!
//! ```rust,ignore
//! use boxlabel::format::{image_to_yolo_text, parse_yolo_file};
//!
//! let text = image_to_yolo_text(&boxes, 1000, 800);
//! let report = parse_yolo_file(&text, 1000, 800)?;
//! assert!(report.is_clean());
//! ```

mod classes;
mod error;
mod project_file;
mod yolo;

#[cfg(test)]
mod tests;

pub use classes::{classes_to_text, parse_classes_text};
pub use error::{FormatError, YoloLineError};
pub use project_file::ProjectFile;
pub use yolo::{
    ParsedBox, YoloBox, YoloDiagnostic, YoloParseReport, image_to_yolo_text, parse_yolo_file,
    parse_yolo_line, to_yolo_line, validate_yolo_values,
};
