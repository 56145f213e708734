//! YOLO TXT codec.
//!
//! Each label line has the form
//!
//! ```text
//! <class_id> <x_center> <y_center> <width> <height>
//! ```
//!
//! with the four numeric fields normalized to `[0, 1]` relative to the image
//! size and written with exactly six decimals. Boxes are converted to and
//! from pixel space here; packaging label files into a dataset archive is
//! the caller's job.

use crate::format::error::{FormatError, YoloLineError};
use crate::geometry::{Rect, clamp, clip_rect};
use crate::model::{BoxAnnotation, ClassId};

/// A box in normalized YOLO coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YoloBox {
    pub class_id: ClassId,
    pub x_center: f64,
    pub y_center: f64,
    pub width: f64,
    pub height: f64,
}

impl YoloBox {
    /// Normalize a pixel-space rectangle. Returns `None` for non-positive image dimensions.
    pub fn from_pixel_rect(class_id: ClassId, rect: Rect, image_w: u32, image_h: u32) -> Option<Self> {
        if image_w == 0 || image_h == 0 {
            return None;
        }
        let (iw, ih) = (image_w as f64, image_h as f64);
        Some(Self {
            class_id,
            x_center: unit((rect.x + rect.w / 2.0) / iw),
            y_center: unit((rect.y + rect.h / 2.0) / ih),
            width: unit(rect.w / iw),
            height: unit(rect.h / ih),
        })
    }

    /// Convert back to pixels, clipped so the box stays inside the image.
    pub fn to_pixel_rect(&self, image_w: u32, image_h: u32) -> Rect {
        let (iw, ih) = (image_w as f64, image_h as f64);
        let w = self.width * iw;
        let h = self.height * ih;
        let x = self.x_center * iw - w / 2.0;
        let y = self.y_center * ih - h / 2.0;
        clip_rect(Rect::new(x, y, w, h), iw, ih)
    }

    /// Serialize as a single label line (no trailing newline).
    pub fn to_line(&self) -> String {
        format!(
            "{} {:.6} {:.6} {:.6} {:.6}",
            self.class_id, self.x_center, self.y_center, self.width, self.height
        )
    }
}

/// Clamp to `[0, 1]`, folding `-0.0` into `0.0` so it never prints with a sign.
fn unit(value: f64) -> f64 {
    clamp(value, 0.0, 1.0) + 0.0
}

/// Check that the four normalized fields lie in `[0, 1]`.
pub fn validate_yolo_values(
    x_center: f64,
    y_center: f64,
    width: f64,
    height: f64,
) -> Result<(), YoloLineError> {
    for (field, value) in [
        ("x_center", x_center),
        ("y_center", y_center),
        ("width", width),
        ("height", height),
    ] {
        if !(0.0..=1.0).contains(&value) {
            return Err(YoloLineError::OutOfRange { field, value });
        }
    }
    Ok(())
}

/// Serialize one box as a YOLO line. Empty for non-positive image dimensions.
pub fn to_yolo_line(annotation: &BoxAnnotation, image_w: u32, image_h: u32) -> String {
    YoloBox::from_pixel_rect(annotation.class_id, annotation.rect(), image_w, image_h)
        .map(|b| b.to_line())
        .unwrap_or_default()
}

/// Serialize all boxes of one image as a label file body.
///
/// Lines are joined with `\n` without a trailing newline; an empty box list
/// or invalid dimensions yield an empty string.
pub fn image_to_yolo_text(boxes: &[BoxAnnotation], image_w: u32, image_h: u32) -> String {
    if image_w == 0 || image_h == 0 {
        return String::new();
    }
    boxes
        .iter()
        .map(|b| to_yolo_line(b, image_w, image_h))
        .collect::<Vec<_>>()
        .join("\n")
}

/// A label line converted back to pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParsedBox {
    pub class_id: ClassId,
    pub rect: Rect,
}

/// Parse one label line against the image size.
pub fn parse_yolo_line(line: &str, image_w: u32, image_h: u32) -> Result<ParsedBox, YoloLineError> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() != 5 {
        return Err(YoloLineError::FieldCount { found: parts.len() });
    }

    let class_id: ClassId = parts[0]
        .parse()
        .map_err(|_| YoloLineError::InvalidClassId {
            token: parts[0].to_string(),
        })?;

    let number = |field: &'static str, token: &str| -> Result<f64, YoloLineError> {
        token.parse::<f64>().map_err(|_| YoloLineError::InvalidNumber {
            field,
            token: token.to_string(),
        })
    };
    let x_center = number("x_center", parts[1])?;
    let y_center = number("y_center", parts[2])?;
    let width = number("width", parts[3])?;
    let height = number("height", parts[4])?;
    validate_yolo_values(x_center, y_center, width, height)?;

    let yolo = YoloBox {
        class_id,
        x_center,
        y_center,
        width,
        height,
    };
    let rect = yolo.to_pixel_rect(image_w, image_h);
    if rect.is_degenerate() {
        return Err(YoloLineError::Degenerate);
    }
    Ok(ParsedBox { class_id, rect })
}

/// A rejected line and the reason.
#[derive(Debug, Clone, PartialEq)]
pub struct YoloDiagnostic {
    /// 1-based line number.
    pub line: usize,
    pub content: String,
    pub error: YoloLineError,
}

/// Result of parsing a label file: the valid boxes plus one diagnostic per skipped line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct YoloParseReport {
    pub boxes: Vec<ParsedBox>,
    pub diagnostics: Vec<YoloDiagnostic>,
}

impl YoloParseReport {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Parse a whole label file. Malformed lines are skipped with a diagnostic;
/// blank lines are ignored.
pub fn parse_yolo_file(
    content: &str,
    image_w: u32,
    image_h: u32,
) -> Result<YoloParseReport, FormatError> {
    if image_w == 0 || image_h == 0 {
        return Err(FormatError::InvalidDimensions {
            width: image_w,
            height: image_h,
        });
    }

    let mut report = YoloParseReport::default();
    for (idx, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match parse_yolo_line(line, image_w, image_h) {
            Ok(parsed) => report.boxes.push(parsed),
            Err(error) => {
                log::warn!("Skipping YOLO line {}: {} ({:?})", idx + 1, error, line);
                report.diagnostics.push(YoloDiagnostic {
                    line: idx + 1,
                    content: line.to_string(),
                    error,
                });
            }
        }
    }

    log::debug!(
        "Parsed YOLO label file: {} boxes, {} skipped lines",
        report.boxes.len(),
        report.diagnostics.len()
    );
    Ok(report)
}
