//! Bounding-box annotation records.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{ClassId, ImageId};
use crate::geometry::Rect;

/// Unique identifier for a box annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoxId(pub u64);

impl fmt::Display for BoxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "box#{}", self.0)
    }
}

/// One rectangular annotation in image-pixel space.
///
/// A stored box always satisfies `0 <= x`, `0 <= y`, `x + w <= image width`,
/// `y + h <= image height` and `w, h > 0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BoxAnnotation {
    pub id: BoxId,
    /// Owning image.
    pub image_id: ImageId,
    /// Index into the project's class list.
    pub class_id: ClassId,
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    /// Locked boxes are excluded from interaction.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub locked: bool,
    /// Hidden boxes are excluded from rendering but retained.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub hidden: bool,
}

impl BoxAnnotation {
    pub fn new(id: BoxId, image_id: ImageId, class_id: ClassId, rect: Rect) -> Self {
        Self {
            id,
            image_id,
            class_id,
            x: rect.x,
            y: rect.y,
            w: rect.w,
            h: rect.h,
            locked: false,
            hidden: false,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.x = rect.x;
        self.y = rect.y;
        self.w = rect.w;
        self.h = rect.h;
    }

    /// Whether the canvas may select, move or resize this box.
    pub fn is_interactive(&self) -> bool {
        !self.locked && !self.hidden
    }
}

/// Partial update applied to a box. `None` fields are left unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoxPatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub w: Option<f64>,
    pub h: Option<f64>,
    pub class_id: Option<ClassId>,
    pub locked: Option<bool>,
    pub hidden: Option<bool>,
}

impl BoxPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Patch that replaces the whole rectangle.
    pub fn rect(rect: Rect) -> Self {
        Self {
            x: Some(rect.x),
            y: Some(rect.y),
            w: Some(rect.w),
            h: Some(rect.h),
            ..Self::default()
        }
    }

    pub fn with_class(mut self, class_id: ClassId) -> Self {
        self.class_id = Some(class_id);
        self
    }

    pub fn with_locked(mut self, locked: bool) -> Self {
        self.locked = Some(locked);
        self
    }

    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = Some(hidden);
        self
    }

    /// True when the patch touches the geometry.
    pub fn touches_rect(&self) -> bool {
        self.x.is_some() || self.y.is_some() || self.w.is_some() || self.h.is_some()
    }

    /// Rectangle obtained by applying this patch to `rect`.
    pub fn apply_to_rect(&self, rect: Rect) -> Rect {
        Rect::new(
            self.x.unwrap_or(rect.x),
            self.y.unwrap_or(rect.y),
            self.w.unwrap_or(rect.w),
            self.h.unwrap_or(rect.h),
        )
    }
}
