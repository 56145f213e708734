//! Geometry primitives shared by the canvas, the codecs and dataset statistics.
//!
//! All functions here are total: degenerate rectangles (zero or negative
//! width/height) never panic and report zero overlap.

use serde::{Deserialize, Serialize};

/// A 2D point. Whether it lives in image or screen space depends on context.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// An axis-aligned rectangle defined by its top-left corner and size.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Axis-aligned bounding rectangle of two corner points.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            w: (b.x - a.x).abs(),
            h: (b.y - a.y).abs(),
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    pub fn area(&self) -> f64 {
        if self.is_degenerate() {
            0.0
        } else {
            self.w * self.h
        }
    }

    /// True when the rectangle has no positive extent on some axis.
    pub fn is_degenerate(&self) -> bool {
        !(self.w > 0.0 && self.h > 0.0)
    }

    /// Check if a point lies inside the rectangle (edges inclusive).
    pub fn contains(&self, point: &Point) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }

    /// Check if `other` lies entirely within this rectangle.
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Same rectangle with its top-left corner moved by `(dx, dy)`.
    pub fn translated(&self, dx: f64, dy: f64) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.w, self.h)
    }
}

/// Constrain `value` to `[min, max]`.
///
/// Unlike `f64::clamp` this never panics when `min > max`; `min` wins.
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    if value > max {
        max.max(min)
    } else if value < min {
        min
    } else {
        value
    }
}

/// Linear interpolation between `a` and `b`.
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Separating-axis overlap test for axis-aligned rectangles.
///
/// Touching edges do not count as an intersection, and degenerate
/// rectangles never intersect anything.
pub fn rects_intersect(r1: &Rect, r2: &Rect) -> bool {
    if r1.is_degenerate() || r2.is_degenerate() {
        return false;
    }
    !(r1.right() <= r2.x || r2.right() <= r1.x || r1.bottom() <= r2.y || r2.bottom() <= r1.y)
}

/// Area of the overlap rectangle, or 0 when the rectangles do not intersect.
pub fn intersection_area(r1: &Rect, r2: &Rect) -> f64 {
    if !rects_intersect(r1, r2) {
        return 0.0;
    }
    let w = r1.right().min(r2.right()) - r1.x.max(r2.x);
    let h = r1.bottom().min(r2.bottom()) - r1.y.max(r2.y);
    (w.max(0.0)) * (h.max(0.0))
}

/// Intersection over union, 0 for disjoint or degenerate rectangles.
pub fn iou(r1: &Rect, r2: &Rect) -> f64 {
    let inter = intersection_area(r1, r2);
    if inter <= 0.0 {
        return 0.0;
    }
    let union = r1.area() + r2.area() - inter;
    if union <= 0.0 { 0.0 } else { inter / union }
}

/// Clamp a point into `[0, width] x [0, height]`.
pub fn clamp_point(point: Point, width: f64, height: f64) -> Point {
    Point::new(clamp(point.x, 0.0, width), clamp(point.y, 0.0, height))
}

/// Shift a rectangle so it lies inside `[0, width] x [0, height]` without resizing it.
///
/// A rectangle larger than the bounds is first shrunk to fit.
pub fn clamp_rect_position(rect: Rect, width: f64, height: f64) -> Rect {
    let w = clamp(rect.w, 0.0, width);
    let h = clamp(rect.h, 0.0, height);
    Rect::new(
        clamp(rect.x, 0.0, width - w),
        clamp(rect.y, 0.0, height - h),
        w,
        h,
    )
}

/// Clip a rectangle to `[0, width] x [0, height]`: the origin is floored at 0
/// and the size is capped so the rectangle does not leave the bounds.
pub fn clip_rect(rect: Rect, width: f64, height: f64) -> Rect {
    let x = clamp(rect.x, 0.0, width);
    let y = clamp(rect.y, 0.0, height);
    let right = clamp(rect.right(), x, width);
    let bottom = clamp(rect.bottom(), y, height);
    Rect::new(x, y, right - x, bottom - y)
}
