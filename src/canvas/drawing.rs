//! Draw-mode gesture state.

use crate::constants::SIZE_EPSILON;
use crate::geometry::{Point, Rect, clamp_point};

/// State for a box currently being drawn, in image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DrawingState {
    /// Not currently drawing anything.
    #[default]
    Idle,
    /// Pointer is down; the candidate box spans both corners.
    Dragging { start: Point, current: Point },
}

impl DrawingState {
    /// Start a drag at `point`, clamped into the image.
    pub fn start(point: Point, image_w: f64, image_h: f64) -> Self {
        let start = clamp_point(point, image_w, image_h);
        DrawingState::Dragging {
            start,
            current: start,
        }
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self, DrawingState::Dragging { .. })
    }

    /// Move the free corner, clamped into the image.
    pub fn update(&mut self, point: Point, image_w: f64, image_h: f64) {
        if let DrawingState::Dragging { current, .. } = self {
            *current = clamp_point(point, image_w, image_h);
        }
    }

    /// Axis-aligned bounding box of the two corners.
    pub fn candidate(&self) -> Option<Rect> {
        match self {
            DrawingState::Idle => None,
            DrawingState::Dragging { start, current } => Some(Rect::from_corners(*start, *current)),
        }
    }
}

/// Whether a drawn rectangle is large enough to commit.
///
/// Both sides must reach `min_size` image pixels; the tolerance absorbs
/// float error from the screen-to-image conversion.
pub fn meets_min_size(rect: &Rect, min_size: f64) -> bool {
    rect.w >= min_size - SIZE_EPSILON && rect.h >= min_size - SIZE_EPSILON
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_normalizes_corners() {
        let mut state = DrawingState::start(Point::new(300.0, 220.0), 1000.0, 800.0);
        state.update(Point::new(100.0, 100.0), 1000.0, 800.0);
        assert_eq!(state.candidate(), Some(Rect::new(100.0, 100.0, 200.0, 120.0)));
    }

    #[test]
    fn test_corners_clamped_to_image() {
        let mut state = DrawingState::start(Point::new(-50.0, 10.0), 100.0, 100.0);
        state.update(Point::new(140.0, 120.0), 100.0, 100.0);
        assert_eq!(state.candidate(), Some(Rect::new(0.0, 10.0, 100.0, 90.0)));
    }

    #[test]
    fn test_min_size_boundary() {
        assert!(meets_min_size(&Rect::new(0.0, 0.0, 5.0, 5.0), 5.0));
        assert!(meets_min_size(&Rect::new(0.0, 0.0, 4.9999999, 5.0), 5.0));
        assert!(!meets_min_size(&Rect::new(0.0, 0.0, 4.0, 4.0), 5.0));
        assert!(!meets_min_size(&Rect::new(0.0, 0.0, 50.0, 4.0), 5.0));
    }
}
