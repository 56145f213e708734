//! Select-mode move and resize of an existing box.

use crate::constants::SIZE_EPSILON;
use crate::geometry::{Point, Rect, clamp, clamp_rect_position};
use crate::model::BoxId;

/// One of the eight resize anchors around a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handle {
    NorthWest,
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
}

impl Handle {
    pub const ALL: [Handle; 8] = [
        Handle::NorthWest,
        Handle::North,
        Handle::NorthEast,
        Handle::East,
        Handle::SouthEast,
        Handle::South,
        Handle::SouthWest,
        Handle::West,
    ];

    /// Anchor position on `rect`.
    pub fn position(&self, rect: &Rect) -> Point {
        let cx = rect.x + rect.w / 2.0;
        let cy = rect.y + rect.h / 2.0;
        match self {
            Handle::NorthWest => Point::new(rect.x, rect.y),
            Handle::North => Point::new(cx, rect.y),
            Handle::NorthEast => Point::new(rect.right(), rect.y),
            Handle::East => Point::new(rect.right(), cy),
            Handle::SouthEast => Point::new(rect.right(), rect.bottom()),
            Handle::South => Point::new(cx, rect.bottom()),
            Handle::SouthWest => Point::new(rect.x, rect.bottom()),
            Handle::West => Point::new(rect.x, cy),
        }
    }

    fn moves_left(&self) -> bool {
        matches!(self, Handle::NorthWest | Handle::West | Handle::SouthWest)
    }

    fn moves_right(&self) -> bool {
        matches!(self, Handle::NorthEast | Handle::East | Handle::SouthEast)
    }

    fn moves_top(&self) -> bool {
        matches!(self, Handle::NorthWest | Handle::North | Handle::NorthEast)
    }

    fn moves_bottom(&self) -> bool {
        matches!(self, Handle::SouthWest | Handle::South | Handle::SouthEast)
    }
}

/// Closest handle of `rect` within `radius` of `point`, all in image space.
pub fn hit_test_handle(rect: &Rect, point: Point, radius: f64) -> Option<Handle> {
    Handle::ALL
        .iter()
        .map(|h| (*h, h.position(rect).distance_to(&point)))
        .filter(|(_, d)| *d <= radius)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(h, _)| h)
}

/// What a drag on a box changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    Move,
    Resize(Handle),
}

/// Select-mode edit state.
///
/// A press on a box first becomes `PotentialDrag`; it only turns into an
/// edit once the pointer travels far enough, so a plain click never nudges
/// the box.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum EditState {
    #[default]
    Idle,
    PotentialDrag {
        box_id: BoxId,
        kind: EditKind,
        /// Press position in screen space.
        start_screen: Point,
        /// Press position in image space.
        start: Point,
        original: Rect,
    },
    Dragging {
        box_id: BoxId,
        kind: EditKind,
        start: Point,
        original: Rect,
    },
}

impl EditState {
    pub fn is_editing(&self) -> bool {
        matches!(self, EditState::Dragging { .. })
    }

    pub fn box_id(&self) -> Option<BoxId> {
        match self {
            EditState::Idle => None,
            EditState::PotentialDrag { box_id, .. } | EditState::Dragging { box_id, .. } => {
                Some(*box_id)
            }
        }
    }
}

/// Translate `original` by the pointer delta and keep it fully inside the image.
pub fn apply_move(original: &Rect, start: Point, current: Point, image_w: f64, image_h: f64) -> Rect {
    let moved = original.translated(current.x - start.x, current.y - start.y);
    clamp_rect_position(moved, image_w, image_h)
}

/// Move the edges controlled by `handle` by the pointer delta.
///
/// Edges are clamped to the image. Returns `None` when the result would be
/// smaller than `min_size` on either axis, so the caller keeps the old rect.
pub fn apply_resize(
    original: &Rect,
    handle: Handle,
    start: Point,
    current: Point,
    image_w: f64,
    image_h: f64,
    min_size: f64,
) -> Option<Rect> {
    let dx = current.x - start.x;
    let dy = current.y - start.y;

    let mut left = original.x;
    let mut top = original.y;
    let mut right = original.right();
    let mut bottom = original.bottom();

    if handle.moves_left() {
        left = clamp(left + dx, 0.0, image_w);
    }
    if handle.moves_right() {
        right = clamp(right + dx, 0.0, image_w);
    }
    if handle.moves_top() {
        top = clamp(top + dy, 0.0, image_h);
    }
    if handle.moves_bottom() {
        bottom = clamp(bottom + dy, 0.0, image_h);
    }

    let rect = Rect::new(left, top, right - left, bottom - top);
    if rect.w < min_size - SIZE_EPSILON || rect.h < min_size - SIZE_EPSILON {
        return None;
    }
    Some(rect)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn approx_rect(a: Rect, b: Rect) -> bool {
        (a.x - b.x).abs() < EPSILON
            && (a.y - b.y).abs() < EPSILON
            && (a.w - b.w).abs() < EPSILON
            && (a.h - b.h).abs() < EPSILON
    }

    #[test]
    fn test_hit_test_handle_prefers_closest() {
        let rect = Rect::new(10.0, 10.0, 4.0, 40.0);
        // N and NE are both in range; the closer one wins
        assert_eq!(
            hit_test_handle(&rect, Point::new(13.5, 10.0), 5.0),
            Some(Handle::NorthEast)
        );
        assert_eq!(
            hit_test_handle(&rect, Point::new(12.0, 50.0), 1.0),
            Some(Handle::South)
        );
        assert_eq!(hit_test_handle(&rect, Point::new(12.0, 30.0), 1.0), None);
    }

    #[test]
    fn test_move_clamps_inside_image() {
        let original = Rect::new(10.0, 10.0, 20.0, 20.0);
        let moved = apply_move(
            &original,
            Point::new(0.0, 0.0),
            Point::new(500.0, -500.0),
            100.0,
            100.0,
        );
        assert!(approx_rect(moved, Rect::new(80.0, 0.0, 20.0, 20.0)));
    }

    #[test]
    fn test_resize_each_axis() {
        let original = Rect::new(10.0, 10.0, 20.0, 20.0);
        let start = Point::new(0.0, 0.0);
        let delta = Point::new(5.0, 7.0);

        let se = apply_resize(&original, Handle::SouthEast, start, delta, 100.0, 100.0, 5.0);
        assert!(approx_rect(se.unwrap(), Rect::new(10.0, 10.0, 25.0, 27.0)));

        let nw = apply_resize(&original, Handle::NorthWest, start, delta, 100.0, 100.0, 5.0);
        assert!(approx_rect(nw.unwrap(), Rect::new(15.0, 17.0, 15.0, 13.0)));

        // Edge handles only move their own axis
        let east = apply_resize(&original, Handle::East, start, delta, 100.0, 100.0, 5.0);
        assert!(approx_rect(east.unwrap(), Rect::new(10.0, 10.0, 25.0, 20.0)));
        let north = apply_resize(&original, Handle::North, start, delta, 100.0, 100.0, 5.0);
        assert!(approx_rect(north.unwrap(), Rect::new(10.0, 17.0, 20.0, 13.0)));
    }

    #[test]
    fn test_resize_clamps_to_image() {
        let original = Rect::new(10.0, 10.0, 20.0, 20.0);
        let rect = apply_resize(
            &original,
            Handle::NorthWest,
            Point::new(0.0, 0.0),
            Point::new(-100.0, -100.0),
            100.0,
            100.0,
            5.0,
        )
        .unwrap();
        assert!(approx_rect(rect, Rect::new(0.0, 0.0, 30.0, 30.0)));

        let rect = apply_resize(
            &original,
            Handle::SouthEast,
            Point::new(0.0, 0.0),
            Point::new(500.0, 500.0),
            100.0,
            100.0,
            5.0,
        )
        .unwrap();
        assert!(approx_rect(rect, Rect::new(10.0, 10.0, 90.0, 90.0)));
    }

    #[test]
    fn test_resize_below_minimum_rejected() {
        let original = Rect::new(10.0, 10.0, 20.0, 20.0);
        let start = Point::new(0.0, 0.0);
        assert_eq!(
            apply_resize(&original, Handle::East, start, Point::new(-16.0, 0.0), 100.0, 100.0, 5.0),
            None
        );
        // Dragging past the opposite edge never flips the box
        assert_eq!(
            apply_resize(&original, Handle::West, start, Point::new(40.0, 0.0), 100.0, 100.0, 5.0),
            None
        );
        assert!(
            apply_resize(&original, Handle::East, start, Point::new(-15.0, 0.0), 100.0, 100.0, 5.0)
                .is_some()
        );
    }
}
