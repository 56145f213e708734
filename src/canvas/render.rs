//! Screen-space draw list produced by the canvas.
//!
//! The canvas does not paint. It describes each frame as plain data in
//! screen pixels and the host's renderer draws it.

use crate::config::{HiddenBoxes, RenderingConfig};
use crate::geometry::Rect;
use crate::model::{BoxAnnotation, BoxId, ClassDef, Color, ImageId, default_color};
use crate::viewport::Viewport;

use super::edit::Handle;

/// What occupies the canvas background.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameContent {
    /// No image requested.
    Empty,
    /// Placeholder while the image decodes.
    Loading,
    /// Placeholder with the decode error.
    Failed { message: String },
    /// The image drawn at `screen_rect`.
    Image { image_id: ImageId, screen_rect: Rect },
}

/// Class label swatch drawn above a box.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelDraw {
    pub text: String,
    pub rect: Rect,
}

/// One box to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxDraw {
    pub id: BoxId,
    pub screen_rect: Rect,
    pub color: Color,
    pub stroke_width: f64,
    /// 1.0 unless the box is hidden and fading is enabled.
    pub opacity: f32,
    pub selected: bool,
    pub label: LabelDraw,
}

/// Everything needed to draw one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub content: FrameContent,
    /// Boxes in render order; later entries are drawn on top.
    pub boxes: Vec<BoxDraw>,
    /// Rubber-band rectangle of a draw in progress.
    pub preview: Option<Rect>,
    /// Resize handle squares of the selected box.
    pub handles: Vec<Rect>,
}

impl RenderFrame {
    pub fn placeholder(content: FrameContent) -> Self {
        Self {
            content,
            boxes: Vec::new(),
            preview: None,
            handles: Vec::new(),
        }
    }
}

/// Label swatch sized to the class name, sitting just above the box.
pub(crate) fn label_for(text: String, screen_rect: &Rect, config: &RenderingConfig) -> LabelDraw {
    let width = text.chars().count() as f64 * config.label_char_width + 2.0 * config.label_padding;
    let rect = Rect::new(
        screen_rect.x,
        screen_rect.y - config.label_height,
        width,
        config.label_height,
    );
    LabelDraw { text, rect }
}

/// Project the boxes of one image into draw commands.
pub(crate) fn box_draws(
    boxes: &[BoxAnnotation],
    classes: &[ClassDef],
    selected: Option<BoxId>,
    viewport: &Viewport,
    config: &RenderingConfig,
) -> Vec<BoxDraw> {
    boxes
        .iter()
        .filter_map(|b| {
            let opacity = match (b.hidden, config.hidden_boxes) {
                (false, _) => 1.0,
                (true, HiddenBoxes::Skip) => return None,
                (true, HiddenBoxes::Fade { opacity }) => opacity,
            };
            let is_selected = selected == Some(b.id);
            let screen_rect = viewport.rect_to_screen(&b.rect());
            let (name, color) = match classes.iter().find(|c| c.id == b.class_id) {
                Some(class) => (class.name.clone(), class.color),
                None => (format!("#{}", b.class_id), default_color(b.class_id)),
            };
            Some(BoxDraw {
                id: b.id,
                label: label_for(name, &screen_rect, config),
                screen_rect,
                color,
                stroke_width: if is_selected {
                    config.selected_stroke_width
                } else {
                    config.stroke_width
                },
                opacity,
                selected: is_selected,
            })
        })
        .collect()
}

/// Handle squares centered on the eight anchors of a screen rect.
pub(crate) fn handle_squares(screen_rect: &Rect, size: f64) -> Vec<Rect> {
    Handle::ALL
        .iter()
        .map(|h| {
            let p = h.position(screen_rect);
            Rect::new(p.x - size / 2.0, p.y - size / 2.0, size, size)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ImageId;

    fn boxes() -> Vec<BoxAnnotation> {
        let mut hidden = BoxAnnotation::new(BoxId(2), ImageId(1), 0, Rect::new(50.0, 50.0, 10.0, 10.0));
        hidden.hidden = true;
        vec![
            BoxAnnotation::new(BoxId(1), ImageId(1), 0, Rect::new(10.0, 20.0, 30.0, 40.0)),
            hidden,
            BoxAnnotation::new(BoxId(3), ImageId(1), 7, Rect::new(0.0, 0.0, 10.0, 10.0)),
        ]
    }

    #[test]
    fn test_hidden_boxes_skipped_by_default() {
        let classes = vec![ClassDef::new(0, "dog")];
        let mut viewport = Viewport::identity();
        viewport.scale = 2.0;
        let draws = box_draws(&boxes(), &classes, Some(BoxId(1)), &viewport, &RenderingConfig::default());

        let ids: Vec<_> = draws.iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![BoxId(1), BoxId(3)]);

        let first = &draws[0];
        assert_eq!(first.screen_rect, Rect::new(20.0, 40.0, 60.0, 80.0));
        assert_eq!(first.stroke_width, 3.0);
        assert_eq!(first.color, classes[0].color);
        // "dog": 3 chars * 7 + 2 * 4 padding, placed just above the box
        assert_eq!(first.label.rect, Rect::new(20.0, 22.0, 29.0, 18.0));

        assert_eq!(draws[1].stroke_width, 2.0);
        assert_eq!(draws[1].label.text, "#7");
    }

    #[test]
    fn test_hidden_boxes_fade_when_configured() {
        let config = RenderingConfig {
            hidden_boxes: HiddenBoxes::Fade { opacity: 0.25 },
            ..RenderingConfig::default()
        };
        let draws = box_draws(&boxes(), &[], None, &Viewport::identity(), &config);
        assert_eq!(draws.len(), 3);
        assert_eq!(draws[1].opacity, 0.25);
        assert_eq!(draws[0].opacity, 1.0);
    }

    #[test]
    fn test_handle_squares() {
        let squares = handle_squares(&Rect::new(0.0, 0.0, 100.0, 50.0), 8.0);
        assert_eq!(squares.len(), 8);
        assert_eq!(squares[0], Rect::new(-4.0, -4.0, 8.0, 8.0));
        assert_eq!(squares[4], Rect::new(96.0, 46.0, 8.0, 8.0));
    }
}
