//! Annotation canvas interaction state machine.
//!
//! [`Canvas`] turns pointer, wheel and keyboard input into store mutations
//! and viewport changes. It owns no annotation data: every box it reads or
//! writes goes through the injected [`AnnotationStore`]. Every handler
//! returns the [`CanvasEvent`]s it produced so the host can re-render and
//! schedule persistence.
//!
//! ## Modes
//!
//! - **Select**: click a box to select it, drag it to move, drag one of its
//!   eight handles to resize, click the background to clear the selection.
//! - **Draw**: drag on the background to draw a new box with the active class.
//! - **Pan**: drag to move the viewport. Entered while the pan key is held.
//!
//! Input is ignored until an image has been decoded and the viewport fitted.

mod drawing;
mod edit;
mod load;
mod render;
mod tool;


pub use drawing::{DrawingState, meets_min_size};
pub use edit::{EditKind, EditState, Handle, apply_move, apply_resize, hit_test_handle};
pub use load::LoadState;
pub use render::{BoxDraw, FrameContent, LabelDraw, RenderFrame};
pub use tool::{ToolMode, ToolState};

use crate::config::CanvasConfig;
use crate::constants::MIN_DRAG_DISTANCE;
use crate::decode::{DecodeOutcome, LoadTicket};
use crate::geometry::{Point, Rect};
use crate::keybindings::{Key, KeyAction};
use crate::model::{BoxAnnotation, BoxId, BoxPatch, ClassId, ImageId};
use crate::store::AnnotationStore;
use crate::viewport::Viewport;

/// Why a drawn box was not committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardReason {
    /// Smaller than the minimum size on at least one axis.
    TooSmall,
    /// No class exists to label the box with.
    NoClass,
    /// The store refused the box.
    Rejected,
}

/// Observable outcome of one input event.
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasEvent {
    BoxCreated { id: BoxId, rect: Rect },
    BoxDiscarded { rect: Rect, reason: DiscardReason },
    BoxUpdated { id: BoxId, rect: Rect },
    BoxDeleted { id: BoxId },
    SelectionChanged { selected: Option<BoxId> },
    ModeChanged { mode: ToolMode },
    ActiveClassChanged { class_id: ClassId },
    ViewportChanged,
    ImageReady { image_id: ImageId, width: u32, height: u32 },
    LoadFailed { image_id: ImageId, message: String },
}

/// Interactive annotation surface for one image at a time.
pub struct Canvas<S: AnnotationStore> {
    store: S,
    config: CanvasConfig,
    viewport: Viewport,
    tool: ToolState,
    drawing: DrawingState,
    edit: EditState,
    /// Last pointer position of a pan drag, in screen space.
    pan_anchor: Option<Point>,
    /// Pan key currently held.
    pan_held: bool,
    load: LoadState,
    next_ticket: u64,
    text_input_focused: bool,
}

impl<S: AnnotationStore> Canvas<S> {
    pub fn new(store: S, config: CanvasConfig) -> Self {
        let viewport = Viewport::identity().with_limits(config.interaction.zoom_limits());
        Self {
            store,
            config,
            viewport,
            tool: ToolState::default(),
            drawing: DrawingState::Idle,
            edit: EditState::Idle,
            pan_anchor: None,
            pan_held: false,
            load: LoadState::Empty,
            next_ticket: 0,
            text_input_focused: false,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn tool_state(&self) -> &ToolState {
        &self.tool
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load
    }

    pub fn drawing_state(&self) -> &DrawingState {
        &self.drawing
    }

    pub fn edit_state(&self) -> &EditState {
        &self.edit
    }

    /// Suppress keyboard shortcuts while a text field has focus.
    pub fn set_text_input_focused(&mut self, focused: bool) {
        self.text_input_focused = focused;
    }

    /// Record the rendering surface size without refitting.
    pub fn set_container_size(&mut self, width: f64, height: f64) {
        self.viewport.set_container_size(width, height);
    }

    // ========================================================================
    // Load lifecycle
    // ========================================================================

    /// Start loading `image_id`, superseding any load in flight.
    ///
    /// The viewport and all gesture state are reset; pointer input stays
    /// disabled until [`Self::resolve_load`] accepts this ticket.
    pub fn begin_load(&mut self, image_id: ImageId) -> LoadTicket {
        self.next_ticket += 1;
        let ticket = LoadTicket(self.next_ticket);
        let (width, height) = (self.viewport.width, self.viewport.height);
        self.viewport = Viewport::identity().with_limits(self.config.interaction.zoom_limits());
        self.viewport.set_container_size(width, height);
        self.drawing = DrawingState::Idle;
        self.edit = EditState::Idle;
        self.pan_anchor = None;
        self.tool.selected = None;
        self.tool.is_drawing = false;
        self.load = LoadState::Loading { ticket, image_id };
        log::debug!("Loading {} ({})", image_id, ticket);
        ticket
    }

    /// Accept a decode outcome from the background decoder.
    pub fn complete_load(&mut self, outcome: &DecodeOutcome) -> Vec<CanvasEvent> {
        let result = match &outcome.result {
            Ok(image) => Ok((image.width, image.height)),
            Err(e) => Err(e.to_string()),
        };
        self.resolve_load(outcome.ticket, result)
    }

    /// Finish the load identified by `ticket` with the decoded size or an error.
    ///
    /// Outcomes for any other ticket are stale and ignored.
    pub fn resolve_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<(u32, u32), String>,
    ) -> Vec<CanvasEvent> {
        let image_id = match &self.load {
            LoadState::Loading {
                ticket: current,
                image_id,
            } if *current == ticket => *image_id,
            _ => {
                log::debug!("Ignoring stale decode result for {}", ticket);
                return Vec::new();
            }
        };

        let result = result.and_then(|(w, h)| {
            if w == 0 || h == 0 {
                Err(format!("image has zero dimensions ({}x{})", w, h))
            } else {
                Ok((w, h))
            }
        });

        match result {
            Ok((width, height)) => {
                self.viewport.fit_to_container(
                    width as f64,
                    height as f64,
                    self.viewport.width,
                    self.viewport.height,
                );
                self.load = LoadState::Ready {
                    ticket,
                    image_id,
                    width,
                    height,
                };
                log::info!("{} ready ({}x{})", image_id, width, height);
                vec![
                    CanvasEvent::ImageReady {
                        image_id,
                        width,
                        height,
                    },
                    CanvasEvent::ViewportChanged,
                ]
            }
            Err(message) => {
                log::warn!("Failed to load {}: {}", image_id, message);
                self.load = LoadState::Failed {
                    ticket,
                    image_id,
                    message: message.clone(),
                };
                vec![CanvasEvent::LoadFailed { image_id, message }]
            }
        }
    }

    /// Re-fit the current image to the container.
    pub fn fit_to_view(&mut self) -> Vec<CanvasEvent> {
        let Some((_, w, h)) = self.load.ready_image() else {
            return Vec::new();
        };
        self.viewport
            .fit_to_container(w, h, self.viewport.width, self.viewport.height);
        vec![CanvasEvent::ViewportChanged]
    }

    // ========================================================================
    // Tool state
    // ========================================================================

    /// Switch mode. Any pending draw is cancelled and any edit ends.
    pub fn set_mode(&mut self, mode: ToolMode) -> Vec<CanvasEvent> {
        if self.tool.mode == mode {
            return Vec::new();
        }
        if self.drawing.is_drawing() {
            log::debug!("Cancelled pending draw on mode change");
        }
        self.drawing = DrawingState::Idle;
        self.tool.is_drawing = false;
        self.edit = EditState::Idle;
        self.pan_anchor = None;
        log::debug!("Mode: {} -> {}", self.tool.mode.name(), mode.name());
        self.tool.mode = mode;
        vec![CanvasEvent::ModeChanged { mode }]
    }

    /// Select a box, or clear the selection with `None`.
    pub fn select(&mut self, id: Option<BoxId>) -> Vec<CanvasEvent> {
        let id = id.filter(|id| self.store.get_box(*id).is_some());
        if self.tool.selected == id {
            return Vec::new();
        }
        self.tool.selected = id;
        match id {
            Some(id) => log::debug!("Selected {}", id),
            None => log::debug!("Selection cleared"),
        }
        vec![CanvasEvent::SelectionChanged { selected: id }]
    }

    /// Make `class_id` the class for new boxes, if it exists.
    pub fn set_active_class(&mut self, class_id: ClassId) -> Vec<CanvasEvent> {
        if !self.store.classes().iter().any(|c| c.id == class_id) {
            log::warn!("set_active_class: class {} does not exist", class_id);
            return Vec::new();
        }
        if self.tool.active_class == Some(class_id) {
            return Vec::new();
        }
        self.tool.active_class = Some(class_id);
        log::debug!("Active class: {}", class_id);
        vec![CanvasEvent::ActiveClassChanged { class_id }]
    }

    /// The active class if it still exists, else the first class.
    fn class_for_new_box(&self) -> Option<ClassId> {
        let classes = self.store.classes();
        self.tool
            .active_class
            .filter(|id| classes.iter().any(|c| c.id == *id))
            .or_else(|| classes.first().map(|c| c.id))
    }

    /// Topmost interactive box of the current image under an image-space point.
    fn box_at(&self, image_id: ImageId, point: Point) -> Option<BoxAnnotation> {
        self.store
            .list_boxes_for_image(image_id)
            .into_iter()
            .rev()
            .find(|b| b.is_interactive() && b.rect().contains(&point))
    }

    // ========================================================================
    // Pointer input
    // ========================================================================

    pub fn pointer_down(&mut self, sx: f64, sy: f64) -> Vec<CanvasEvent> {
        let Some((image_id, w, h)) = self.load.ready_image() else {
            return Vec::new();
        };
        let point = self.viewport.screen_to_image(sx, sy);

        match self.tool.mode {
            ToolMode::Pan => {
                self.pan_anchor = Some(Point::new(sx, sy));
                Vec::new()
            }
            ToolMode::Draw => {
                if self.box_at(image_id, point).is_some() {
                    return Vec::new();
                }
                self.drawing = DrawingState::start(point, w, h);
                self.tool.is_drawing = true;
                log::trace!("Draw started at ({:.1}, {:.1})", point.x, point.y);
                Vec::new()
            }
            ToolMode::Select => self.select_pointer_down(image_id, Point::new(sx, sy), point),
        }
    }

    fn select_pointer_down(
        &mut self,
        image_id: ImageId,
        screen: Point,
        point: Point,
    ) -> Vec<CanvasEvent> {
        let radius = self.config.interaction.handle_hit_radius / self.viewport.scale;

        // Handles of the selected box take precedence over any box body
        let selected_handle = self
            .tool
            .selected
            .and_then(|id| self.store.get_box(id))
            .filter(|b| b.image_id == image_id && b.is_interactive())
            .and_then(|b| hit_test_handle(&b.rect(), point, radius).map(|h| (b, h)));

        if let Some((b, handle)) = selected_handle {
            log::debug!("Potential resize of {} via {:?}", b.id, handle);
            self.edit = EditState::PotentialDrag {
                box_id: b.id,
                kind: EditKind::Resize(handle),
                start_screen: screen,
                start: point,
                original: b.rect(),
            };
            return Vec::new();
        }

        match self.box_at(image_id, point) {
            Some(b) => {
                self.edit = EditState::PotentialDrag {
                    box_id: b.id,
                    kind: EditKind::Move,
                    start_screen: screen,
                    start: point,
                    original: b.rect(),
                };
                self.select(Some(b.id))
            }
            None => {
                self.edit = EditState::Idle;
                self.select(None)
            }
        }
    }

    pub fn pointer_move(&mut self, sx: f64, sy: f64) -> Vec<CanvasEvent> {
        let Some((_, w, h)) = self.load.ready_image() else {
            return Vec::new();
        };

        if let Some(anchor) = self.pan_anchor {
            self.viewport.pan_by(sx - anchor.x, sy - anchor.y);
            self.pan_anchor = Some(Point::new(sx, sy));
            return vec![CanvasEvent::ViewportChanged];
        }

        let point = self.viewport.screen_to_image(sx, sy);
        if self.drawing.is_drawing() {
            self.drawing.update(point, w, h);
            return Vec::new();
        }

        if let EditState::PotentialDrag {
            box_id,
            kind,
            start_screen,
            start,
            original,
        } = self.edit
        {
            if start_screen.distance_to(&Point::new(sx, sy)) < MIN_DRAG_DISTANCE {
                return Vec::new();
            }
            log::debug!("Started {:?} of {}", kind, box_id);
            self.edit = EditState::Dragging {
                box_id,
                kind,
                start,
                original,
            };
        }

        let EditState::Dragging {
            box_id,
            kind,
            start,
            original,
        } = self.edit
        else {
            return Vec::new();
        };

        let rect = match kind {
            EditKind::Move => Some(apply_move(&original, start, point, w, h)),
            EditKind::Resize(handle) => apply_resize(
                &original,
                handle,
                start,
                point,
                w,
                h,
                self.config.interaction.min_box_size,
            ),
        };
        let Some(rect) = rect else {
            log::trace!("Resize of {} below minimum size rejected", box_id);
            return Vec::new();
        };
        if self.store.get_box(box_id).is_none() {
            // Deleted under the gesture
            self.edit = EditState::Idle;
            return Vec::new();
        }
        self.store.update_box(box_id, BoxPatch::rect(rect));
        vec![CanvasEvent::BoxUpdated { id: box_id, rect }]
    }

    pub fn pointer_up(&mut self, sx: f64, sy: f64) -> Vec<CanvasEvent> {
        let Some((image_id, w, h)) = self.load.ready_image() else {
            return Vec::new();
        };

        if self.pan_anchor.take().is_some() {
            return Vec::new();
        }

        if self.drawing.is_drawing() {
            let point = self.viewport.screen_to_image(sx, sy);
            self.drawing.update(point, w, h);
            let candidate = self.drawing.candidate();
            self.drawing = DrawingState::Idle;
            self.tool.is_drawing = false;
            return match candidate {
                Some(rect) => self.commit_drawn_box(image_id, rect),
                None => Vec::new(),
            };
        }

        if self.edit.is_editing() {
            log::debug!("Finished editing {:?}", self.edit.box_id());
        }
        self.edit = EditState::Idle;
        Vec::new()
    }

    fn commit_drawn_box(&mut self, image_id: ImageId, rect: Rect) -> Vec<CanvasEvent> {
        if !meets_min_size(&rect, self.config.interaction.min_box_size) {
            log::debug!("Discarded {:.1}x{:.1} box: too small", rect.w, rect.h);
            return vec![CanvasEvent::BoxDiscarded {
                rect,
                reason: DiscardReason::TooSmall,
            }];
        }
        let Some(class_id) = self.class_for_new_box() else {
            log::warn!("Discarded box: no class defined");
            return vec![CanvasEvent::BoxDiscarded {
                rect,
                reason: DiscardReason::NoClass,
            }];
        };
        let Some(id) = self.store.create_box(rect, class_id, image_id) else {
            return vec![CanvasEvent::BoxDiscarded {
                rect,
                reason: DiscardReason::Rejected,
            }];
        };

        log::info!(
            "Created {} ({:.1}, {:.1}, {:.1}x{:.1}) class {}",
            id,
            rect.x,
            rect.y,
            rect.w,
            rect.h,
            class_id
        );
        let mut events = vec![CanvasEvent::BoxCreated { id, rect }];
        events.extend(self.select(Some(id)));
        events
    }

    /// Wheel zoom anchored at the pointer. Negative delta zooms in.
    pub fn wheel(&mut self, sx: f64, sy: f64, delta: f64) -> Vec<CanvasEvent> {
        if !self.load.is_ready() || delta == 0.0 {
            return Vec::new();
        }
        let step = self.config.interaction.wheel_zoom_step;
        let factor = if delta < 0.0 { step } else { 1.0 / step };
        self.viewport.zoom_at(sx, sy, factor);
        vec![CanvasEvent::ViewportChanged]
    }

    // ========================================================================
    // Keyboard input
    // ========================================================================

    pub fn key_down(&mut self, key: Key) -> Vec<CanvasEvent> {
        if self.text_input_focused {
            return Vec::new();
        }
        let Some(action) = self.config.keybindings.action_for_key(key) else {
            return Vec::new();
        };

        match action {
            KeyAction::DrawMode => self.set_mode(ToolMode::Draw),
            KeyAction::SelectMode => {
                let mut events = self.select(None);
                events.extend(self.set_mode(ToolMode::Select));
                events
            }
            KeyAction::DeleteSelected => self.delete_selected(),
            KeyAction::PanHold => {
                if self.pan_held {
                    return Vec::new();
                }
                self.pan_held = true;
                self.set_mode(ToolMode::Pan)
            }
            KeyAction::SelectClass(index) => match self.store.classes().get(index) {
                Some(class) => self.set_active_class(class.id),
                None => Vec::new(),
            },
        }
    }

    pub fn key_up(&mut self, key: Key) -> Vec<CanvasEvent> {
        if key == self.config.keybindings.pan_hold && self.pan_held {
            self.pan_held = false;
            return self.set_mode(ToolMode::Select);
        }
        Vec::new()
    }

    /// Delete the selected box and clear the selection.
    pub fn delete_selected(&mut self) -> Vec<CanvasEvent> {
        let Some(id) = self.tool.selected else {
            return Vec::new();
        };
        if self.edit.box_id() == Some(id) {
            self.edit = EditState::Idle;
        }
        self.tool.selected = None;
        if self.store.get_box(id).is_none() {
            return vec![CanvasEvent::SelectionChanged { selected: None }];
        }
        self.store.delete_box(id);
        log::info!("Deleted {}", id);
        vec![
            CanvasEvent::BoxDeleted { id },
            CanvasEvent::SelectionChanged { selected: None },
        ]
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    /// Describe the current frame in screen space.
    pub fn render(&self) -> RenderFrame {
        let (image_id, w, h) = match &self.load {
            LoadState::Empty => return RenderFrame::placeholder(FrameContent::Empty),
            LoadState::Loading { .. } => return RenderFrame::placeholder(FrameContent::Loading),
            LoadState::Failed { message, .. } => {
                return RenderFrame::placeholder(FrameContent::Failed {
                    message: message.clone(),
                });
            }
            LoadState::Ready {
                image_id,
                width,
                height,
                ..
            } => (*image_id, *width as f64, *height as f64),
        };

        let rendering = &self.config.rendering;
        let boxes = self.store.list_boxes_for_image(image_id);
        let draws = render::box_draws(
            &boxes,
            &self.store.classes(),
            self.tool.selected,
            &self.viewport,
            rendering,
        );

        let handles = draws
            .iter()
            .find(|d| d.selected)
            .map(|d| render::handle_squares(&d.screen_rect, rendering.handle_size))
            .unwrap_or_default();

        RenderFrame {
            content: FrameContent::Image {
                image_id,
                screen_rect: self.viewport.rect_to_screen(&Rect::new(0.0, 0.0, w, h)),
            },
            boxes: draws,
            preview: self
                .drawing
                .candidate()
                .map(|r| self.viewport.rect_to_screen(&r)),
            handles,
        }
    }
}
