//! Global constants for the boxlabel annotation core.

/// Minimum width and height (image pixels) of a committed or resized box.
pub const MIN_BOX_SIZE: f64 = 5.0;

/// Tolerance applied to size comparisons so screen-to-image rounding
/// does not reject a box that is exactly at the minimum size.
pub const SIZE_EPSILON: f64 = 1e-6;

/// Handle hit radius in screen pixels.
pub const HANDLE_HIT_RADIUS: f64 = 8.0;

/// Pointer travel (screen pixels) before a press on a box becomes a move or resize.
pub const MIN_DRAG_DISTANCE: f64 = 3.0;

/// Multiplicative zoom factor applied per wheel notch.
pub const WHEEL_ZOOM_STEP: f64 = 1.05;

/// Upper bound for the viewport scale.
pub const MAX_SCALE: f64 = 5.0;

/// Lower scale bound as a fraction of the fit-to-container scale.
pub const MIN_SCALE_FRACTION: f64 = 0.1;

/// Highest class id a project may hold. classes.txt writes one line per id up to the maximum.
pub const MAX_CLASS_ID: u32 = 65_535;

/// Rendering constants for boxes and their labels.
pub mod render {
    /// Stroke width of an unselected box (screen pixels).
    pub const STROKE_WIDTH: f64 = 2.0;
    /// Stroke width of the selected box (screen pixels).
    pub const SELECTED_STROKE_WIDTH: f64 = 3.0;
    /// Approximate advance of one label character (screen pixels).
    pub const LABEL_CHAR_WIDTH: f64 = 7.0;
    /// Horizontal padding on each side of the label text.
    pub const LABEL_PADDING: f64 = 4.0;
    /// Height of the label swatch.
    pub const LABEL_HEIGHT: f64 = 18.0;
    /// Side length of a selection handle square.
    pub const HANDLE_SIZE: f64 = 8.0;
    /// Opacity used for hidden boxes when fading is enabled.
    pub const HIDDEN_FADE_OPACITY: f32 = 0.25;
}
