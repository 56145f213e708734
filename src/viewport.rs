//! Image-space to screen-space mapping.
//!
//! The viewport is the single source of truth for the affine map
//! `screen = image * scale + translation` and its inverse. It is session-only
//! state and is recreated whenever a new image is loaded.

use crate::constants::{MAX_SCALE, MIN_SCALE_FRACTION};
use crate::geometry::{Point, Rect, clamp};

/// Limits applied to zoom operations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomLimits {
    /// Largest allowed scale.
    pub max_scale: f64,
    /// Smallest allowed scale as a fraction of the fit scale.
    pub min_scale_fraction: f64,
}

impl Default for ZoomLimits {
    fn default() -> Self {
        Self {
            max_scale: MAX_SCALE,
            min_scale_fraction: MIN_SCALE_FRACTION,
        }
    }
}

/// Pan/zoom state of the rendering surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub scale: f64,
    pub translate_x: f64,
    pub translate_y: f64,
    /// Rendering surface width in screen pixels.
    pub width: f64,
    /// Rendering surface height in screen pixels.
    pub height: f64,
    image_width: f64,
    image_height: f64,
    limits: ZoomLimits,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::identity()
    }
}

impl Viewport {
    /// Identity mapping with no container size.
    pub fn identity() -> Self {
        Self {
            scale: 1.0,
            translate_x: 0.0,
            translate_y: 0.0,
            width: 0.0,
            height: 0.0,
            image_width: 0.0,
            image_height: 0.0,
            limits: ZoomLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: ZoomLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn limits(&self) -> ZoomLimits {
        self.limits
    }

    /// Record a new container size. The mapping itself is left untouched.
    pub fn set_container_size(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    /// Map a screen position to image pixels.
    pub fn screen_to_image(&self, sx: f64, sy: f64) -> Point {
        Point::new(
            (sx - self.translate_x) / self.scale,
            (sy - self.translate_y) / self.scale,
        )
    }

    /// Map an image pixel position to the screen.
    pub fn image_to_screen(&self, ix: f64, iy: f64) -> Point {
        Point::new(
            ix * self.scale + self.translate_x,
            iy * self.scale + self.translate_y,
        )
    }

    /// Project an image-space rectangle onto the screen.
    pub fn rect_to_screen(&self, rect: &Rect) -> Rect {
        let origin = self.image_to_screen(rect.x, rect.y);
        Rect::new(origin.x, origin.y, rect.w * self.scale, rect.h * self.scale)
    }

    /// Scale that fits the image in the container, or 1 for zero-sized inputs.
    fn fit_scale(image_w: f64, image_h: f64, container_w: f64, container_h: f64) -> f64 {
        if image_w <= 0.0 || image_h <= 0.0 || container_w <= 0.0 || container_h <= 0.0 {
            return 1.0;
        }
        (container_w / image_w).min(container_h / image_h)
    }

    /// Fit the image inside the container and center it.
    ///
    /// The initial fit never upscales beyond 1:1.
    pub fn fit_to_container(
        &mut self,
        image_w: f64,
        image_h: f64,
        container_w: f64,
        container_h: f64,
    ) {
        self.image_width = image_w;
        self.image_height = image_h;
        self.width = container_w;
        self.height = container_h;
        self.scale = Self::fit_scale(image_w, image_h, container_w, container_h).min(1.0);
        self.translate_x = (container_w - image_w * self.scale) / 2.0;
        self.translate_y = (container_h - image_h * self.scale) / 2.0;
        log::debug!(
            "Viewport fit: image {}x{} in {}x{} -> scale {:.4}, translate ({:.1}, {:.1})",
            image_w,
            image_h,
            container_w,
            container_h,
            self.scale,
            self.translate_x,
            self.translate_y
        );
    }

    /// Smallest scale zoom operations may reach. Never above the maximum scale.
    pub fn min_scale(&self) -> f64 {
        let fitted = Self::fit_scale(self.image_width, self.image_height, self.width, self.height)
            * self.limits.min_scale_fraction;
        fitted.min(self.limits.max_scale)
    }

    /// Zoom by `scale_delta` keeping the image point under the pointer fixed.
    pub fn zoom_at(&mut self, pointer_x: f64, pointer_y: f64, scale_delta: f64) {
        if !scale_delta.is_finite() || scale_delta <= 0.0 {
            log::warn!("Ignoring zoom by non-positive factor {}", scale_delta);
            return;
        }
        let anchor = self.screen_to_image(pointer_x, pointer_y);
        let mut new_scale = clamp(
            self.scale * scale_delta,
            self.min_scale(),
            self.limits.max_scale,
        );
        // A fitted small image can sit below the minimum; zooming out must not enlarge it
        if scale_delta < 1.0 {
            new_scale = new_scale.min(self.scale);
        }
        self.scale = new_scale;
        self.translate_x = pointer_x - anchor.x * new_scale;
        self.translate_y = pointer_y - anchor.y * new_scale;
        log::trace!(
            "Zoom at ({:.1}, {:.1}): scale {:.4}, translate ({:.1}, {:.1})",
            pointer_x,
            pointer_y,
            self.scale,
            self.translate_x,
            self.translate_y
        );
    }

    /// Move the whole viewport by a raw screen-space delta.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.translate_x += dx;
        self.translate_y += dy;
    }
}
