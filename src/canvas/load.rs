//! Image load lifecycle of the canvas.

use crate::decode::LoadTicket;
use crate::model::ImageId;

/// Where the canvas is in loading its current image.
///
/// Pointer input is only handled in [`LoadState::Ready`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    /// No image requested yet.
    #[default]
    Empty,
    /// Waiting for the decode of `image_id`.
    Loading { ticket: LoadTicket, image_id: ImageId },
    /// Decoded and fitted; interaction is live.
    Ready {
        ticket: LoadTicket,
        image_id: ImageId,
        width: u32,
        height: u32,
    },
    /// Decode failed. Terminal until another image is loaded.
    Failed {
        ticket: LoadTicket,
        image_id: ImageId,
        message: String,
    },
}

impl LoadState {
    pub fn ticket(&self) -> Option<LoadTicket> {
        match self {
            LoadState::Empty => None,
            LoadState::Loading { ticket, .. }
            | LoadState::Ready { ticket, .. }
            | LoadState::Failed { ticket, .. } => Some(*ticket),
        }
    }

    pub fn image_id(&self) -> Option<ImageId> {
        match self {
            LoadState::Empty => None,
            LoadState::Loading { image_id, .. }
            | LoadState::Ready { image_id, .. }
            | LoadState::Failed { image_id, .. } => Some(*image_id),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, LoadState::Ready { .. })
    }

    /// Image id and size when ready.
    pub fn ready_image(&self) -> Option<(ImageId, f64, f64)> {
        match self {
            LoadState::Ready {
                image_id,
                width,
                height,
                ..
            } => Some((*image_id, *width as f64, *height as f64)),
            _ => None,
        }
    }
}
