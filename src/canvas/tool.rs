//! Session-only tool state.

use crate::model::{BoxId, ClassId};

/// Interaction mode of the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolMode {
    #[default]
    Select,
    Draw,
    Pan,
}

impl ToolMode {
    pub fn name(&self) -> &'static str {
        match self {
            ToolMode::Select => "Select",
            ToolMode::Draw => "Draw",
            ToolMode::Pan => "Pan",
        }
    }
}

/// Current mode, selection and active class. Never persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolState {
    pub mode: ToolMode,
    pub selected: Option<BoxId>,
    /// Class assigned to newly drawn boxes.
    pub active_class: Option<ClassId>,
    /// True between pointer-down and pointer-up of a draw gesture.
    pub is_drawing: bool,
}
