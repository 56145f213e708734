//! boxlabel - bounding-box annotation core for YOLO datasets
//!
//! The crate holds everything between raw pointer input and YOLO text:
//! geometry, the image/screen viewport, the annotation canvas state
//! machine, the in-memory project store and the YOLO and classes.txt codecs.
//! Painting, file dialogs, uploads and archive packaging belong to the host.
//!
//! ```rust,ignore
//! use boxlabel::{Canvas, CanvasConfig, NewImage, ProjectStore, ToolMode};
//!
//! let mut store = ProjectStore::new("streets");
//! store.add_class("person");
//! let image = store.add_image(NewImage::new("a.jpg", 1000, 800, "blob:a"));
//!
//! let mut canvas = Canvas::new(store, CanvasConfig::default());
//! canvas.set_container_size(500.0, 400.0);
//! let ticket = canvas.begin_load(image);
//! canvas.resolve_load(ticket, Ok((1000, 800)));
//! canvas.set_mode(ToolMode::Draw);
//! canvas.pointer_down(50.0, 50.0);
//! canvas.pointer_up(150.0, 110.0);
//!
//! let export = canvas.store().export_yolo();
//! ```

pub mod canvas;
pub mod config;
pub mod constants;
pub mod decode;
pub mod format;
pub mod geometry;
pub mod keybindings;
pub mod logging;
pub mod model;
pub mod stats;
pub mod store;
pub mod viewport;

pub use canvas::{Canvas, CanvasEvent, DiscardReason, RenderFrame, ToolMode, ToolState};
pub use config::{CanvasConfig, ConfigError, LogLevel};
pub use decode::{DecodeError, DecoderThread, LoadTicket};
pub use format::{FormatError, ProjectFile, YoloLineError};
pub use geometry::{Point, Rect};
pub use keybindings::{Key, KeyBindings};
pub use logging::init_logging;
pub use model::{BoxAnnotation, BoxId, BoxPatch, ClassDef, ClassId, ImageId, ImageRecord};
pub use stats::DatasetStats;
pub use store::{AnnotationStore, NewImage, ProjectStore, SharedProjectStore};
pub use viewport::Viewport;
