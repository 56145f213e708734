//! Configuration file support.
//!
//! Settings are stored as versioned JSON. Missing fields fall back to their
//! defaults so older files keep loading after new options are added.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::keybindings::KeyBindings;
use crate::viewport::ZoomLimits;

/// Log level setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    pub fn name(&self) -> &'static str {
        match self {
            LogLevel::Error => "Error",
            LogLevel::Warn => "Warn",
            LogLevel::Info => "Info",
            LogLevel::Debug => "Debug",
            LogLevel::Trace => "Trace",
        }
    }

    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Current configuration file format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Pointer and zoom tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Minimum width and height of a committed box, in image pixels.
    pub min_box_size: f64,
    /// Resize handle hit radius, in screen pixels.
    pub handle_hit_radius: f64,
    pub wheel_zoom_step: f64,
    pub max_scale: f64,
    pub min_scale_fraction: f64,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            min_box_size: constants::MIN_BOX_SIZE,
            handle_hit_radius: constants::HANDLE_HIT_RADIUS,
            wheel_zoom_step: constants::WHEEL_ZOOM_STEP,
            max_scale: constants::MAX_SCALE,
            min_scale_fraction: constants::MIN_SCALE_FRACTION,
        }
    }
}

impl InteractionConfig {
    /// Reject values that would break the viewport or the size rules.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks = [
            ("min_box_size", self.min_box_size, 0.0),
            ("handle_hit_radius", self.handle_hit_radius, 0.0),
            ("wheel_zoom_step", self.wheel_zoom_step, 1.0),
            ("max_scale", self.max_scale, 0.0),
            ("min_scale_fraction", self.min_scale_fraction, 0.0),
        ];
        for (field, value, above) in checks {
            if !value.is_finite() || value <= above {
                return Err(ConfigError::InvalidValue { field, value });
            }
        }
        Ok(())
    }

    pub fn zoom_limits(&self) -> ZoomLimits {
        ZoomLimits {
            max_scale: self.max_scale,
            min_scale_fraction: self.min_scale_fraction,
        }
    }
}

/// How boxes flagged hidden are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase", tag = "mode")]
pub enum HiddenBoxes {
    /// Not drawn at all.
    #[default]
    Skip,
    /// Drawn at reduced opacity.
    Fade { opacity: f32 },
}

impl HiddenBoxes {
    /// Fade at the default hidden-box opacity.
    pub fn fade() -> Self {
        HiddenBoxes::Fade {
            opacity: constants::render::HIDDEN_FADE_OPACITY,
        }
    }
}

/// Box and label metrics, in screen pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderingConfig {
    pub hidden_boxes: HiddenBoxes,
    pub stroke_width: f64,
    pub selected_stroke_width: f64,
    pub label_char_width: f64,
    pub label_padding: f64,
    pub label_height: f64,
    pub handle_size: f64,
}

impl Default for RenderingConfig {
    fn default() -> Self {
        Self {
            hidden_boxes: HiddenBoxes::Skip,
            stroke_width: constants::render::STROKE_WIDTH,
            selected_stroke_width: constants::render::SELECTED_STROKE_WIDTH,
            label_char_width: constants::render::LABEL_CHAR_WIDTH,
            label_padding: constants::render::LABEL_PADDING,
            label_height: constants::render::LABEL_HEIGHT,
            handle_size: constants::render::HANDLE_SIZE,
        }
    }
}

/// Canvas configuration that can be exported and imported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasConfig {
    /// Version of the configuration file format
    pub version: u32,
    #[serde(default)]
    pub interaction: InteractionConfig,
    #[serde(default)]
    pub rendering: RenderingConfig,
    #[serde(default)]
    pub keybindings: KeyBindings,
    #[serde(default)]
    pub log_level: LogLevel,
}

impl CanvasConfig {
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            interaction: InteractionConfig::default(),
            rendering: RenderingConfig::default(),
            keybindings: KeyBindings::default(),
            log_level: LogLevel::default(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize configuration from JSON, rejecting newer format versions.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;

        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                file_version: config.version,
                supported_version: CONFIG_VERSION,
            });
        }
        config.interaction.validate()?;

        Ok(config)
    }

    pub fn default_filename() -> &'static str {
        "boxlabel-config.json"
    }

    /// Default config file location, falling back to `~/.config` when the
    /// platform config directory is unknown.
    pub fn default_path() -> Option<PathBuf> {
        if let Some(config_dir) = dirs::config_dir() {
            Some(config_dir.join("boxlabel").join(Self::default_filename()))
        } else {
            dirs::home_dir().map(|home| {
                home.join(".config")
                    .join("boxlabel")
                    .join(Self::default_filename())
            })
        }
    }

    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Load from the default path. Returns None if the file is missing or unreadable.
    pub fn load_from_default_path() -> Option<Self> {
        let path = Self::default_path()?;
        if !path.exists() {
            log::debug!("No config file found at {:?}", path);
            return None;
        }
        match Self::load_from_path(&path) {
            Ok(config) => Some(config),
            Err(e) => {
                log::warn!("Failed to load config file {:?}: {}", path, e);
                None
            }
        }
    }

    /// Write the configuration, creating parent directories if needed.
    pub fn save_to_path(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_json()?)?;
        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }

    pub fn save_to_default_path(&self) -> Result<(), ConfigError> {
        let path = Self::default_path().ok_or_else(|| {
            ConfigError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "Could not determine config directory",
            ))
        })?;
        self.save_to_path(&path)
    }
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// JSON parsing error
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Configuration version is newer than supported
    #[error(
        "Configuration file version {file_version} is newer than supported version {supported_version}"
    )]
    VersionTooNew {
        file_version: u32,
        supported_version: u32,
    },

    /// A numeric setting is out of its valid range
    #[error("Invalid value {value} for {field}")]
    InvalidValue { field: &'static str, value: f64 },

    /// I/O error when reading/writing config
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
