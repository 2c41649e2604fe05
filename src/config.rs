// Configuration management
//
// Loads presenter configuration from a TOML file. Loading never writes:
// a missing or unreadable file just yields the defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::settings::DisplaySettings;

/// Default configuration file path
pub const DEFAULT_CONFIG_FILE: &str = "viewport.toml";

/// Presenter configuration
///
/// Stores the window, display, pacing and capture settings read at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresenterConfig {
    /// Window settings
    pub window: WindowSection,

    /// Display geometry settings
    pub display: DisplaySettings,

    /// Frame pacing settings
    pub pacing: PacingSection,

    /// Capture settings
    pub capture: CaptureSection,
}

/// Window configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowSection {
    /// Window title
    pub title: String,

    /// Initial window width in pixels
    pub width: u32,

    /// Initial window height in pixels
    pub height: u32,
}

/// Frame pacing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PacingSection {
    /// Display FPS cap (0 disables the cap)
    pub max_fps: f32,

    /// Throttle presentation to the window's refresh rate
    pub throttle: bool,
}

/// Capture configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureSection {
    /// Directory screenshots are written to
    pub directory: PathBuf,

    /// Image file extension (png, jpg, tga or bmp)
    pub extension: String,

    /// Compress and write on the capture worker thread
    pub compress_on_thread: bool,
}

impl Default for PresenterConfig {
    fn default() -> Self {
        PresenterConfig {
            window: WindowSection {
                title: "viewport".to_string(),
                width: 960,
                height: 720,
            },
            display: DisplaySettings::default(),
            pacing: PacingSection {
                max_fps: 0.0,
                throttle: true,
            },
            capture: CaptureSection {
                directory: PathBuf::from("screenshots"),
                extension: "png".to_string(),
                compress_on_thread: true,
            },
        }
    }
}

impl PresenterConfig {
    /// Load configuration from a file, falling back to defaults
    ///
    /// Logs a warning and returns the defaults when the file is missing
    /// or malformed. The file is never created or rewritten.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_else(|err| {
            log::warn!(
                "Could not load config from '{}' ({}), using defaults",
                path.display(),
                err
            );
            Self::default()
        })
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, io::Error> {
        let contents = fs::read_to_string(path)?;
        toml::from_str(&contents).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}
