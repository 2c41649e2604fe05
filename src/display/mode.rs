// Fullscreen mode strings - "<width>x<height>@<refresh>" parsing/formatting
//
// Modes travel through configuration as plain strings. The parser is
// whitespace tolerant and accepts its own Display output, so formatting a
// mode and parsing it back always succeeds.

use std::fmt;

/// A fullscreen video mode
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FullscreenMode {
    pub width: u32,
    pub height: u32,
    pub refresh_rate: f32,
}

impl FullscreenMode {
    pub fn new(width: u32, height: u32, refresh_rate: f32) -> Self {
        Self {
            width,
            height,
            refresh_rate,
        }
    }
}

impl fmt::Display for FullscreenMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} x {} @ {:.6} hz",
            self.width, self.height, self.refresh_rate
        )
    }
}

/// Parse a `"<width>x<height>@<refresh>"` mode string
///
/// Whitespace around the separators is ignored and a trailing `hz` suffix
/// on the rate is accepted. Malformed input returns `None`.
///
/// # Example
///
/// ```
/// use viewport_rs::display::parse_fullscreen_mode;
///
/// let mode = parse_fullscreen_mode("1920x1080@59.94").unwrap();
/// assert_eq!(mode.width, 1920);
/// assert_eq!(mode.height, 1080);
/// ```
pub fn parse_fullscreen_mode(mode: &str) -> Option<FullscreenMode> {
    let (width, rest) = mode.split_once('x')?;
    let (height, rate) = rest.split_once('@')?;

    let width = width.trim().parse::<u32>().ok()?;
    let height = height.trim().parse::<u32>().ok()?;

    let rate = rate.trim();
    let rate = rate
        .strip_suffix("hz")
        .or_else(|| rate.strip_suffix("Hz"))
        .or_else(|| rate.strip_suffix("HZ"))
        .unwrap_or(rate)
        .trim_end();
    let refresh_rate = rate.parse::<f32>().ok()?;

    Some(FullscreenMode::new(width, height, refresh_rate))
}
