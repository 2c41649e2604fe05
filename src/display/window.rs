// Window info - surface size, DPI scale and refresh rate snapshot
//
// A plain value struct describing the output surface. The demo fills it
// from winit window state; tests construct it directly.

/// Properties of the output surface that geometry is computed against
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowInfo {
    /// Surface width in pixels
    pub surface_width: u32,
    /// Surface height in pixels
    pub surface_height: u32,
    /// DPI scale factor (1.0 = 96 dpi)
    pub surface_scale: f32,
    /// Display refresh rate in Hz, when the platform reports one
    pub surface_refresh_rate: Option<f32>,
}

impl WindowInfo {
    /// Create window info with the given surface size
    ///
    /// Default: 1.0 scale, unknown refresh rate
    pub fn new(surface_width: u32, surface_height: u32) -> Self {
        Self {
            surface_width,
            surface_height,
            surface_scale: 1.0,
            surface_refresh_rate: None,
        }
    }

    /// Set the DPI scale factor
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.surface_scale = scale;
        self
    }

    /// Set the reported refresh rate
    pub fn with_refresh_rate(mut self, hz: f32) -> Self {
        self.surface_refresh_rate = Some(hz);
        self
    }

    /// Refresh rate in Hz, falling back to `fallback` when unknown
    pub fn refresh_rate_or(&self, fallback: f32) -> f32 {
        match self.surface_refresh_rate {
            Some(hz) if hz > 0.0 => hz,
            _ => fallback,
        }
    }
}

impl Default for WindowInfo {
    fn default() -> Self {
        Self::new(640, 480)
    }
}
