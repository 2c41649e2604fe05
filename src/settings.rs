// Display settings - Read-only presentation policy snapshot
//
// These settings describe how the emulated frame should be fitted into the
// host window. They are owned by an external settings store; the geometry
// and capture code only ever receives an immutable snapshot per call.

use serde::{Deserialize, Serialize};

/// Placement of the image along the padded axis of the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayAlignment {
    /// Flush against the left (pillarbox) or top (letterbox) edge
    LeftOrTop,
    /// Centered, splitting the leftover space evenly
    Center,
    /// Flush against the right or bottom edge
    RightOrBottom,
}

/// Presentation policy snapshot
///
/// Passed by reference into every geometry computation so the math stays a
/// pure function of its inputs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplaySettings {
    /// Target display aspect ratio (width / height), e.g. 4/3 for CRT output
    pub aspect_ratio: f32,

    /// Ignore the source aspect ratio and fill the whole window
    pub stretch: bool,

    /// Apply the aspect-ratio correction to the vertical axis instead of
    /// the horizontal one
    pub stretch_vertically: bool,

    /// Constrain the fit scale to whole numbers (≥1) to keep pixels square
    pub integer_scaling: bool,

    /// Where to place the image inside the window when it does not fill it
    pub alignment: DisplayAlignment,

    /// Sample the frame with bilinear filtering instead of nearest-neighbor
    pub linear_filtering: bool,
}

impl DisplaySettings {
    /// Create settings with default values
    ///
    /// Default: 4:3 aspect ratio, no stretch, integer scaling off,
    /// centered, linear filtering on.
    pub fn new() -> Self {
        Self {
            aspect_ratio: 4.0 / 3.0,
            stretch: false,
            stretch_vertically: false,
            integer_scaling: false,
            alignment: DisplayAlignment::Center,
            linear_filtering: true,
        }
    }

    /// Set the target aspect ratio
    pub fn with_aspect_ratio(mut self, aspect_ratio: f32) -> Self {
        self.aspect_ratio = aspect_ratio;
        self
    }

    /// Enable or disable stretch-to-fill
    pub fn with_stretch(mut self, stretch: bool) -> Self {
        self.stretch = stretch;
        self
    }

    /// Apply aspect correction vertically instead of horizontally
    pub fn with_stretch_vertically(mut self, stretch_vertically: bool) -> Self {
        self.stretch_vertically = stretch_vertically;
        self
    }

    /// Enable or disable integer scaling
    pub fn with_integer_scaling(mut self, integer_scaling: bool) -> Self {
        self.integer_scaling = integer_scaling;
        self
    }

    /// Set the alignment policy
    pub fn with_alignment(mut self, alignment: DisplayAlignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Enable or disable linear filtering
    pub fn with_linear_filtering(mut self, linear_filtering: bool) -> Self {
        self.linear_filtering = linear_filtering;
        self
    }
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self::new()
    }
}
