// Display geometry - fits the source frame into the output surface
//
// Pure functions: every call takes the frame shape and a settings snapshot
// and returns a fresh result. Nothing here touches window-system or GPU
// state, which keeps the math testable without a window.

use crate::settings::{DisplayAlignment, DisplaySettings};

/// Shape of the source frame being presented
///
/// `width`/`height` describe the full frame; the active rectangle is the
/// sub-region holding visible content (consoles pad frames with borders
/// that scale with the image but hold no picture).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameGeometry {
    /// Full frame width in pixels
    pub width: u32,
    /// Full frame height in pixels
    pub height: u32,
    /// Left edge of the active region
    pub active_left: u32,
    /// Top edge of the active region
    pub active_top: u32,
    /// Active region width
    pub active_width: u32,
    /// Active region height
    pub active_height: u32,
}

impl FrameGeometry {
    /// Frame whose active region covers the whole frame
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            active_left: 0,
            active_top: 0,
            active_width: width,
            active_height: height,
        }
    }

    /// Frame with an explicit active sub-rectangle
    pub fn with_active(
        width: u32,
        height: u32,
        active_left: u32,
        active_top: u32,
        active_width: u32,
        active_height: u32,
    ) -> Self {
        Self {
            width,
            height,
            active_left,
            active_top,
            active_width,
            active_height,
        }
    }

    /// True if the frame has no presentable area
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl Default for FrameGeometry {
    fn default() -> Self {
        Self::new(320, 240)
    }
}

/// Where and how large the frame lands on the output surface
///
/// `left`/`top` position the active region relative to the padded origin;
/// the final on-surface position is `left + left_padding` (and likewise
/// vertically). Padding is kept separate so input mapping can undo it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DrawRect {
    /// Active region left edge, before padding
    pub left: f32,
    /// Active region top edge, before padding
    pub top: f32,
    /// Active region width on the surface
    pub width: f32,
    /// Active region height on the surface
    pub height: f32,
    /// Horizontal letterbox padding
    pub left_padding: f32,
    /// Vertical letterbox padding
    pub top_padding: f32,
    /// Uniform frame-to-surface scale factor
    pub scale: f32,
    /// Horizontal aspect correction factor
    pub x_scale: f32,
}

/// Compute where the frame should be drawn within a window
///
/// Applies aspect-ratio correction, stretching, integer scaling and
/// alignment from `settings`. Padding on the axis the frame does not fill
/// follows the alignment; under integer scaling the fitted axis also gains
/// symmetric padding for the sub-step leftover. `apply_aspect_ratio` is
/// disabled for outputs that must keep square pixels.
///
/// Degenerate window or frame sizes yield an all-zero rect.
///
/// # Arguments
///
/// * `frame` - Source frame shape
/// * `settings` - Display settings snapshot
/// * `window_width` - Output surface width in pixels
/// * `window_height` - Output surface height in pixels
/// * `apply_aspect_ratio` - Apply the configured aspect correction
pub fn compute_draw_rect(
    frame: &FrameGeometry,
    settings: &DisplaySettings,
    window_width: u32,
    window_height: u32,
    apply_aspect_ratio: bool,
) -> DrawRect {
    if window_width == 0 || window_height == 0 || frame.is_empty() {
        return DrawRect::default();
    }

    let window_ratio = window_width as f32 / window_height as f32;
    let target_ratio = if settings.stretch {
        window_ratio
    } else {
        settings.aspect_ratio
    };

    // Ratio between the wanted shape and the frame's own shape. Applied to
    // widths, or inversely to heights when stretching vertically.
    let x_scale = if apply_aspect_ratio {
        target_ratio / (frame.width as f32 / frame.height as f32)
    } else {
        1.0
    };

    let (display_width, display_height, active_left, active_top, active_width, active_height) =
        if settings.stretch_vertically {
            (
                frame.width as f32,
                frame.height as f32 / x_scale,
                frame.active_left as f32,
                frame.active_top as f32 / x_scale,
                frame.active_width as f32,
                frame.active_height as f32 / x_scale,
            )
        } else {
            (
                frame.width as f32 * x_scale,
                frame.height as f32,
                frame.active_left as f32 * x_scale,
                frame.active_top as f32,
                frame.active_width as f32 * x_scale,
                frame.active_height as f32,
            )
        };

    let mut rect = DrawRect {
        x_scale,
        ..DrawRect::default()
    };

    // Fit whichever axis binds; the other axis gets the alignment padding.
    let scale;
    if display_width / display_height >= window_ratio {
        scale = apply_integer_scaling(window_width as f32 / display_width, settings);

        rect.left_padding = if settings.integer_scaling {
            ((window_width as f32 - display_width * scale) / 2.0).max(0.0)
        } else {
            0.0
        };
        rect.top_padding = alignment_padding(
            settings.alignment,
            window_height as f32,
            display_height * scale,
        );
    } else {
        scale = apply_integer_scaling(window_height as f32 / display_height, settings);

        rect.left_padding = alignment_padding(
            settings.alignment,
            window_width as f32,
            display_width * scale,
        );
        rect.top_padding = if settings.integer_scaling {
            ((window_height as f32 - display_height * scale) / 2.0).max(0.0)
        } else {
            0.0
        };
    }

    rect.left = active_left * scale;
    rect.top = active_top * scale;
    rect.width = active_width * scale;
    rect.height = active_height * scale;
    rect.scale = scale;
    rect
}

fn apply_integer_scaling(raw_scale: f32, settings: &DisplaySettings) -> f32 {
    if settings.integer_scaling {
        raw_scale.floor().max(1.0)
    } else {
        raw_scale
    }
}

fn alignment_padding(alignment: DisplayAlignment, window_extent: f32, scaled_extent: f32) -> f32 {
    match alignment {
        DisplayAlignment::LeftOrTop => 0.0,
        DisplayAlignment::Center => ((window_extent - scaled_extent) / 2.0).max(0.0),
        DisplayAlignment::RightOrBottom => (window_extent - scaled_extent).max(0.0),
    }
}

/// Integer draw rectangle: padded position plus size, truncated
///
/// Returns `(left, top, width, height)` in surface pixels.
pub fn compute_draw_rect_int(
    frame: &FrameGeometry,
    settings: &DisplaySettings,
    window_width: u32,
    window_height: u32,
    apply_aspect_ratio: bool,
) -> (i32, i32, i32, i32) {
    let rect = compute_draw_rect(frame, settings, window_width, window_height, apply_aspect_ratio);
    (
        (rect.left + rect.left_padding) as i32,
        (rect.top + rect.top_padding) as i32,
        rect.width as i32,
        rect.height as i32,
    )
}

/// Map a window-space point back into frame space
///
/// Exact inverse of [`compute_draw_rect`]: removes the padding, divides by
/// the uniform scale, and divides X by the aspect correction. The result
/// may fall outside the frame when the point is in the letterbox area;
/// callers clamp as needed.
pub fn window_to_display_coords(
    frame: &FrameGeometry,
    settings: &DisplaySettings,
    window_x: i32,
    window_y: i32,
    window_width: u32,
    window_height: u32,
) -> (f32, f32) {
    let rect = compute_draw_rect(frame, settings, window_width, window_height, true);
    if rect.scale <= 0.0 || rect.x_scale <= 0.0 {
        return (0.0, 0.0);
    }

    let scaled_x = window_x as f32 - rect.left_padding;
    let scaled_y = window_y as f32 - rect.top_padding;

    (
        scaled_x / rect.scale / rect.x_scale,
        scaled_y / rect.scale,
    )
}

/// Rectangle for drawing a software cursor centred on a point
///
/// `scale` combines the cursor's own scale with the surface DPI scale.
/// Returns `(left, top, width, height)`: the half-extents truncate and the
/// rect is twice them, so odd scaled sizes lose their last pixel.
pub fn cursor_draw_rect(
    texture_width: u32,
    texture_height: u32,
    scale: f32,
    x: i32,
    y: i32,
) -> (i32, i32, i32, i32) {
    let half_width = (texture_width as f32 * scale * 0.5) as i32;
    let half_height = (texture_height as f32 * scale * 0.5) as i32;
    (
        x - half_width,
        y - half_height,
        half_width * 2,
        half_height * 2,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 0.001
    }

    #[test]
    fn test_matching_aspect_fills_window() {
        // 4:3 frame in a 4:3 window: no padding, whole surface covered
        let frame = FrameGeometry::new(320, 240);
        let settings = DisplaySettings::new();
        let rect = compute_draw_rect(&frame, &settings, 640, 480, true);

        assert!(close(rect.left_padding, 0.0));
        assert!(close(rect.top_padding, 0.0));
        assert!(close(rect.width, 640.0));
        assert!(close(rect.height, 480.0));
        assert!(close(rect.scale, 2.0));
        assert!(close(rect.x_scale, 1.0));
    }

    #[test]
    fn test_wide_window_letterboxes_horizontally() {
        // 4:3 frame in a 16:9 window fits by height, pillarboxed
        let frame = FrameGeometry::new(320, 240);
        let settings = DisplaySettings::new();
        let rect = compute_draw_rect(&frame, &settings, 1920, 1080, true);

        assert!(close(rect.height, 1080.0));
        assert!(close(rect.width, 1440.0));
        assert!(close(rect.left_padding, 240.0)); // (1920 - 1440) / 2
        assert!(close(rect.top_padding, 0.0));
    }

    #[test]
    fn test_stretch_fills_any_window() {
        let frame = FrameGeometry::new(320, 240);
        let settings = DisplaySettings::new().with_stretch(true);
        let rect = compute_draw_rect(&frame, &settings, 1000, 300, true);

        assert!(close(rect.width, 1000.0));
        assert!(close(rect.height, 300.0));
        assert!(close(rect.left_padding, 0.0));
        assert!(close(rect.top_padding, 0.0));
    }

    #[test]
    fn test_aspect_correction_reported_in_x_scale() {
        // Frame pixels are not square: 640x480 shown at 4:3 means
        // x_scale = (4/3) / (640/480) = 1, but 512x240 at 4:3 widens.
        let frame = FrameGeometry::new(512, 240);
        let settings = DisplaySettings::new();
        let rect = compute_draw_rect(&frame, &settings, 640, 480, true);

        let expected = (4.0 / 3.0) / (512.0 / 240.0);
        assert!(close(rect.x_scale, expected));
    }

    #[test]
    fn test_no_aspect_ratio_keeps_square_pixels() {
        let frame = FrameGeometry::new(512, 240);
        let settings = DisplaySettings::new();
        let rect = compute_draw_rect(&frame, &settings, 1024, 480, false);

        assert!(close(rect.x_scale, 1.0));
        assert!(close(rect.width, 1024.0));
        assert!(close(rect.height, 480.0));
    }

    #[test]
    fn test_stretch_vertically_shrinks_height() {
        // With vertical stretching the correction divides heights instead
        // of multiplying widths.
        let frame = FrameGeometry::new(320, 240);
        let settings = DisplaySettings::new()
            .with_aspect_ratio(16.0 / 9.0)
            .with_stretch_vertically(true);
        let rect = compute_draw_rect(&frame, &settings, 1280, 720, true);

        let x_scale = (16.0 / 9.0) / (320.0 / 240.0);
        let display_h = 240.0 / x_scale;
        // 320 / display_h = 16/9 >= window ratio, so width binds
        let scale = 1280.0 / 320.0;
        assert!(close(rect.width, 320.0 * scale));
        assert!(close(rect.height, display_h * scale));
    }

    #[test]
    fn test_integer_scaling_floors_scale() {
        let frame = FrameGeometry::new(320, 240);
        let settings = DisplaySettings::new().with_integer_scaling(true);
        let rect = compute_draw_rect(&frame, &settings, 700, 525, true);

        // Raw scale would be 2.1875; integer scaling floors to 2
        assert!(close(rect.scale, 2.0));
        assert!(close(rect.width, 640.0));
        assert!(close(rect.height, 480.0));
        // Fitted axis gains symmetric leftover padding
        assert!(close(rect.left_padding, (700.0 - 640.0) / 2.0));
    }

    #[test]
    fn test_integer_scaling_never_drops_below_one() {
        let frame = FrameGeometry::new(320, 240);
        let settings = DisplaySettings::new().with_integer_scaling(true);
        let rect = compute_draw_rect(&frame, &settings, 200, 150, true);

        assert!(close(rect.scale, 1.0));
    }

    #[test]
    fn test_alignment_padding_variants() {
        // Height-fit case: gap of 480 spare horizontal pixels
        let frame = FrameGeometry::new(320, 240);
        let window = (1920u32, 1080u32);

        let left = DisplaySettings::new().with_alignment(DisplayAlignment::LeftOrTop);
        let center = DisplaySettings::new().with_alignment(DisplayAlignment::Center);
        let right = DisplaySettings::new().with_alignment(DisplayAlignment::RightOrBottom);

        let rect_l = compute_draw_rect(&frame, &left, window.0, window.1, true);
        let rect_c = compute_draw_rect(&frame, &center, window.0, window.1, true);
        let rect_r = compute_draw_rect(&frame, &right, window.0, window.1, true);

        assert!(close(rect_l.left_padding, 0.0));
        assert!(close(rect_c.left_padding, 240.0));
        assert!(close(rect_r.left_padding, 480.0));
    }

    #[test]
    fn test_active_region_offsets_scale() {
        let frame = FrameGeometry::with_active(320, 240, 10, 20, 300, 200);
        let settings = DisplaySettings::new();
        let rect = compute_draw_rect(&frame, &settings, 640, 480, true);

        // x_scale is 1 for a 4:3 frame at a 4:3 target ratio
        assert!(close(rect.left, 10.0 * rect.scale));
        assert!(close(rect.top, 20.0 * rect.scale));
        assert!(close(rect.width, 300.0 * rect.scale));
        assert!(close(rect.height, 200.0 * rect.scale));
    }

    #[test]
    fn test_degenerate_sizes_produce_zero_rect() {
        let settings = DisplaySettings::new();
        let empty = FrameGeometry::new(0, 240);
        assert_eq!(
            compute_draw_rect(&empty, &settings, 640, 480, true),
            DrawRect::default()
        );

        let frame = FrameGeometry::new(320, 240);
        assert_eq!(
            compute_draw_rect(&frame, &settings, 0, 480, true),
            DrawRect::default()
        );
    }

    #[test]
    fn test_integer_rect_combines_padding() {
        let frame = FrameGeometry::new(320, 240);
        let settings = DisplaySettings::new();
        let (left, top, width, height) = compute_draw_rect_int(&frame, &settings, 1920, 1080, true);

        assert_eq!((left, top), (240, 0));
        assert_eq!((width, height), (1440, 1080));
    }

    #[test]
    fn test_coordinate_round_trip() {
        let frame = FrameGeometry::new(320, 240);
        let alignments = [
            DisplayAlignment::LeftOrTop,
            DisplayAlignment::Center,
            DisplayAlignment::RightOrBottom,
        ];

        for alignment in alignments {
            for integer_scaling in [false, true] {
                let settings = DisplaySettings::new()
                    .with_alignment(alignment)
                    .with_integer_scaling(integer_scaling);
                let rect = compute_draw_rect(&frame, &settings, 1917, 1080, true);

                // Forward-map the frame point (120, 100), then invert it
                let wx = rect.left_padding + 120.0 * rect.scale * rect.x_scale;
                let wy = rect.top_padding + 100.0 * rect.scale;
                let (dx, dy) = window_to_display_coords(
                    &frame,
                    &settings,
                    wx as i32,
                    wy as i32,
                    1917,
                    1080,
                );

                // Truncating the window point costs < 1 window pixel
                assert!((dx - 120.0).abs() < 1.0 / (rect.scale * rect.x_scale) + 0.001);
                assert!((dy - 100.0).abs() < 1.0 / rect.scale + 0.001);
            }
        }
    }

    #[test]
    fn test_coords_guard_degenerate_window() {
        let frame = FrameGeometry::new(320, 240);
        let settings = DisplaySettings::new();
        assert_eq!(
            window_to_display_coords(&frame, &settings, 100, 100, 0, 0),
            (0.0, 0.0)
        );
    }

    #[test]
    fn test_cursor_rect_centred() {
        let (left, top, width, height) = cursor_draw_rect(32, 32, 1.0, 100, 80);
        assert_eq!((left, top, width, height), (84, 64, 32, 32));
    }

    #[test]
    fn test_cursor_rect_truncates_half_extents() {
        let (left, top, width, height) = cursor_draw_rect(15, 15, 1.5, 50, 50);
        // Half-extent 11.25 truncates to 11, so the rect is 22 wide
        assert_eq!((width, height), (22, 22));
        assert_eq!((left, top), (39, 39));
    }
}
