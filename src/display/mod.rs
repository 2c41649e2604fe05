// Display module - output geometry and presentation state
//
// This module provides:
// - Draw rectangle computation (aspect ratio, stretch, integer scaling, alignment)
// - Window to display coordinate mapping
// - Fullscreen mode parsing and formatting
// - Frame pacing (FPS cap and refresh throttle)
// - Software cursor holder
// - Per-window display context

pub mod context;
pub mod cursor;
pub mod geometry;
pub mod mode;
pub mod pacing;
pub mod window;

pub use context::DisplayContext;
pub use cursor::{CursorError, SoftwareCursor};
pub use geometry::{
    compute_draw_rect, compute_draw_rect_int, cursor_draw_rect, window_to_display_coords,
    DrawRect, FrameGeometry,
};
pub use mode::{parse_fullscreen_mode, FullscreenMode};
pub use pacing::FramePacer;
pub use window::WindowInfo;
