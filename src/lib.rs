// Viewport Library
// Display output geometry, frame pacing and frame capture

// Public modules
pub mod capture;
pub mod config;
pub mod display;
pub mod settings;
pub mod texture;

// Re-export main types for convenience
pub use capture::{
    capture_display_to_buffer, screenshot_filename, write_display_to_file,
    write_screenshot_to_file, write_texture_to_file, CaptureError, CaptureHandle, CaptureOptions,
    CaptureWorker, ImageContainer, PixelBuffer,
};
pub use config::PresenterConfig;
pub use display::{
    compute_draw_rect, compute_draw_rect_int, parse_fullscreen_mode, window_to_display_coords,
    DisplayContext, DrawRect, FramePacer, FrameGeometry, FullscreenMode, SoftwareCursor,
    WindowInfo,
};
pub use settings::{DisplayAlignment, DisplaySettings};
pub use texture::{
    PixelFormat, SoftwareTexture, SoftwareTextureHost, Texture, TextureError, TextureHost,
    TextureRect, TextureView,
};
