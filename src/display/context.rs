// Display context - presentation state for one output window
//
// Owned by the application's composition root and passed by reference to
// the presentation loop and capture calls. It ties together the window
// snapshot, the source frame shape, the current texture view, the software
// cursor, the mouse position and the frame pacer; the geometry itself stays
// in pure functions, and display settings arrive as a snapshot per call.

use std::path::Path;

use crate::capture::{self, CaptureError, CaptureHandle, CaptureWorker, PixelBuffer};
use crate::display::cursor::{CursorError, SoftwareCursor};
use crate::display::geometry::{self, DrawRect, FrameGeometry};
use crate::display::pacing::FramePacer;
use crate::display::window::WindowInfo;
use crate::settings::DisplaySettings;
use crate::texture::{Texture, TextureHost, TextureView};

/// Presentation state: window, frame shape, view, cursor and pacing
pub struct DisplayContext {
    window_info: WindowInfo,
    frame: FrameGeometry,
    view: Option<TextureView>,
    cursor: SoftwareCursor,
    mouse_position: (i32, i32),
    pacer: FramePacer,
}

impl DisplayContext {
    /// Context presenting into the given window
    pub fn new(window_info: WindowInfo) -> Self {
        Self {
            window_info,
            frame: FrameGeometry::default(),
            view: None,
            cursor: SoftwareCursor::new(),
            mouse_position: (0, 0),
            pacer: FramePacer::new(),
        }
    }

    /// Current window snapshot
    pub fn window_info(&self) -> &WindowInfo {
        &self.window_info
    }

    /// Replace the window snapshot (after resize, DPI or monitor change)
    pub fn set_window_info(&mut self, window_info: WindowInfo) {
        self.window_info = window_info;
    }

    /// Shape of the frame being presented
    pub fn frame_geometry(&self) -> &FrameGeometry {
        &self.frame
    }

    /// Replace the frame shape (internal resolution or crop change)
    pub fn set_frame_geometry(&mut self, frame: FrameGeometry) {
        self.frame = frame;
    }

    /// Rectangle of valid content within the presented texture, if set
    pub fn texture_view(&self) -> Option<&TextureView> {
        self.view.as_ref()
    }

    /// Set the display texture view for this frame
    pub fn set_texture_view(&mut self, view: TextureView) {
        self.view = Some(view);
    }

    /// Drop the display texture view (nothing to present or capture)
    pub fn clear_texture_view(&mut self) {
        self.view = None;
    }

    /// Last reported mouse position in window coordinates
    pub fn mouse_position(&self) -> (i32, i32) {
        self.mouse_position
    }

    /// Record the mouse position in window coordinates
    pub fn set_mouse_position(&mut self, x: i32, y: i32) {
        self.mouse_position = (x, y);
    }

    // --- geometry ---

    /// Draw rectangle for the current frame in the current window
    pub fn calculate_draw_rect(
        &self,
        settings: &DisplaySettings,
        apply_aspect_ratio: bool,
    ) -> DrawRect {
        geometry::compute_draw_rect(
            &self.frame,
            settings,
            self.window_info.surface_width,
            self.window_info.surface_height,
            apply_aspect_ratio,
        )
    }

    /// Integer draw rectangle `(left, top, width, height)`, padding included
    pub fn calculate_draw_rect_int(
        &self,
        settings: &DisplaySettings,
        apply_aspect_ratio: bool,
    ) -> (i32, i32, i32, i32) {
        geometry::compute_draw_rect_int(
            &self.frame,
            settings,
            self.window_info.surface_width,
            self.window_info.surface_height,
            apply_aspect_ratio,
        )
    }

    /// Map a window-space point into frame space
    pub fn window_to_display_coords(
        &self,
        settings: &DisplaySettings,
        window_x: i32,
        window_y: i32,
    ) -> (f32, f32) {
        geometry::window_to_display_coords(
            &self.frame,
            settings,
            window_x,
            window_y,
            self.window_info.surface_width,
            self.window_info.surface_height,
        )
    }

    // --- software cursor ---

    /// The software cursor holder
    pub fn cursor(&self) -> &SoftwareCursor {
        &self.cursor
    }

    /// Assign a cursor texture, releasing any previous one
    pub fn set_cursor(&mut self, texture: Box<dyn Texture>, scale: f32) {
        self.cursor.set(texture, scale);
    }

    /// Build a cursor texture from raw RGBA8 rows and assign it
    pub fn set_cursor_from_pixels(
        &mut self,
        host: &dyn TextureHost,
        pixels: &[u8],
        width: u32,
        height: u32,
        stride: usize,
        scale: f32,
    ) -> Result<(), CursorError> {
        self.cursor
            .set_from_pixels(host, pixels, width, height, stride, scale)
    }

    /// Decode an image file and assign it as the cursor
    pub fn set_cursor_from_file(
        &mut self,
        host: &dyn TextureHost,
        path: &Path,
        scale: f32,
    ) -> Result<(), CursorError> {
        self.cursor.set_from_file(host, path, scale)
    }

    /// Release the cursor texture
    pub fn clear_cursor(&mut self) {
        self.cursor.clear();
    }

    /// Cursor draw rectangle at the stored mouse position
    pub fn cursor_rect(&self) -> Option<(i32, i32, i32, i32)> {
        let (x, y) = self.mouse_position;
        self.cursor_rect_at(x, y)
    }

    /// Cursor draw rectangle centred on an explicit point
    pub fn cursor_rect_at(&self, x: i32, y: i32) -> Option<(i32, i32, i32, i32)> {
        self.cursor.draw_rect(self.window_info.surface_scale, x, y)
    }

    // --- pacing ---

    /// Cap displayed frames at `max_fps`; zero or negative removes the cap
    pub fn set_max_display_fps(&mut self, max_fps: f32) {
        self.pacer.set_max_fps(max_fps);
    }

    /// True if the frame arriving now should not be displayed
    pub fn should_skip_presenting_frame(&mut self) -> bool {
        self.pacer.should_skip_frame()
    }

    /// Sleep until the next tick of the window's refresh period
    pub fn throttle_presentation(&mut self) {
        self.pacer.throttle(self.window_info.surface_refresh_rate);
    }

    /// The window's refresh rate, when the platform reported one
    pub fn host_refresh_rate(&self) -> Option<f32> {
        match self.window_info.surface_refresh_rate {
            Some(hz) if hz > 0.0 => Some(hz),
            _ => None,
        }
    }

    // --- capture ---

    /// Capture the current display view into an RGBA8 buffer
    ///
    /// Fails with [`CaptureError::NoDisplayView`] when no view is set.
    pub fn capture_display_to_buffer(
        &self,
        texture: &dyn Texture,
        resize_width: u32,
        resize_height: u32,
        clear_alpha: bool,
    ) -> Result<PixelBuffer, CaptureError> {
        let view = self.view.as_ref().ok_or(CaptureError::NoDisplayView)?;
        capture::capture_display_to_buffer(texture, view, resize_width, resize_height, clear_alpha)
    }

    /// Capture the current display view to an image file
    #[allow(clippy::too_many_arguments)]
    pub fn write_display_to_file(
        &self,
        texture: &dyn Texture,
        settings: &DisplaySettings,
        path: &Path,
        full_resolution: bool,
        apply_aspect_ratio: bool,
        compress_on_thread: bool,
        worker: Option<&CaptureWorker>,
    ) -> Result<Option<CaptureHandle>, CaptureError> {
        let view = self.view.as_ref().ok_or(CaptureError::NoDisplayView)?;
        capture::write_display_to_file(
            texture,
            view,
            &self.frame,
            settings,
            path,
            full_resolution,
            apply_aspect_ratio,
            compress_on_thread,
            worker,
        )
    }

    /// Write a screenshot of the presented output to an image file
    pub fn write_screenshot_to_file(
        &self,
        texture: &dyn Texture,
        settings: &DisplaySettings,
        path: &Path,
        internal_resolution: bool,
        compress_on_thread: bool,
        worker: Option<&CaptureWorker>,
    ) -> Result<Option<CaptureHandle>, CaptureError> {
        let view = self.view.as_ref().ok_or(CaptureError::NoDisplayView)?;
        capture::write_screenshot_to_file(
            texture,
            view,
            &self.frame,
            settings,
            &self.window_info,
            path,
            internal_resolution,
            compress_on_thread,
            worker,
        )
    }
}

impl Default for DisplayContext {
    fn default() -> Self {
        Self::new(WindowInfo::default())
    }
}
