// Capture - saving frames and textures to image files and buffers
//
// This module provides:
// - Texture capture to PNG/JPEG/TGA/BMP files, inline or on a worker thread
// - Display frame capture to an in-memory RGBA8 buffer
// - Window and internal-resolution screenshots composed on the CPU
//
// File writes resolve the container from the extension before any I/O, so
// an unsupported extension never leaves an empty file behind.

pub mod buffer;
pub mod compose;
pub mod encode;
pub mod worker;

pub use buffer::PixelBuffer;
pub use compose::{render_display_frame, render_frame_into_rect};
pub use encode::{encode_pixels, ImageContainer, JPEG_QUALITY};
pub use worker::{CaptureHandle, CaptureWorker};

use std::error::Error;
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::display::geometry::{compute_draw_rect_int, FrameGeometry};
use crate::display::window::WindowInfo;
use crate::settings::DisplaySettings;
use crate::texture::{aligned_stride, PixelFormat, Texture, TextureError, TextureRect, TextureView};

/// Largest dimension a capture will produce (GPU texture size cap)
pub const MAX_CAPTURE_DIMENSION: u32 = 16384;

/// Errors raised by the capture pipeline
#[derive(Debug)]
pub enum CaptureError {
    /// File extension does not map to a supported container
    UnsupportedExtension(String),

    /// Could not create or write the output file
    Io(std::io::Error),

    /// Texture readback failed
    Readback(TextureError),

    /// Image encoding failed
    Encode(image::ImageError),

    /// Output would be zero sized
    ZeroSized,

    /// Raw pixel data does not match the stated dimensions
    InvalidPixelData { needed: usize, got: usize },

    /// No display texture view is set
    NoDisplayView,

    /// The capture worker has shut down
    WorkerUnavailable,
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureError::UnsupportedExtension(path) => {
                write!(f, "unsupported image extension in '{}'", path)
            }
            CaptureError::Io(err) => write!(f, "io error: {}", err),
            CaptureError::Readback(err) => write!(f, "texture readback failed: {}", err),
            CaptureError::Encode(err) => write!(f, "image encode failed: {}", err),
            CaptureError::ZeroSized => write!(f, "zero-sized image"),
            CaptureError::InvalidPixelData { needed, got } => {
                write!(f, "invalid pixel data: needed {} bytes, got {}", needed, got)
            }
            CaptureError::NoDisplayView => write!(f, "no display texture view is set"),
            CaptureError::WorkerUnavailable => write!(f, "capture worker is not running"),
        }
    }
}

impl Error for CaptureError {}

impl From<std::io::Error> for CaptureError {
    fn from(err: std::io::Error) -> Self {
        CaptureError::Io(err)
    }
}

impl From<TextureError> for CaptureError {
    fn from(err: TextureError) -> Self {
        CaptureError::Readback(err)
    }
}

impl From<image::ImageError> for CaptureError {
    fn from(err: image::ImageError) -> Self {
        CaptureError::Encode(err)
    }
}

/// Options for texture file captures
#[derive(Debug, Clone, Copy)]
pub struct CaptureOptions {
    /// Force every output pixel opaque
    pub clear_alpha: bool,
    /// Reverse the row order before encoding
    pub flip_y: bool,
    /// Output width; 0 keeps the source width
    pub resize_width: u32,
    /// Output height; 0 keeps the source height
    pub resize_height: u32,
    /// Encode on the capture worker instead of the calling thread
    pub compress_on_thread: bool,
}

impl CaptureOptions {
    /// Default options: opaque alpha, no flip, no resize, inline encode
    pub fn new() -> Self {
        Self {
            clear_alpha: true,
            flip_y: false,
            resize_width: 0,
            resize_height: 0,
            compress_on_thread: false,
        }
    }

    pub fn with_clear_alpha(mut self, clear_alpha: bool) -> Self {
        self.clear_alpha = clear_alpha;
        self
    }

    pub fn with_flip_y(mut self, flip_y: bool) -> Self {
        self.flip_y = flip_y;
        self
    }

    pub fn with_resize(mut self, width: u32, height: u32) -> Self {
        self.resize_width = width;
        self.resize_height = height;
        self
    }

    pub fn with_compress_on_thread(mut self, compress_on_thread: bool) -> Self {
        self.compress_on_thread = compress_on_thread;
        self
    }
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything an encode needs, movable onto the worker thread
struct EncodeRequest {
    data: Vec<u8>,
    stride: usize,
    width: u32,
    height: u32,
    format: PixelFormat,
    container: ImageContainer,
    file: File,
    filename: String,
    clear_alpha: bool,
    flip_y: bool,
    resize_width: u32,
    resize_height: u32,
}

impl EncodeRequest {
    fn execute(self) -> Result<(), CaptureError> {
        let filename = self.filename.clone();
        let result = self.run();
        if let Err(err) = &result {
            log::error!("Failed to save texture to '{}': {}", filename, err);
        }
        result
    }

    fn run(self) -> Result<(), CaptureError> {
        let mut buffer =
            PixelBuffer::from_texture_data(&self.data, self.stride, self.width, self.height, self.format)?;

        if self.clear_alpha {
            buffer.clear_alpha();
        }
        if self.flip_y {
            buffer.flip_vertical();
        }
        if self.resize_width > 0
            && self.resize_height > 0
            && (self.resize_width != buffer.width() || self.resize_height != buffer.height())
        {
            buffer = buffer.resized(self.resize_width, self.resize_height, true)?;
        }

        let mut writer = BufWriter::new(self.file);
        encode_pixels(&mut writer, &buffer, self.container)?;
        writer.flush()?;
        Ok(())
    }
}

/// Capture a texture rectangle to an image file
///
/// The container comes from the file extension (`.png`, `.jpg`, `.tga`,
/// `.bmp`). Readback always happens on the calling thread; with
/// `compress_on_thread` set and a worker supplied, conversion and encoding
/// move onto the worker and the returned handle resolves on completion.
/// `Ok(None)` means the file was written inline.
pub fn write_texture_to_file(
    texture: &dyn Texture,
    rect: TextureRect,
    path: &Path,
    options: CaptureOptions,
    worker: Option<&CaptureWorker>,
) -> Result<Option<CaptureHandle>, CaptureError> {
    let Some(container) = ImageContainer::from_path(path) else {
        log::error!("Unknown extension in filename '{}'", path.display());
        return Err(CaptureError::UnsupportedExtension(
            path.display().to_string(),
        ));
    };

    if rect.is_empty() {
        log::error!("Cannot capture empty rectangle to '{}'", path.display());
        return Err(CaptureError::ZeroSized);
    }

    let stride = aligned_stride(rect.width, texture.bytes_per_pixel());
    let mut data = vec![0u8; stride * rect.height as usize];
    if let Err(err) = texture.download(rect, &mut data, stride) {
        log::error!("Texture download failed: {}", err);
        return Err(CaptureError::Readback(err));
    }

    let file = match File::create(path) {
        Ok(file) => file,
        Err(err) => {
            log::error!("Can't open file '{}': {}", path.display(), err);
            return Err(CaptureError::Io(err));
        }
    };

    let request = EncodeRequest {
        data,
        stride,
        width: rect.width,
        height: rect.height,
        format: texture.format(),
        container,
        file,
        filename: path.display().to_string(),
        clear_alpha: options.clear_alpha,
        flip_y: options.flip_y,
        resize_width: options.resize_width,
        resize_height: options.resize_height,
    };

    if options.compress_on_thread {
        if let Some(worker) = worker {
            let handle = worker.submit(move || request.execute())?;
            return Ok(Some(handle));
        }
    }

    request.execute()?;
    Ok(None)
}

/// Capture the display frame into an RGBA8 buffer
///
/// Downloads the view's content (normalizing a flipped view), converts to
/// RGBA8, optionally forces opaque alpha and resizes. Rows come back
/// tightly packed.
pub fn capture_display_to_buffer(
    texture: &dyn Texture,
    view: &TextureView,
    resize_width: u32,
    resize_height: u32,
    clear_alpha: bool,
) -> Result<PixelBuffer, CaptureError> {
    let (read_rect, flipped) = view.readback_rect();
    if read_rect.is_empty() {
        return Err(CaptureError::ZeroSized);
    }

    let stride = aligned_stride(read_rect.width, texture.bytes_per_pixel());
    let mut data = vec![0u8; stride * read_rect.height as usize];
    if let Err(err) = texture.download(read_rect, &mut data, stride) {
        log::error!("Texture download failed: {}", err);
        return Err(CaptureError::Readback(err));
    }

    let mut buffer = PixelBuffer::from_texture_data(
        &data,
        stride,
        read_rect.width,
        read_rect.height,
        texture.format(),
    )?;

    if clear_alpha {
        buffer.clear_alpha();
    }
    if flipped {
        buffer.flip_vertical();
    }
    if resize_width > 0
        && resize_height > 0
        && (resize_width != buffer.width() || resize_height != buffer.height())
    {
        buffer = buffer.resized(resize_width, resize_height, true)?;
    }

    Ok(buffer)
}

/// Output dimensions for a display texture capture
///
/// Mirrors the presentation aspect handling: the height comes from the
/// view, the width from the aspect ratio scaled by the active region's
/// share of the frame (the vertical-stretch variant solves for height
/// instead). When `full_resolution` is off, both axes shrink by the whole
/// ratio between view height and active frame height.
fn display_resize_dims(
    view: &TextureView,
    frame: &FrameGeometry,
    settings: &DisplaySettings,
    full_resolution: bool,
    apply_aspect_ratio: bool,
) -> Option<(u32, u32)> {
    let mut resize_width: i32;
    let mut resize_height = view.abs_height() as i32;

    if apply_aspect_ratio {
        let ss_width_scale = frame.active_width as f32 / frame.width as f32;
        let ss_height_scale = frame.active_height as f32 / frame.height as f32;
        let ss_aspect_ratio = settings.aspect_ratio * ss_width_scale / ss_height_scale;

        if settings.stretch_vertically {
            resize_width = view.width as i32;
            resize_height = (resize_height as f32
                / (settings.aspect_ratio / (frame.width as f32 / frame.height as f32)))
                as i32;
        } else {
            resize_width = (resize_height as f32 * ss_aspect_ratio) as i32;
        }
    } else {
        resize_width = view.width as i32;
    }

    if !full_resolution {
        let resolution_scale = (view.abs_height() / frame.active_height.max(1)).max(1) as i32;
        resize_width /= resolution_scale;
        resize_height /= resolution_scale;
    }

    if resize_width <= 0 || resize_height <= 0 {
        return None;
    }
    Some((resize_width as u32, resize_height as u32))
}

/// Capture the display texture view to an image file
///
/// `full_resolution` keeps the view's native height; otherwise both axes
/// shrink by the internal resolution scale. `apply_aspect_ratio` widens or
/// squashes the output to the configured display aspect. Flipped views are
/// normalized; alpha is always cleared.
#[allow(clippy::too_many_arguments)]
pub fn write_display_to_file(
    texture: &dyn Texture,
    view: &TextureView,
    frame: &FrameGeometry,
    settings: &DisplaySettings,
    path: &Path,
    full_resolution: bool,
    apply_aspect_ratio: bool,
    compress_on_thread: bool,
    worker: Option<&CaptureWorker>,
) -> Result<Option<CaptureHandle>, CaptureError> {
    let Some((resize_width, resize_height)) =
        display_resize_dims(view, frame, settings, full_resolution, apply_aspect_ratio)
    else {
        log::error!(
            "Cannot compute display capture size for '{}'",
            path.display()
        );
        return Err(CaptureError::ZeroSized);
    };

    let (read_rect, flipped) = view.readback_rect();
    let options = CaptureOptions::new()
        .with_flip_y(flipped)
        .with_resize(resize_width, resize_height)
        .with_compress_on_thread(compress_on_thread);

    write_texture_to_file(texture, read_rect, path, options, worker)
}

/// Canvas size and content placement for a screenshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenshotLayout {
    /// Canvas width
    pub width: u32,
    /// Canvas height
    pub height: u32,
    /// Content rectangle within the canvas
    pub draw_left: i32,
    pub draw_top: i32,
    pub draw_width: u32,
    pub draw_height: u32,
}

/// Compute the canvas and content rectangle for a screenshot
///
/// The window variant reproduces presentation exactly: surface-sized
/// canvas, computed draw rect. The internal-resolution variant rescales
/// the aspect-corrected draw rect so the axis closer to the view's own
/// shape keeps its native pixel count, clamps both axes to
/// [`MAX_CAPTURE_DIMENSION`] proportionally, and drops the padding.
pub fn screenshot_layout(
    window: &WindowInfo,
    frame: &FrameGeometry,
    settings: &DisplaySettings,
    view: &TextureView,
    internal_resolution: bool,
) -> ScreenshotLayout {
    let mut width = window.surface_width;
    let mut height = window.surface_height;

    let (mut draw_left, mut draw_top, dw, dh) =
        compute_draw_rect_int(frame, settings, width, height, true);
    let mut draw_width = dw.max(0) as u32;
    let mut draw_height = dh.max(0) as u32;

    if internal_resolution
        && view.width != 0
        && view.height != 0
        && draw_width != 0
        && draw_height != 0
    {
        // The draw rect is already aspect corrected, so rescale it rather
        // than recomputing from the frame.
        let view_width = view.width;
        let view_height = view.abs_height();
        let sar = view_width as f32 / view_height as f32;
        let dar = draw_width as f32 / draw_height as f32;
        if sar >= dar {
            let scale = view_width as f32 / draw_width as f32;
            width = view_width;
            height = (draw_height as f32 * scale).round() as u32;
        } else {
            let scale = view_height as f32 / draw_height as f32;
            width = (draw_width as f32 * scale).round() as u32;
            height = view_height;
        }

        if width > MAX_CAPTURE_DIMENSION {
            height =
                (height as f32 / (width as f32 / MAX_CAPTURE_DIMENSION as f32)) as u32;
            width = MAX_CAPTURE_DIMENSION;
        }
        if height > MAX_CAPTURE_DIMENSION {
            width = (width as f32 / (height as f32 / MAX_CAPTURE_DIMENSION as f32)) as u32;
            height = MAX_CAPTURE_DIMENSION;
        }

        // Letterbox padding is not part of the framebuffer; the content
        // covers the whole canvas.
        draw_left = 0;
        draw_top = 0;
        draw_width = width;
        draw_height = height;
    }

    ScreenshotLayout {
        width,
        height,
        draw_left,
        draw_top,
        draw_width,
        draw_height,
    }
}

/// Write a screenshot of the presented output to an image file
///
/// Composes the frame on the CPU exactly as presentation would draw it
/// (black letterboxing, the configured filter), at either the window size
/// or the view's internal resolution.
#[allow(clippy::too_many_arguments)]
pub fn write_screenshot_to_file(
    texture: &dyn Texture,
    view: &TextureView,
    frame: &FrameGeometry,
    settings: &DisplaySettings,
    window: &WindowInfo,
    path: &Path,
    internal_resolution: bool,
    compress_on_thread: bool,
    worker: Option<&CaptureWorker>,
) -> Result<Option<CaptureHandle>, CaptureError> {
    let Some(container) = ImageContainer::from_path(path) else {
        log::error!("Unknown extension in filename '{}'", path.display());
        return Err(CaptureError::UnsupportedExtension(
            path.display().to_string(),
        ));
    };

    let layout = screenshot_layout(window, frame, settings, view, internal_resolution);
    if layout.width == 0 || layout.height == 0 {
        log::error!(
            "Cannot render {}x{} screenshot",
            layout.width,
            layout.height
        );
        return Err(CaptureError::ZeroSized);
    }

    let canvas = match render_frame_into_rect(
        texture,
        view,
        settings.linear_filtering,
        layout.width,
        layout.height,
        layout.draw_left,
        layout.draw_top,
        layout.draw_width,
        layout.draw_height,
    ) {
        Ok(canvas) => canvas,
        Err(err) => {
            log::error!(
                "Failed to render {}x{} screenshot: {}",
                layout.width,
                layout.height,
                err
            );
            return Err(err);
        }
    };

    let file = match File::create(path) {
        Ok(file) => file,
        Err(err) => {
            log::error!("Can't open file '{}': {}", path.display(), err);
            return Err(CaptureError::Io(err));
        }
    };

    let request = EncodeRequest {
        stride: layout.width as usize * 4,
        width: layout.width,
        height: layout.height,
        data: canvas.into_raw(),
        format: PixelFormat::Rgba8,
        container,
        file,
        filename: path.display().to_string(),
        clear_alpha: true,
        flip_y: false,
        resize_width: 0,
        resize_height: 0,
    };

    if compress_on_thread {
        if let Some(worker) = worker {
            let handle = worker.submit(move || request.execute())?;
            return Ok(Some(handle));
        }
    }

    request.execute()?;
    Ok(None)
}

/// Timestamped screenshot path: `<dir>/<prefix>_YYYYMMDD_HHMMSS.<extension>`
pub fn screenshot_filename(dir: &Path, prefix: &str, extension: &str) -> PathBuf {
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    dir.join(format!("{}_{}.{}", prefix, timestamp, extension))
}
