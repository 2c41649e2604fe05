// Software cursor - owns the cursor texture drawn over the frame
//
// The cursor is drawn by the presentation loop as a textured quad centred
// on the mouse position. This holder owns exactly one texture at a time;
// assigning a new one releases the previous, and clearing resets the scale.

use std::error::Error;
use std::fmt;
use std::path::Path;

use crate::display::geometry::cursor_draw_rect;
use crate::texture::{PixelFormat, Texture, TextureError, TextureHost};

/// Errors raised when loading a cursor image
#[derive(Debug)]
pub enum CursorError {
    /// Image file could not be opened or decoded
    Decode(image::ImageError),

    /// Texture creation from the decoded pixels failed
    Texture(TextureError),
}

impl fmt::Display for CursorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CursorError::Decode(err) => write!(f, "cursor image decode failed: {}", err),
            CursorError::Texture(err) => write!(f, "cursor texture creation failed: {}", err),
        }
    }
}

impl Error for CursorError {}

impl From<image::ImageError> for CursorError {
    fn from(err: image::ImageError) -> Self {
        CursorError::Decode(err)
    }
}

impl From<TextureError> for CursorError {
    fn from(err: TextureError) -> Self {
        CursorError::Texture(err)
    }
}

/// Exclusively-owned cursor texture plus a scale multiplier
pub struct SoftwareCursor {
    texture: Option<Box<dyn Texture>>,
    scale: f32,
}

impl SoftwareCursor {
    /// Empty cursor holder with scale 1
    pub fn new() -> Self {
        Self {
            texture: None,
            scale: 1.0,
        }
    }

    /// Assign a cursor texture and scale, releasing any previous texture
    pub fn set(&mut self, texture: Box<dyn Texture>, scale: f32) {
        self.texture = Some(texture);
        self.scale = scale;
    }

    /// Build a cursor texture from raw RGBA8 rows and assign it
    ///
    /// `pixels` holds `height` rows spaced `stride` bytes apart.
    pub fn set_from_pixels(
        &mut self,
        host: &dyn TextureHost,
        pixels: &[u8],
        width: u32,
        height: u32,
        stride: usize,
        scale: f32,
    ) -> Result<(), CursorError> {
        let texture = host
            .create_texture(width, height, PixelFormat::Rgba8, Some(pixels), stride)
            .map_err(|err| {
                log::error!(
                    "Failed to create {}x{} cursor texture: {}",
                    width,
                    height,
                    err
                );
                CursorError::Texture(err)
            })?;

        self.set(texture, scale);
        Ok(())
    }

    /// Decode an image file and assign it as the cursor
    pub fn set_from_file(
        &mut self,
        host: &dyn TextureHost,
        path: &Path,
        scale: f32,
    ) -> Result<(), CursorError> {
        let image = match image::open(path) {
            Ok(image) => image.to_rgba8(),
            Err(err) => {
                log::error!("Failed to load image from '{}': {}", path.display(), err);
                return Err(CursorError::Decode(err));
            }
        };

        let (width, height) = image.dimensions();
        self.set_from_pixels(
            host,
            image.as_raw(),
            width,
            height,
            width as usize * 4,
            scale,
        )?;

        log::info!(
            "Loaded {}x{} image from '{}' for software cursor",
            width,
            height,
            path.display()
        );
        Ok(())
    }

    /// Release the cursor texture and reset the scale to 1
    pub fn clear(&mut self) {
        self.texture = None;
        self.scale = 1.0;
    }

    /// Currently held texture, if any
    pub fn texture(&self) -> Option<&dyn Texture> {
        self.texture.as_deref()
    }

    /// Cursor scale multiplier
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// True when a cursor texture is held
    pub fn is_set(&self) -> bool {
        self.texture.is_some()
    }

    /// Draw rectangle for the cursor centred on a point
    ///
    /// `surface_scale` is the window DPI scale, multiplied with the cursor's
    /// own scale. Returns `None` when no texture is held.
    pub fn draw_rect(&self, surface_scale: f32, x: i32, y: i32) -> Option<(i32, i32, i32, i32)> {
        let texture = self.texture.as_deref()?;
        Some(cursor_draw_rect(
            texture.width(),
            texture.height(),
            surface_scale * self.scale,
            x,
            y,
        ))
    }
}

impl Default for SoftwareCursor {
    fn default() -> Self {
        Self::new()
    }
}
