// Texture abstraction - capability traits for host-owned textures
//
// This module provides:
// - Pixel formats the capture pipeline understands
// - The `Texture` trait (size/format queries + blocking CPU readback)
// - The `TextureHost` trait (texture creation, origin convention)
// - A software (CPU) backend for tests and windowless use
//
// The presentation layer never creates GPU resources itself; rendering
// backends implement these traits and are injected where textures must be
// read back or built.

pub mod software;

pub use software::{SoftwareTexture, SoftwareTextureHost};

use std::error::Error;
use std::fmt;

/// Pixel formats supported by readback and conversion
///
/// The 16-bit formats use the PlayStation-style layout with red in the low
/// bits of each little-endian word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// 8 bits per channel, red first
    Rgba8,
    /// 8 bits per channel, blue first
    Bgra8,
    /// 16-bit, red 0-4, green 5-10, blue 11-15
    Rgb565,
    /// 16-bit, red 0-4, green 5-9, blue 10-14, alpha bit 15
    Rgba5551,
}

impl PixelFormat {
    /// Size of one pixel in bytes
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Rgba8 | PixelFormat::Bgra8 => 4,
            PixelFormat::Rgb565 | PixelFormat::Rgba5551 => 2,
        }
    }
}

/// A sub-rectangle of a texture, in texels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl TextureRect {
    /// Create a new rectangle from its top-left corner and size
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle covering an entire `width`×`height` texture
    pub fn full(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// True if the rectangle covers no texels
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// The rectangle within the presented texture that holds valid frame content
///
/// A negative `height` marks a vertically-flipped source (lower-left-origin
/// backends); [`TextureView::readback_rect`] normalizes it before readback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureView {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: i32,
}

impl TextureView {
    /// Create a new view; pass a negative `height` for flipped sources
    pub fn new(x: u32, y: u32, width: u32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// True if the view encodes a vertically-flipped source
    pub fn is_flipped(&self) -> bool {
        self.height < 0
    }

    /// Height of the view content regardless of flip direction
    pub fn abs_height(&self) -> u32 {
        self.height.unsigned_abs()
    }

    /// Normalize the view into a readback rectangle plus a flip flag
    ///
    /// For flipped views `y` points one past the bottom row, so the
    /// readback origin moves up by the content height.
    pub fn readback_rect(&self) -> (TextureRect, bool) {
        if self.height < 0 {
            let height = self.height.unsigned_abs();
            (
                TextureRect::new(self.x, self.y.saturating_sub(height), self.width, height),
                true,
            )
        } else {
            (
                TextureRect::new(self.x, self.y, self.width, self.height as u32),
                false,
            )
        }
    }
}

/// Errors raised by texture creation and readback
#[derive(Debug)]
pub enum TextureError {
    /// Requested rectangle does not fit inside the texture
    OutOfBounds {
        rect: TextureRect,
        width: u32,
        height: u32,
    },

    /// Destination buffer is too small for the requested readback
    BufferTooSmall { needed: usize, got: usize },

    /// Destination row stride cannot hold one row of the rectangle
    StrideTooSmall { needed: usize, got: usize },

    /// Zero-sized or otherwise impossible texture dimensions
    InvalidDimensions { width: u32, height: u32 },

    /// Backend-specific failure
    Host(String),
}

impl fmt::Display for TextureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextureError::OutOfBounds {
                rect,
                width,
                height,
            } => write!(
                f,
                "rectangle {}x{}+{}+{} out of bounds for {}x{} texture",
                rect.width, rect.height, rect.x, rect.y, width, height
            ),
            TextureError::BufferTooSmall { needed, got } => {
                write!(f, "buffer too small: needed {} bytes, got {}", needed, got)
            }
            TextureError::StrideTooSmall { needed, got } => {
                write!(f, "row stride too small: needed {} bytes, got {}", needed, got)
            }
            TextureError::InvalidDimensions { width, height } => {
                write!(f, "invalid texture dimensions {}x{}", width, height)
            }
            TextureError::Host(msg) => write!(f, "texture host error: {}", msg),
        }
    }
}

impl Error for TextureError {}

/// An opaque host-owned texture
///
/// Implementations expose their size and pixel format and support a
/// blocking readback of a sub-rectangle into a caller-provided buffer.
pub trait Texture {
    /// Texture width in texels
    fn width(&self) -> u32;

    /// Texture height in texels
    fn height(&self) -> u32;

    /// Pixel format of the stored data
    fn format(&self) -> PixelFormat;

    /// Size of one pixel in bytes
    fn bytes_per_pixel(&self) -> usize {
        self.format().bytes_per_pixel()
    }

    /// Blocking CPU readback of `rect` into `out`
    ///
    /// Rows are written `out_stride` bytes apart; `out_stride` must hold at
    /// least one row of the rectangle in this texture's format. Blocks the
    /// calling thread until the copy completes.
    fn download(
        &self,
        rect: TextureRect,
        out: &mut [u8],
        out_stride: usize,
    ) -> Result<(), TextureError>;
}

/// Capability interface for creating textures
///
/// Injected wherever the presentation layer must build a texture of its own
/// (the software cursor). Rendering backends provide their own
/// implementation; [`SoftwareTextureHost`] is the CPU-backed variant.
pub trait TextureHost {
    /// Create a texture, optionally initialized from `pixels`
    ///
    /// When `pixels` is provided it holds rows of `stride` bytes in the
    /// given format; `stride` is ignored otherwise.
    fn create_texture(
        &self,
        width: u32,
        height: u32,
        format: PixelFormat,
        pixels: Option<&[u8]>,
        stride: usize,
    ) -> Result<Box<dyn Texture>, TextureError>;

    /// True when the backend's framebuffer rows run bottom-to-top (OpenGL
    /// style), in which case plain texture captures need a vertical flip
    fn uses_lower_left_origin(&self) -> bool {
        false
    }
}

/// Row stride for a readback buffer, rounded up to a 4-byte boundary
pub fn aligned_stride(width: u32, bytes_per_pixel: usize) -> usize {
    (width as usize * bytes_per_pixel + 3) & !3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_format_sizes() {
        assert_eq!(PixelFormat::Rgba8.bytes_per_pixel(), 4);
        assert_eq!(PixelFormat::Bgra8.bytes_per_pixel(), 4);
        assert_eq!(PixelFormat::Rgb565.bytes_per_pixel(), 2);
        assert_eq!(PixelFormat::Rgba5551.bytes_per_pixel(), 2);
    }

    #[test]
    fn test_aligned_stride() {
        assert_eq!(aligned_stride(4, 4), 16);
        assert_eq!(aligned_stride(3, 2), 8); // 6 rounds up to 8
        assert_eq!(aligned_stride(2, 2), 4);
        assert_eq!(aligned_stride(5, 2), 12); // 10 rounds up to 12
        assert_eq!(aligned_stride(0, 4), 0);
    }

    #[test]
    fn test_view_readback_upright() {
        let view = TextureView::new(8, 16, 320, 240);
        let (rect, flipped) = view.readback_rect();
        assert!(!flipped);
        assert_eq!(rect, TextureRect::new(8, 16, 320, 240));
    }

    #[test]
    fn test_view_readback_flipped() {
        // y points one past the bottom row for flipped sources
        let view = TextureView::new(0, 240, 320, -240);
        assert!(view.is_flipped());
        assert_eq!(view.abs_height(), 240);

        let (rect, flipped) = view.readback_rect();
        assert!(flipped);
        assert_eq!(rect, TextureRect::new(0, 0, 320, 240));
    }

    #[test]
    fn test_rect_helpers() {
        assert!(TextureRect::new(0, 0, 0, 10).is_empty());
        assert!(TextureRect::new(0, 0, 10, 0).is_empty());
        assert!(!TextureRect::full(4, 4).is_empty());
    }
}
