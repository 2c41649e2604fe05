// Software texture backend - CPU-resident textures
//
// The software host keeps pixel data in plain memory, which makes it the
// backend used by the headless demo and the test suite. Readback is a
// strided memcpy.

use super::{PixelFormat, Texture, TextureError, TextureHost, TextureRect};

/// A texture stored in CPU memory with tightly packed rows
pub struct SoftwareTexture {
    width: u32,
    height: u32,
    format: PixelFormat,
    data: Vec<u8>,
}

impl SoftwareTexture {
    /// Create a zero-filled texture
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Result<Self, TextureError> {
        if width == 0 || height == 0 {
            return Err(TextureError::InvalidDimensions { width, height });
        }

        let size = width as usize * height as usize * format.bytes_per_pixel();
        Ok(Self {
            width,
            height,
            format,
            data: vec![0; size],
        })
    }

    /// Replace the full texture contents from rows of `stride` bytes
    pub fn upload(&mut self, pixels: &[u8], stride: usize) -> Result<(), TextureError> {
        let row_bytes = self.width as usize * self.format.bytes_per_pixel();
        if stride < row_bytes {
            return Err(TextureError::StrideTooSmall {
                needed: row_bytes,
                got: stride,
            });
        }

        let needed = if self.height == 0 {
            0
        } else {
            stride * (self.height as usize - 1) + row_bytes
        };
        if pixels.len() < needed {
            return Err(TextureError::BufferTooSmall {
                needed,
                got: pixels.len(),
            });
        }

        for row in 0..self.height as usize {
            let src = &pixels[row * stride..row * stride + row_bytes];
            let dst = &mut self.data[row * row_bytes..(row + 1) * row_bytes];
            dst.copy_from_slice(src);
        }

        Ok(())
    }

    /// Raw access to the tightly packed pixel data
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl Texture for SoftwareTexture {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn format(&self) -> PixelFormat {
        self.format
    }

    fn download(
        &self,
        rect: TextureRect,
        out: &mut [u8],
        out_stride: usize,
    ) -> Result<(), TextureError> {
        if rect.x + rect.width > self.width || rect.y + rect.height > self.height {
            return Err(TextureError::OutOfBounds {
                rect,
                width: self.width,
                height: self.height,
            });
        }

        let bpp = self.format.bytes_per_pixel();
        let copy_bytes = rect.width as usize * bpp;
        if out_stride < copy_bytes {
            return Err(TextureError::StrideTooSmall {
                needed: copy_bytes,
                got: out_stride,
            });
        }

        let needed = if rect.height == 0 {
            0
        } else {
            out_stride * (rect.height as usize - 1) + copy_bytes
        };
        if out.len() < needed {
            return Err(TextureError::BufferTooSmall {
                needed,
                got: out.len(),
            });
        }

        let tex_stride = self.width as usize * bpp;
        for row in 0..rect.height as usize {
            let src_off = (rect.y as usize + row) * tex_stride + rect.x as usize * bpp;
            let dst_off = row * out_stride;
            out[dst_off..dst_off + copy_bytes]
                .copy_from_slice(&self.data[src_off..src_off + copy_bytes]);
        }

        Ok(())
    }
}

/// CPU-backed texture host
pub struct SoftwareTextureHost {
    lower_left_origin: bool,
}

impl SoftwareTextureHost {
    pub fn new() -> Self {
        Self {
            lower_left_origin: false,
        }
    }

    /// Host that reports a bottom-to-top framebuffer, for exercising the
    /// flip path plain texture captures take on such backends
    pub fn with_lower_left_origin() -> Self {
        Self {
            lower_left_origin: true,
        }
    }
}

impl Default for SoftwareTextureHost {
    fn default() -> Self {
        Self::new()
    }
}

impl TextureHost for SoftwareTextureHost {
    fn create_texture(
        &self,
        width: u32,
        height: u32,
        format: PixelFormat,
        pixels: Option<&[u8]>,
        stride: usize,
    ) -> Result<Box<dyn Texture>, TextureError> {
        let mut texture = SoftwareTexture::new(width, height, format)?;
        if let Some(pixels) = pixels {
            texture.upload(pixels, stride)?;
        }
        Ok(Box::new(texture))
    }

    fn uses_lower_left_origin(&self) -> bool {
        self.lower_left_origin
    }
}
