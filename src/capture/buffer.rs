// Pixel buffer - CPU-side RGBA8 image with the capture pipeline's ops
//
// Readback data arrives in whatever format and stride the texture used;
// `PixelBuffer` normalizes it to tightly packed RGBA8 once, and every later
// stage (alpha clear, flip, resize, compose, encode) works on that.

use image::imageops::{self, FilterType};
use image::RgbaImage;

use super::CaptureError;
use crate::texture::PixelFormat;

// 16-bit components replicate their top bits into the low end, matching
// how the rasterizer expands them.
fn expand5(v: u16) -> u8 {
    ((v << 3) | (v & 7)) as u8
}

fn expand6(v: u16) -> u8 {
    ((v << 2) | (v & 3)) as u8
}

/// A tightly packed RGBA8 image in CPU memory
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Solid-colour buffer
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let mut data = Vec::with_capacity(width as usize * height as usize * 4);
        for _ in 0..width as usize * height as usize {
            data.extend_from_slice(&rgba);
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Convert raw texture rows into a tightly packed RGBA8 buffer
    ///
    /// `data` holds `height` rows spaced `stride` bytes apart in `format`.
    ///
    /// # Arguments
    ///
    /// * `data` - Raw pixel rows as read back from a texture
    /// * `stride` - Distance between rows in bytes
    /// * `width` - Image width in pixels
    /// * `height` - Image height in pixels
    /// * `format` - Pixel format of `data`
    pub fn from_texture_data(
        data: &[u8],
        stride: usize,
        width: u32,
        height: u32,
        format: PixelFormat,
    ) -> Result<Self, CaptureError> {
        if width == 0 || height == 0 {
            return Err(CaptureError::ZeroSized);
        }

        let bpp = format.bytes_per_pixel();
        let row_bytes = width as usize * bpp;
        let needed = stride * (height as usize - 1) + row_bytes;
        if stride < row_bytes || data.len() < needed {
            return Err(CaptureError::InvalidPixelData {
                needed,
                got: data.len(),
            });
        }

        let mut out = vec![0u8; width as usize * height as usize * 4];

        for y in 0..height as usize {
            let src_row = &data[y * stride..y * stride + row_bytes];
            let dst_row = &mut out[y * width as usize * 4..(y + 1) * width as usize * 4];

            match format {
                PixelFormat::Rgba8 => dst_row.copy_from_slice(src_row),
                PixelFormat::Bgra8 => {
                    for (src, dst) in src_row.chunks_exact(4).zip(dst_row.chunks_exact_mut(4)) {
                        dst[0] = src[2];
                        dst[1] = src[1];
                        dst[2] = src[0];
                        dst[3] = src[3];
                    }
                }
                PixelFormat::Rgb565 => {
                    for (src, dst) in src_row.chunks_exact(2).zip(dst_row.chunks_exact_mut(4)) {
                        let pixel = u16::from_le_bytes([src[0], src[1]]);
                        dst[0] = expand5(pixel & 31);
                        dst[1] = expand6((pixel >> 5) & 63);
                        dst[2] = expand5((pixel >> 11) & 31);
                        dst[3] = 0xFF;
                    }
                }
                PixelFormat::Rgba5551 => {
                    for (src, dst) in src_row.chunks_exact(2).zip(dst_row.chunks_exact_mut(4)) {
                        let pixel = u16::from_le_bytes([src[0], src[1]]);
                        dst[0] = expand5(pixel & 31);
                        dst[1] = expand5((pixel >> 5) & 31);
                        dst[2] = expand5((pixel >> 10) & 31);
                        dst[3] = if pixel & 0x8000 != 0 { 0xFF } else { 0 };
                    }
                }
            }
        }

        Ok(Self {
            width,
            height,
            data: out,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major RGBA8 bytes, no row padding
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consume the buffer, returning the raw bytes
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// One pixel as `[r, g, b, a]`
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        assert!(x < self.width && y < self.height);
        let off = (y as usize * self.width as usize + x as usize) * 4;
        [
            self.data[off],
            self.data[off + 1],
            self.data[off + 2],
            self.data[off + 3],
        ]
    }

    /// Force every pixel opaque
    pub fn clear_alpha(&mut self) {
        for pixel in self.data.chunks_exact_mut(4) {
            pixel[3] = 0xFF;
        }
    }

    /// Reverse the row order in place
    pub fn flip_vertical(&mut self) {
        let row_bytes = self.width as usize * 4;
        if row_bytes == 0 {
            return;
        }

        let mut top = 0;
        let mut bottom = self.height as usize;
        while top + 1 < bottom {
            bottom -= 1;
            let (upper, lower) = self.data.split_at_mut(bottom * row_bytes);
            upper[top * row_bytes..(top + 1) * row_bytes]
                .swap_with_slice(&mut lower[..row_bytes]);
            top += 1;
        }
    }

    /// Scaled copy of the buffer
    ///
    /// `linear` selects triangle filtering; otherwise nearest neighbour.
    pub fn resized(
        &self,
        new_width: u32,
        new_height: u32,
        linear: bool,
    ) -> Result<PixelBuffer, CaptureError> {
        if new_width == 0 || new_height == 0 {
            return Err(CaptureError::ZeroSized);
        }
        if new_width == self.width && new_height == self.height {
            return Ok(self.clone());
        }

        let image = RgbaImage::from_raw(self.width, self.height, self.data.clone()).ok_or(
            CaptureError::InvalidPixelData {
                needed: self.width as usize * self.height as usize * 4,
                got: self.data.len(),
            },
        )?;

        let filter = if linear {
            FilterType::Triangle
        } else {
            FilterType::Nearest
        };
        let resized = imageops::resize(&image, new_width, new_height, filter);

        Ok(PixelBuffer {
            width: new_width,
            height: new_height,
            data: resized.into_raw(),
        })
    }

    /// Copy `src` onto this buffer at `(dst_x, dst_y)`, clipped to fit
    pub fn blit_from(&mut self, src: &PixelBuffer, dst_x: i32, dst_y: i32) {
        self.for_each_overlapping(src, dst_x, dst_y, |dst, src| dst.copy_from_slice(src));
    }

    /// Source-over blend `src` onto this buffer at `(dst_x, dst_y)`
    pub fn blend_from(&mut self, src: &PixelBuffer, dst_x: i32, dst_y: i32) {
        self.for_each_overlapping(src, dst_x, dst_y, |dst, src| {
            let alpha = src[3] as u32;
            let inv = 255 - alpha;
            for c in 0..3 {
                dst[c] = ((src[c] as u32 * alpha + dst[c] as u32 * inv) / 255) as u8;
            }
            dst[3] = (alpha + dst[3] as u32 * inv / 255) as u8;
        });
    }

    fn for_each_overlapping(
        &mut self,
        src: &PixelBuffer,
        dst_x: i32,
        dst_y: i32,
        op: impl Fn(&mut [u8], &[u8]),
    ) {
        let x0 = dst_x.max(0);
        let y0 = dst_y.max(0);
        let x1 = (dst_x + src.width as i32).min(self.width as i32);
        let y1 = (dst_y + src.height as i32).min(self.height as i32);
        if x0 >= x1 || y0 >= y1 {
            return;
        }

        for y in y0..y1 {
            let src_y = (y - dst_y) as usize;
            for x in x0..x1 {
                let src_x = (x - dst_x) as usize;
                let src_off = (src_y * src.width as usize + src_x) * 4;
                let dst_off = (y as usize * self.width as usize + x as usize) * 4;
                op(
                    &mut self.data[dst_off..dst_off + 4],
                    &src.data[src_off..src_off + 4],
                );
            }
        }
    }
}
