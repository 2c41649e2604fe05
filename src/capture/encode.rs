// Image encoding - maps file extensions to containers and encodes buffers
//
// Encoding goes through the image crate's per-format encoders so the
// worker can stream straight into an open file handle.

use std::io::Write;
use std::path::Path;

use image::codecs::bmp::BmpEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::tga::TgaEncoder;
use image::{ExtendedColorType, ImageEncoder};

use super::{CaptureError, PixelBuffer};

/// JPEG output quality
pub const JPEG_QUALITY: u8 = 95;

/// Supported image containers, selected by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageContainer {
    Png,
    Jpeg,
    Tga,
    Bmp,
}

impl ImageContainer {
    /// Container for a path's extension, `None` when unsupported
    ///
    /// Recognizes `.png`, `.jpg`, `.tga` and `.bmp`, case-insensitive.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?;
        match extension.to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" => Some(Self::Jpeg),
            "tga" => Some(Self::Tga),
            "bmp" => Some(Self::Bmp),
            _ => None,
        }
    }
}

/// Encode an RGBA8 buffer into `writer` in the given container
///
/// JPEG has no alpha channel, so the buffer is flattened to RGB for it;
/// the other containers keep all four channels.
pub fn encode_pixels<W: Write>(
    writer: &mut W,
    buffer: &PixelBuffer,
    container: ImageContainer,
) -> Result<(), CaptureError> {
    let (width, height) = (buffer.width(), buffer.height());

    match container {
        ImageContainer::Png => {
            PngEncoder::new(writer).write_image(
                buffer.as_bytes(),
                width,
                height,
                ExtendedColorType::Rgba8,
            )?;
        }
        ImageContainer::Jpeg => {
            let rgb: Vec<u8> = buffer
                .as_bytes()
                .chunks_exact(4)
                .flat_map(|p| [p[0], p[1], p[2]])
                .collect();
            JpegEncoder::new_with_quality(writer, JPEG_QUALITY).write_image(
                &rgb,
                width,
                height,
                ExtendedColorType::Rgb8,
            )?;
        }
        ImageContainer::Tga => {
            TgaEncoder::new(writer).write_image(
                buffer.as_bytes(),
                width,
                height,
                ExtendedColorType::Rgba8,
            )?;
        }
        ImageContainer::Bmp => {
            BmpEncoder::new(writer).write_image(
                buffer.as_bytes(),
                width,
                height,
                ExtendedColorType::Rgba8,
            )?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_container_from_extension() {
        assert_eq!(
            ImageContainer::from_path(Path::new("shot.png")),
            Some(ImageContainer::Png)
        );
        assert_eq!(
            ImageContainer::from_path(Path::new("shot.JPG")),
            Some(ImageContainer::Jpeg)
        );
        assert_eq!(
            ImageContainer::from_path(Path::new("dir/shot.Tga")),
            Some(ImageContainer::Tga)
        );
        assert_eq!(
            ImageContainer::from_path(Path::new("shot.bmp")),
            Some(ImageContainer::Bmp)
        );
    }

    #[test]
    fn test_unknown_extensions_rejected() {
        assert_eq!(ImageContainer::from_path(Path::new("shot.xyz")), None);
        assert_eq!(ImageContainer::from_path(Path::new("shot")), None);
        assert_eq!(ImageContainer::from_path(PathBuf::from("shot.").as_path()), None);
    }

    #[test]
    fn test_png_encode_round_trips() {
        let buffer = PixelBuffer::solid(3, 2, [12, 34, 56, 255]);
        let mut bytes = Vec::new();
        encode_pixels(&mut bytes, &buffer, ImageContainer::Png).unwrap();

        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(decoded.width(), 3);
        assert_eq!(decoded.height(), 2);
        assert_eq!(decoded.get_pixel(2, 1).0, [12, 34, 56, 255]);
    }

    #[test]
    fn test_bmp_encode_round_trips() {
        let buffer = PixelBuffer::solid(4, 4, [200, 100, 50, 255]);
        let mut bytes = Vec::new();
        encode_pixels(&mut bytes, &buffer, ImageContainer::Bmp).unwrap();

        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(decoded.get_pixel(0, 0).0[..3], [200, 100, 50]);
    }

    #[test]
    fn test_jpeg_drops_alpha_but_encodes() {
        let buffer = PixelBuffer::solid(8, 8, [255, 0, 0, 128]);
        let mut bytes = Vec::new();
        encode_pixels(&mut bytes, &buffer, ImageContainer::Jpeg).unwrap();

        // Lossy: only check shape and that red dominates
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(decoded.width(), 8);
        let pixel = decoded.get_pixel(4, 4).0;
        assert!(pixel[0] > 200 && pixel[1] < 64 && pixel[2] < 64);
    }

    #[test]
    fn test_tga_encode_round_trips() {
        let buffer = PixelBuffer::solid(2, 2, [1, 2, 3, 4]);
        let mut bytes = Vec::new();
        encode_pixels(&mut bytes, &buffer, ImageContainer::Tga).unwrap();

        let decoded = image::load_from_memory_with_format(&bytes, image::ImageFormat::Tga)
            .unwrap()
            .to_rgba8();
        assert_eq!(decoded.get_pixel(1, 1).0, [1, 2, 3, 4]);
    }
}
