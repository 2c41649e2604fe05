// Frame composition - renders the display frame into an offscreen buffer
//
// CPU counterpart of the presentation blit: the current texture view is
// scaled into the draw rectangle computed for the target size and placed
// on a black letterbox canvas. Used by window screenshots, which must show
// exactly what presentation would show at that size.

use super::{CaptureError, PixelBuffer};
use crate::display::geometry::{compute_draw_rect, FrameGeometry};
use crate::settings::DisplaySettings;
use crate::texture::{aligned_stride, Texture, TextureView};

/// Render the display frame into a `target_width`×`target_height` buffer
///
/// Letterbox area is opaque black. The view's content is scaled with
/// triangle filtering when `settings.linear_filtering` is set, nearest
/// neighbour otherwise; a negative-height view is normalized before
/// composition. An empty view yields a plain black canvas.
pub fn render_display_frame(
    texture: &dyn Texture,
    view: &TextureView,
    frame: &FrameGeometry,
    settings: &DisplaySettings,
    target_width: u32,
    target_height: u32,
) -> Result<PixelBuffer, CaptureError> {
    if target_width == 0 || target_height == 0 {
        return Err(CaptureError::ZeroSized);
    }

    let rect = compute_draw_rect(frame, settings, target_width, target_height, true);
    render_frame_into_rect(
        texture,
        view,
        settings.linear_filtering,
        target_width,
        target_height,
        (rect.left + rect.left_padding) as i32,
        (rect.top + rect.top_padding) as i32,
        rect.width as u32,
        rect.height as u32,
    )
}

/// Render the view into an explicit destination rectangle on a black canvas
///
/// Lower-level form of [`render_display_frame`] for callers that already
/// decided where the content lands (internal-resolution screenshots place
/// it over the whole canvas with no padding).
#[allow(clippy::too_many_arguments)]
pub fn render_frame_into_rect(
    texture: &dyn Texture,
    view: &TextureView,
    linear_filtering: bool,
    target_width: u32,
    target_height: u32,
    dst_left: i32,
    dst_top: i32,
    dst_width: u32,
    dst_height: u32,
) -> Result<PixelBuffer, CaptureError> {
    if target_width == 0 || target_height == 0 {
        return Err(CaptureError::ZeroSized);
    }

    let mut canvas = PixelBuffer::solid(target_width, target_height, [0, 0, 0, 255]);

    let (read_rect, flipped) = view.readback_rect();
    if read_rect.is_empty() || dst_width == 0 || dst_height == 0 {
        return Ok(canvas);
    }

    let stride = aligned_stride(read_rect.width, texture.bytes_per_pixel());
    let mut raw = vec![0u8; stride * read_rect.height as usize];
    texture.download(read_rect, &mut raw, stride)?;

    let mut content = PixelBuffer::from_texture_data(
        &raw,
        stride,
        read_rect.width,
        read_rect.height,
        texture.format(),
    )?;
    if flipped {
        content.flip_vertical();
    }

    let scaled = content.resized(dst_width, dst_height, linear_filtering)?;
    canvas.blit_from(&scaled, dst_left, dst_top);

    Ok(canvas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture::{PixelFormat, SoftwareTextureHost, TextureHost};

    fn solid_texture(width: u32, height: u32, rgba: [u8; 4]) -> Box<dyn Texture> {
        let host = SoftwareTextureHost::new();
        let pixels: Vec<u8> = rgba
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * 4)
            .collect();
        host.create_texture(width, height, PixelFormat::Rgba8, Some(&pixels), width as usize * 4)
            .unwrap()
    }

    #[test]
    fn test_matching_target_fills_canvas() {
        let texture = solid_texture(2, 2, [255, 0, 0, 255]);
        let view = TextureView::new(0, 0, 2, 2);
        let frame = FrameGeometry::new(2, 2);
        let settings = DisplaySettings::new().with_aspect_ratio(1.0);

        let canvas =
            render_display_frame(texture.as_ref(), &view, &frame, &settings, 4, 4).unwrap();
        assert_eq!(canvas.pixel(0, 0), [255, 0, 0, 255]);
        assert_eq!(canvas.pixel(3, 3), [255, 0, 0, 255]);
    }

    #[test]
    fn test_wide_target_letterboxes_in_black() {
        let texture = solid_texture(2, 2, [0, 255, 0, 255]);
        let view = TextureView::new(0, 0, 2, 2);
        let frame = FrameGeometry::new(2, 2);
        let settings = DisplaySettings::new()
            .with_aspect_ratio(1.0)
            .with_linear_filtering(false);

        // 8x4 target: content occupies the middle 4 columns
        let canvas =
            render_display_frame(texture.as_ref(), &view, &frame, &settings, 8, 4).unwrap();
        assert_eq!(canvas.pixel(0, 0), [0, 0, 0, 255]);
        assert_eq!(canvas.pixel(1, 2), [0, 0, 0, 255]);
        assert_eq!(canvas.pixel(2, 2), [0, 255, 0, 255]);
        assert_eq!(canvas.pixel(5, 1), [0, 255, 0, 255]);
        assert_eq!(canvas.pixel(6, 2), [0, 0, 0, 255]);
    }

    #[test]
    fn test_flipped_view_is_normalized() {
        let host = SoftwareTextureHost::new();
        let pixels = [
            10, 10, 10, 255, // top row
            200, 200, 200, 255, // bottom row
        ];
        let texture = host
            .create_texture(1, 2, PixelFormat::Rgba8, Some(&pixels), 4)
            .unwrap();

        let view = TextureView::new(0, 2, 1, -2);
        let frame = FrameGeometry::new(1, 2);
        let settings = DisplaySettings::new()
            .with_aspect_ratio(0.5)
            .with_linear_filtering(false);

        let canvas =
            render_display_frame(texture.as_ref(), &view, &frame, &settings, 1, 2).unwrap();
        assert_eq!(canvas.pixel(0, 0), [200, 200, 200, 255]);
        assert_eq!(canvas.pixel(0, 1), [10, 10, 10, 255]);
    }

    #[test]
    fn test_empty_view_gives_black_canvas() {
        let texture = solid_texture(2, 2, [255, 255, 255, 255]);
        let view = TextureView::new(0, 0, 0, 0);
        let frame = FrameGeometry::new(2, 2);
        let settings = DisplaySettings::new();

        let canvas =
            render_display_frame(texture.as_ref(), &view, &frame, &settings, 4, 4).unwrap();
        assert_eq!(canvas.pixel(2, 2), [0, 0, 0, 255]);
    }

    #[test]
    fn test_explicit_rect_overrides_layout() {
        let texture = solid_texture(2, 2, [0, 0, 255, 255]);
        let view = TextureView::new(0, 0, 2, 2);

        // Content forced across the full 6x2 canvas, no letterbox
        let canvas =
            render_frame_into_rect(texture.as_ref(), &view, false, 6, 2, 0, 0, 6, 2).unwrap();
        assert_eq!(canvas.pixel(0, 0), [0, 0, 255, 255]);
        assert_eq!(canvas.pixel(5, 1), [0, 0, 255, 255]);
    }

    #[test]
    fn test_zero_target_fails() {
        let texture = solid_texture(2, 2, [0, 0, 0, 255]);
        let view = TextureView::new(0, 0, 2, 2);
        let frame = FrameGeometry::new(2, 2);
        let settings = DisplaySettings::new();

        assert!(matches!(
            render_display_frame(texture.as_ref(), &view, &frame, &settings, 0, 4),
            Err(CaptureError::ZeroSized)
        ));
    }
}
