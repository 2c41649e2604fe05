// Display Benchmarks
// Performance benchmarks for geometry, pixel conversion and composition

use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

use viewport_rs::capture::{render_display_frame, PixelBuffer};
use viewport_rs::display::{compute_draw_rect, window_to_display_coords, FrameGeometry};
use viewport_rs::settings::DisplaySettings;
use viewport_rs::texture::{
    aligned_stride, PixelFormat, SoftwareTextureHost, TextureHost, TextureView,
};

/// Helper function to build tightly packed RGBA rows
fn rgba_rows(width: u32, height: u32) -> Vec<u8> {
    let mut data = Vec::with_capacity(width as usize * height as usize * 4);
    for y in 0..height {
        for x in 0..width {
            data.extend_from_slice(&[(x % 256) as u8, (y % 256) as u8, 0x80, 0xFF]);
        }
    }
    data
}

/// Helper function to build packed RGB565 rows
fn rgb565_rows(width: u32, height: u32) -> Vec<u8> {
    let mut data = Vec::with_capacity(width as usize * height as usize * 2);
    for y in 0..height {
        for x in 0..width {
            let value = (((x & 0x1F) as u16) << 11) | (((y & 0x3F) as u16) << 5) | 0x10;
            data.extend_from_slice(&value.to_le_bytes());
        }
    }
    data
}

/// Benchmark draw rectangle computation and the inverse mapping
/// This runs once per presented frame and per mouse event
fn bench_geometry(c: &mut Criterion) {
    let mut group = c.benchmark_group("geometry");
    let frame = FrameGeometry::new(320, 240);

    group.bench_function("draw_rect_basic", |b| {
        let settings = DisplaySettings::new();
        b.iter(|| {
            black_box(compute_draw_rect(
                black_box(&frame),
                &settings,
                1920,
                1080,
                true,
            ));
        });
    });

    group.bench_function("draw_rect_integer_scaling", |b| {
        let settings = DisplaySettings::new().with_integer_scaling(true);
        b.iter(|| {
            black_box(compute_draw_rect(
                black_box(&frame),
                &settings,
                1917,
                1080,
                true,
            ));
        });
    });

    group.bench_function("window_to_display_coords", |b| {
        let settings = DisplaySettings::new();
        b.iter(|| {
            black_box(window_to_display_coords(
                black_box(&frame),
                &settings,
                black_box(960),
                black_box(540),
                1920,
                1080,
            ));
        });
    });

    group.finish();
}

/// Benchmark pixel format conversion into the capture buffer
fn bench_pixel_conversion(c: &mut Criterion) {
    let mut group = c.benchmark_group("pixel_conversion");

    group.bench_function("rgba8_320x240", |b| {
        let data = rgba_rows(320, 240);
        let stride = aligned_stride(320, 4);
        // Rows are tightly packed, so stride equals row bytes here
        assert_eq!(stride, 320 * 4);
        b.iter(|| {
            black_box(
                PixelBuffer::from_texture_data(black_box(&data), stride, 320, 240, PixelFormat::Rgba8)
                    .unwrap(),
            );
        });
    });

    group.bench_function("rgb565_320x240", |b| {
        let data = rgb565_rows(320, 240);
        b.iter(|| {
            black_box(
                PixelBuffer::from_texture_data(
                    black_box(&data),
                    320 * 2,
                    320,
                    240,
                    PixelFormat::Rgb565,
                )
                .unwrap(),
            );
        });
    });

    group.bench_function("resize_320x240_to_1280x960_linear", |b| {
        let buffer =
            PixelBuffer::from_texture_data(&rgba_rows(320, 240), 320 * 4, 320, 240, PixelFormat::Rgba8)
                .unwrap();
        b.iter(|| {
            black_box(buffer.resized(1280, 960, true).unwrap());
        });
    });

    group.bench_function("resize_320x240_to_1280x960_nearest", |b| {
        let buffer =
            PixelBuffer::from_texture_data(&rgba_rows(320, 240), 320 * 4, 320, 240, PixelFormat::Rgba8)
                .unwrap();
        b.iter(|| {
            black_box(buffer.resized(1280, 960, false).unwrap());
        });
    });

    group.finish();
}

/// Benchmark whole-frame composition, the screenshot hot path
fn bench_composition(c: &mut Criterion) {
    let mut group = c.benchmark_group("composition");
    group.sample_size(20); // Full-frame composition is slow per iteration

    let host = SoftwareTextureHost::new();
    let pixels = rgba_rows(320, 240);
    let texture = host
        .create_texture(320, 240, PixelFormat::Rgba8, Some(&pixels), 320 * 4)
        .unwrap();
    let view = TextureView::new(0, 0, 320, 240);
    let frame = FrameGeometry::new(320, 240);

    group.bench_function("compose_1920x1080_linear", |b| {
        let settings = DisplaySettings::new();
        b.iter(|| {
            black_box(
                render_display_frame(texture.as_ref(), &view, &frame, &settings, 1920, 1080)
                    .unwrap(),
            );
        });
    });

    group.bench_function("compose_1920x1080_nearest", |b| {
        let settings = DisplaySettings::new().with_linear_filtering(false);
        b.iter(|| {
            black_box(
                render_display_frame(texture.as_ref(), &view, &frame, &settings, 1920, 1080)
                    .unwrap(),
            );
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_geometry,
    bench_pixel_conversion,
    bench_composition
);
criterion_main!(benches);
