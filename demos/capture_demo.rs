// Example: Capture Pipeline
//
// This example exercises the capture pipeline without opening a window:
// - Texture capture to PNG/JPEG/TGA/BMP files
// - Unsupported extension handling (no file is left behind)
// - Capture options (resize, vertical flip)
// - Display capture to an in-memory buffer
// - Threaded capture through the worker
// - Aspect-corrected display and screenshot captures
// - Draw rectangle geometry and coordinate mapping
// - Fullscreen mode parsing

use std::env;
use std::fs;
use std::process;

use viewport_rs::capture::{write_texture_to_file, CaptureOptions, CaptureWorker};
use viewport_rs::display::{parse_fullscreen_mode, DisplayContext, FrameGeometry, WindowInfo};
use viewport_rs::settings::{DisplayAlignment, DisplaySettings};
use viewport_rs::texture::{
    PixelFormat, SoftwareTextureHost, TextureHost, TextureRect, TextureView,
};

const FRAME_WIDTH: u32 = 256;
const FRAME_HEIGHT: u32 = 224;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("Viewport - Capture Pipeline Demonstration");
    println!("=========================================");
    println!();

    // Output directory under the system temp dir
    let out_dir = env::temp_dir().join(format!("viewport_capture_demo_{}", process::id()));
    fs::create_dir_all(&out_dir)?;
    println!("Output directory: {}", out_dir.display());
    println!();

    // Build a gradient frame texture
    let host = SoftwareTextureHost::new();
    let pixels = gradient(FRAME_WIDTH, FRAME_HEIGHT);
    let texture = host.create_texture(
        FRAME_WIDTH,
        FRAME_HEIGHT,
        PixelFormat::Rgba8,
        Some(&pixels),
        FRAME_WIDTH as usize * 4,
    )?;
    println!("✓ Created {}x{} frame texture", FRAME_WIDTH, FRAME_HEIGHT);
    println!();

    // Demonstrate file captures in every supported container
    println!("Demonstration: File Captures");
    println!("----------------------------");
    let rect = TextureRect::full(FRAME_WIDTH, FRAME_HEIGHT);
    for extension in ["png", "jpg", "tga", "bmp"] {
        let path = out_dir.join(format!("frame.{}", extension));
        match write_texture_to_file(texture.as_ref(), rect, &path, CaptureOptions::new(), None) {
            Ok(_) => println!("✓ Saved {}", path.display()),
            Err(e) => println!("✗ Failed to save {}: {}", path.display(), e),
        }
    }
    println!();

    // Demonstrate the unsupported extension path
    println!("Demonstration: Unsupported Extension");
    println!("------------------------------------");
    let bad_path = out_dir.join("frame.xyz");
    match write_texture_to_file(texture.as_ref(), rect, &bad_path, CaptureOptions::new(), None) {
        Ok(_) => println!("✗ Unexpectedly saved {}", bad_path.display()),
        Err(e) => println!("✓ Rejected as expected: {}", e),
    }
    if bad_path.exists() {
        println!("✗ A file was left behind at {}", bad_path.display());
    } else {
        println!("✓ No file left behind");
    }
    println!();

    // Demonstrate capture options
    println!("Demonstration: Capture Options");
    println!("------------------------------");
    let options = CaptureOptions::new()
        .with_resize(FRAME_WIDTH / 2, FRAME_HEIGHT / 2)
        .with_flip_y(true);
    let path = out_dir.join("frame_small_flipped.png");
    match write_texture_to_file(texture.as_ref(), rect, &path, options, None) {
        Ok(_) => println!(
            "✓ Saved {}x{} flipped copy to {}",
            FRAME_WIDTH / 2,
            FRAME_HEIGHT / 2,
            path.display()
        ),
        Err(e) => println!("✗ Failed: {}", e),
    }
    println!();

    // A display context describing a 960x720 output window
    let mut context = DisplayContext::new(WindowInfo::new(960, 720));
    context.set_frame_geometry(FrameGeometry::new(FRAME_WIDTH, FRAME_HEIGHT));
    context.set_texture_view(TextureView::new(0, 0, FRAME_WIDTH, FRAME_HEIGHT as i32));
    let settings = DisplaySettings::new();

    // Demonstrate buffer capture
    println!("Demonstration: Buffer Capture");
    println!("-----------------------------");
    let buffer = context.capture_display_to_buffer(texture.as_ref(), 0, 0, true)?;
    println!(
        "✓ Captured {}x{} RGBA buffer ({} bytes)",
        buffer.width(),
        buffer.height(),
        buffer.as_bytes().len()
    );
    let [r, g, b, a] = buffer.pixel(FRAME_WIDTH - 1, 0);
    println!("  Top-right pixel: ({}, {}, {}, {})", r, g, b, a);
    println!();

    // Demonstrate threaded capture
    println!("Demonstration: Threaded Capture");
    println!("-------------------------------");
    let worker = CaptureWorker::new();
    let options = CaptureOptions::new().with_compress_on_thread(true);
    let path = out_dir.join("frame_threaded.png");
    match write_texture_to_file(texture.as_ref(), rect, &path, options, Some(&worker)) {
        Ok(Some(handle)) => {
            println!("✓ Queued capture on the worker thread");
            match handle.wait() {
                Ok(()) => println!("✓ Worker finished: {}", path.display()),
                Err(e) => println!("✗ Worker failed: {}", e),
            }
        }
        Ok(None) => println!("✓ Saved inline: {}", path.display()),
        Err(e) => println!("✗ Failed: {}", e),
    }
    println!();

    // Demonstrate aspect-corrected display capture
    println!("Demonstration: Display Capture");
    println!("------------------------------");
    let path = out_dir.join("display_aspect.png");
    match context.write_display_to_file(texture.as_ref(), &settings, &path, true, true, false, None)
    {
        Ok(_) => println!("✓ Saved aspect-corrected display to {}", path.display()),
        Err(e) => println!("✗ Failed: {}", e),
    }

    let path = out_dir.join("screenshot_window.png");
    match context.write_screenshot_to_file(texture.as_ref(), &settings, &path, false, false, None)
    {
        Ok(_) => println!("✓ Saved window-size screenshot to {}", path.display()),
        Err(e) => println!("✗ Failed: {}", e),
    }
    println!();

    // Demonstrate draw rectangle geometry
    println!("Demonstration: Draw Rectangle");
    println!("-----------------------------");
    let (left, top, width, height) = context.calculate_draw_rect_int(&settings, true);
    println!("  4:3 centered:     ({}, {}) {}x{}", left, top, width, height);

    let stretched = settings.with_stretch(true);
    let (left, top, width, height) = context.calculate_draw_rect_int(&stretched, true);
    println!("  Stretched:        ({}, {}) {}x{}", left, top, width, height);

    let integer = settings.with_integer_scaling(true);
    let (left, top, width, height) = context.calculate_draw_rect_int(&integer, true);
    println!("  Integer scaling:  ({}, {}) {}x{}", left, top, width, height);

    let aligned = settings.with_alignment(DisplayAlignment::RightOrBottom);
    let (left, top, width, height) = context.calculate_draw_rect_int(&aligned, true);
    println!("  Bottom-right:     ({}, {}) {}x{}", left, top, width, height);
    println!();

    // Demonstrate coordinate mapping
    println!("Demonstration: Coordinate Mapping");
    println!("---------------------------------");
    for (x, y) in [(480, 360), (0, 0), (959, 719)] {
        let (dx, dy) = context.window_to_display_coords(&settings, x, y);
        println!("  Window ({:>3}, {:>3}) -> display ({:.1}, {:.1})", x, y, dx, dy);
    }
    println!();

    // Demonstrate fullscreen mode parsing
    println!("Demonstration: Fullscreen Modes");
    println!("-------------------------------");
    for text in ["1920 x 1080 @ 59.940060 hz", "2560x1440@144", "not a mode"] {
        match parse_fullscreen_mode(text) {
            Some(mode) => println!("  '{}' -> {}", text, mode),
            None => println!("  '{}' -> rejected", text),
        }
    }
    println!();

    println!("Summary");
    println!("=======");
    println!("Capture pipeline demonstrated successfully!");
    println!("Inspect the output files under: {}", out_dir.display());

    Ok(())
}

/// Row-major RGBA gradient used as the demo frame
fn gradient(width: u32, height: u32) -> Vec<u8> {
    let mut data = Vec::with_capacity(width as usize * height as usize * 4);
    for y in 0..height {
        for x in 0..width {
            let r = (x * 255 / width.max(1)) as u8;
            let g = (y * 255 / height.max(1)) as u8;
            let b = ((x + y) % 256) as u8;
            data.extend_from_slice(&[r, g, b, 0xFF]);
        }
    }
    data
}
