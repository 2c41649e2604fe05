// Viewport Presenter - Main Entry Point
//
// Presents an animated test pattern through the full display pipeline:
// draw rectangle geometry, frame pacing, the software cursor and
// screenshot capture, rendered with winit + pixels.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use pixels::{Pixels, SurfaceTexture};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use viewport_rs::capture::{render_display_frame, screenshot_filename, CaptureWorker, PixelBuffer};
use viewport_rs::config::{PresenterConfig, DEFAULT_CONFIG_FILE};
use viewport_rs::display::{DisplayContext, FrameGeometry, WindowInfo};
use viewport_rs::settings::{DisplayAlignment, DisplaySettings};
use viewport_rs::texture::{
    aligned_stride, PixelFormat, SoftwareTexture, SoftwareTextureHost, Texture, TextureRect,
    TextureView,
};

/// Internal resolution of the test pattern
const FRAME_WIDTH: u32 = 320;
const FRAME_HEIGHT: u32 = 240;

/// Side length of the generated crosshair cursor
const CURSOR_SIZE: u32 = 16;

/// Presenter application driving the display pipeline
struct PresenterApp {
    window: Option<Arc<Window>>,
    pixels: Option<Pixels<'static>>,
    config: PresenterConfig,
    settings: DisplaySettings,
    context: DisplayContext,
    host: SoftwareTextureHost,
    frame_texture: SoftwareTexture,
    worker: CaptureWorker,
    tick: u64,
}

impl PresenterApp {
    /// Create the presenter (window is created when the event loop starts)
    fn new(config: PresenterConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let mut context =
            DisplayContext::new(WindowInfo::new(config.window.width, config.window.height));
        context.set_frame_geometry(FrameGeometry::new(FRAME_WIDTH, FRAME_HEIGHT));
        context.set_texture_view(TextureView::new(0, 0, FRAME_WIDTH, FRAME_HEIGHT as i32));
        context.set_max_display_fps(config.pacing.max_fps);

        let frame_texture = SoftwareTexture::new(FRAME_WIDTH, FRAME_HEIGHT, PixelFormat::Rgba8)?;

        Ok(Self {
            window: None,
            pixels: None,
            settings: config.display,
            config,
            context,
            host: SoftwareTextureHost::new(),
            frame_texture,
            worker: CaptureWorker::new(),
            tick: 0,
        })
    }

    /// Refresh the window snapshot the geometry is computed against
    fn update_window_info(&mut self) {
        let Some(window) = &self.window else {
            return;
        };

        let size = window.inner_size();
        let mut info =
            WindowInfo::new(size.width, size.height).with_scale(window.scale_factor() as f32);
        if let Some(mhz) = window
            .current_monitor()
            .and_then(|monitor| monitor.refresh_rate_millihertz())
        {
            info = info.with_refresh_rate(mhz as f32 / 1000.0);
        }
        self.context.set_window_info(info);
    }

    /// Advance the test pattern and upload it to the frame texture
    fn advance_pattern(&mut self) -> Result<(), viewport_rs::TextureError> {
        self.tick = self.tick.wrapping_add(1);
        let pattern = test_pattern(FRAME_WIDTH, FRAME_HEIGHT, self.tick);
        self.frame_texture
            .upload(&pattern, FRAME_WIDTH as usize * 4)
    }

    /// The cursor texture scaled to its on-screen size
    fn cursor_overlay(&self, width: u32, height: u32) -> Option<PixelBuffer> {
        let texture = self.context.cursor().texture()?;
        let stride = aligned_stride(texture.width(), texture.bytes_per_pixel());
        let mut data = vec![0u8; stride * texture.height() as usize];
        texture
            .download(
                TextureRect::full(texture.width(), texture.height()),
                &mut data,
                stride,
            )
            .ok()?;

        let overlay = PixelBuffer::from_texture_data(
            &data,
            stride,
            texture.width(),
            texture.height(),
            texture.format(),
        )
        .ok()?;

        if overlay.width() == width && overlay.height() == height {
            Some(overlay)
        } else {
            overlay.resized(width, height, false).ok()
        }
    }

    /// Compose the current frame into the window and present it
    fn render(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let info = *self.context.window_info();
        if info.surface_width == 0 || info.surface_height == 0 {
            return Ok(());
        }

        self.advance_pattern()?;

        let view = TextureView::new(0, 0, FRAME_WIDTH, FRAME_HEIGHT as i32);
        let mut composed = render_display_frame(
            &self.frame_texture,
            &view,
            self.context.frame_geometry(),
            &self.settings,
            info.surface_width,
            info.surface_height,
        )?;

        if let Some((left, top, width, height)) = self.context.cursor_rect() {
            if width > 0 && height > 0 {
                if let Some(overlay) = self.cursor_overlay(width as u32, height as u32) {
                    composed.blend_from(&overlay, left, top);
                }
            }
        }

        if let Some(pixels) = &mut self.pixels {
            pixels.frame_mut().copy_from_slice(composed.as_bytes());
            pixels.render()?;
        }

        Ok(())
    }

    /// Write a screenshot using the configured directory and extension
    fn take_screenshot(&mut self, internal_resolution: bool) {
        let capture = &self.config.capture;
        if let Err(err) = fs::create_dir_all(&capture.directory) {
            log::error!(
                "Could not create screenshot directory '{}': {}",
                capture.directory.display(),
                err
            );
            return;
        }

        let path = screenshot_filename(&capture.directory, "screenshot", &capture.extension);
        let result = self.context.write_screenshot_to_file(
            &self.frame_texture,
            &self.settings,
            &path,
            internal_resolution,
            capture.compress_on_thread,
            Some(&self.worker),
        );

        match result {
            Ok(Some(_handle)) => log::info!("Queued screenshot '{}'", path.display()),
            Ok(None) => log::info!("Saved screenshot '{}'", path.display()),
            Err(err) => log::error!("Screenshot failed: {}", err),
        }
    }

    /// Toggle the software crosshair cursor
    fn toggle_cursor(&mut self) {
        if self.context.cursor().is_set() {
            self.context.clear_cursor();
            log::info!("Software cursor off");
            return;
        }

        let pattern = crosshair_pattern(CURSOR_SIZE);
        let result = self.context.set_cursor_from_pixels(
            &self.host,
            &pattern,
            CURSOR_SIZE,
            CURSOR_SIZE,
            CURSOR_SIZE as usize * 4,
            2.0,
        );
        match result {
            Ok(()) => log::info!("Software cursor on"),
            Err(err) => log::error!("Could not set cursor: {}", err),
        }
    }

    fn cycle_alignment(&mut self) {
        self.settings.alignment = match self.settings.alignment {
            DisplayAlignment::LeftOrTop => DisplayAlignment::Center,
            DisplayAlignment::Center => DisplayAlignment::RightOrBottom,
            DisplayAlignment::RightOrBottom => DisplayAlignment::LeftOrTop,
        };
        log::info!("Alignment: {:?}", self.settings.alignment);
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, key: PhysicalKey) {
        match key {
            PhysicalKey::Code(KeyCode::Escape) => event_loop.exit(),
            PhysicalKey::Code(KeyCode::F9) => self.take_screenshot(false),
            PhysicalKey::Code(KeyCode::F10) => self.take_screenshot(true),
            PhysicalKey::Code(KeyCode::KeyA) => self.cycle_alignment(),
            PhysicalKey::Code(KeyCode::KeyS) => {
                self.settings.stretch = !self.settings.stretch;
                log::info!("Stretch: {}", self.settings.stretch);
            }
            PhysicalKey::Code(KeyCode::KeyV) => {
                self.settings.stretch_vertically = !self.settings.stretch_vertically;
                log::info!("Vertical stretch: {}", self.settings.stretch_vertically);
            }
            PhysicalKey::Code(KeyCode::KeyI) => {
                self.settings.integer_scaling = !self.settings.integer_scaling;
                log::info!("Integer scaling: {}", self.settings.integer_scaling);
            }
            PhysicalKey::Code(KeyCode::KeyL) => {
                self.settings.linear_filtering = !self.settings.linear_filtering;
                log::info!("Linear filtering: {}", self.settings.linear_filtering);
            }
            PhysicalKey::Code(KeyCode::KeyC) => self.toggle_cursor(),
            _ => {}
        }
    }
}

impl ApplicationHandler for PresenterApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        // Create window
        let window_attributes = Window::default_attributes()
            .with_title(self.config.window.title.clone())
            .with_inner_size(LogicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));

        let window = event_loop
            .create_window(window_attributes)
            .expect("Failed to create window");

        // Wrap window in Arc for shared ownership
        let window = Arc::new(window);
        let window_size = window.inner_size();

        // Create surface texture using Arc<Window> for safe 'static lifetime
        let surface_texture =
            SurfaceTexture::new(window_size.width, window_size.height, window.clone());

        // Window-sized buffer: geometry and composition happen on the CPU
        let pixels = Pixels::new(window_size.width, window_size.height, surface_texture)
            .expect("Failed to create pixel buffer");

        self.window = Some(window);
        self.pixels = Some(pixels);
        self.update_window_info();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                println!("Close requested, exiting...");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if size.width > 0 && size.height > 0 {
                    if let Some(pixels) = &mut self.pixels {
                        if let Err(err) = pixels.resize_surface(size.width, size.height) {
                            log::error!("Surface resize failed: {}", err);
                            event_loop.exit();
                            return;
                        }
                        if let Err(err) = pixels.resize_buffer(size.width, size.height) {
                            log::error!("Buffer resize failed: {}", err);
                            event_loop.exit();
                            return;
                        }
                    }
                }
                self.update_window_info();
            }
            WindowEvent::ScaleFactorChanged { .. } => {
                self.update_window_info();
            }
            WindowEvent::CursorMoved { position, .. } => {
                let (x, y) = (position.x as i32, position.y as i32);
                self.context.set_mouse_position(x, y);
                let (dx, dy) = self.context.window_to_display_coords(&self.settings, x, y);
                log::debug!("Cursor: window ({}, {}) -> display ({:.1}, {:.1})", x, y, dx, dy);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key,
                        state,
                        repeat,
                        ..
                    },
                ..
            } => {
                if state == ElementState::Pressed && !repeat {
                    self.handle_key(event_loop, physical_key);
                }
            }
            WindowEvent::RedrawRequested => {
                // Render unless the FPS cap says to skip this frame
                if !self.context.should_skip_presenting_frame() {
                    if let Err(err) = self.render() {
                        log::error!("Render error: {}", err);
                        event_loop.exit();
                        return;
                    }
                    if self.config.pacing.throttle {
                        self.context.throttle_presentation();
                    }
                }

                // Request next frame
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

/// RGBA gradient with a moving bright scanline
fn test_pattern(width: u32, height: u32, tick: u64) -> Vec<u8> {
    let mut data = Vec::with_capacity(width as usize * height as usize * 4);
    let band = (tick % height.max(1) as u64) as u32;
    let shift = (tick % 256) as u32;

    for y in 0..height {
        for x in 0..width {
            if y == band {
                data.extend_from_slice(&[0xF0, 0xF0, 0xF0, 0xFF]);
            } else {
                let r = (x * 255 / width.max(1)) as u8;
                let g = (y * 255 / height.max(1)) as u8;
                let b = ((x + y + shift) % 256) as u8;
                data.extend_from_slice(&[r, g, b, 0xFF]);
            }
        }
    }
    data
}

/// White crosshair with transparent background
fn crosshair_pattern(size: u32) -> Vec<u8> {
    let mut data = vec![0u8; size as usize * size as usize * 4];
    let mid = size / 2;

    for i in 0..size {
        for (x, y) in [(i, mid), (mid, i)] {
            let off = (y as usize * size as usize + x as usize) * 4;
            data[off..off + 4].copy_from_slice(&[0xFF, 0xFF, 0xFF, 0xFF]);
        }
    }
    data
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("Viewport Presenter (viewport-rs) v0.1.0");
    println!("========================================");
    println!();

    // Load presenter configuration
    let config = PresenterConfig::load_or_default(Path::new(DEFAULT_CONFIG_FILE));
    println!("Resolution:  {}x{}", FRAME_WIDTH, FRAME_HEIGHT);
    println!(
        "Window size: {}x{}",
        config.window.width, config.window.height
    );
    println!();

    println!("Keys:");
    println!("  F9   window screenshot");
    println!("  F10  internal-resolution screenshot");
    println!("  A    cycle alignment");
    println!("  S    toggle stretch");
    println!("  V    toggle vertical stretch");
    println!("  I    toggle integer scaling");
    println!("  L    toggle linear filtering");
    println!("  C    toggle software cursor");
    println!("  Esc  exit");
    println!();

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = PresenterApp::new(config)?;
    event_loop.run_app(&mut app)?;

    println!("Display window closed.");
    Ok(())
}
