// Common test utilities for display and capture integration tests
//
// This module provides shared texture builders and temp-file helpers for
// the geometry, capture and presentation test suites.

#![allow(dead_code)]

use std::env;
use std::path::PathBuf;
use std::process;
use std::sync::atomic::{AtomicU32, Ordering};

use viewport_rs::texture::{PixelFormat, SoftwareTextureHost, Texture, TextureHost, TextureView};

static NEXT_FILE_ID: AtomicU32 = AtomicU32::new(0);

/// Unique temp path for a test output file
///
/// Unique per process and per call, so parallel tests never collide.
pub fn temp_path(tag: &str, extension: &str) -> PathBuf {
    let id = NEXT_FILE_ID.fetch_add(1, Ordering::Relaxed);
    env::temp_dir().join(format!(
        "viewport_test_{}_{}_{}.{}",
        tag,
        process::id(),
        id,
        extension
    ))
}

/// RGBA8 texture filled with one color
pub fn solid_texture(width: u32, height: u32, rgba: [u8; 4]) -> Box<dyn Texture> {
    let mut pixels = Vec::with_capacity(width as usize * height as usize * 4);
    for _ in 0..width as usize * height as usize {
        pixels.extend_from_slice(&rgba);
    }
    texture_from_rgba(width, height, &pixels)
}

/// RGBA8 texture with x in the red channel and y in the green channel
pub fn gradient_texture(width: u32, height: u32) -> Box<dyn Texture> {
    let mut pixels = Vec::with_capacity(width as usize * height as usize * 4);
    for y in 0..height {
        for x in 0..width {
            pixels.extend_from_slice(&[(x % 256) as u8, (y % 256) as u8, 0x40, 0xFF]);
        }
    }
    texture_from_rgba(width, height, &pixels)
}

/// RGBA8 texture from tightly packed pixel rows
pub fn texture_from_rgba(width: u32, height: u32, pixels: &[u8]) -> Box<dyn Texture> {
    SoftwareTextureHost::new()
        .create_texture(
            width,
            height,
            PixelFormat::Rgba8,
            Some(pixels),
            width as usize * 4,
        )
        .expect("Failed to create texture")
}

/// View covering a whole texture
pub fn full_view(width: u32, height: u32) -> TextureView {
    TextureView::new(0, 0, width, height as i32)
}
