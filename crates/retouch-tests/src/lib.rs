//! Integration tests for retouch crates.
//!
//! These tests drive the engine end to end: color codec, pixel operations,
//! effect stack, render pipeline and session scheduling together.

use retouch_core::PixelBuffer;

/// Installs a test-writer tracing subscriber honoring `RUST_LOG`.
///
/// Safe to call from every test; only the first call installs.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Deterministic RGBA test image with varied hue, lightness and alpha.
pub fn test_card(width: u32, height: u32) -> PixelBuffer {
    PixelBuffer::from_fn(width, height, |x, y| {
        let r = (x * 255 / width.max(1)) as u8;
        let g = (y * 255 / height.max(1)) as u8;
        let b = ((x * 37 + y * 91) % 256) as u8;
        let a = if (x + y) % 5 == 0 { 128 } else { 255 };
        [r, g, b, a]
    })
}
