//! Tonal and color adjustments applied in place.
//!
//! Hue and saturation round-trip each pixel through HSL; contrast and
//! brightness work on the RGB channels directly. Alpha is never touched.
//! All results are stored with [`store_channel`], so out-of-range values
//! clamp.
//!
//! # Example
//!
//! ```rust
//! use retouch_core::PixelBuffer;
//! use retouch_ops::adjust;
//!
//! let mut buf = PixelBuffer::filled(2, 2, [250, 10, 128, 255]);
//! adjust::adjust_brightness(&mut buf, 20.0);
//! assert_eq!(buf.pixel(0, 0).unwrap(), [255, 30, 148, 255]);
//! ```

use crate::parallel::for_each_pixel_mut;
use retouch_color::{hsl_to_rgb, rgb_to_hsl};
use retouch_core::{PixelBuffer, store_channel, store_rgb};
use tracing::trace;

/// Contrast amounts are limited to this magnitude; the factor has a pole at 259.
pub const MAX_CONTRAST: f32 = 255.0;

/// Applies `f` to the HSL form of every pixel.
pub fn map_hsl<F>(buf: &mut PixelBuffer, f: F)
where
    F: Fn([f32; 3]) -> [f32; 3] + Sync + Send,
{
    for_each_pixel_mut(buf.as_bytes_mut(), |px| {
        let hsl = f(rgb_to_hsl(px[0], px[1], px[2]));
        store_rgb(px, hsl_to_rgb(hsl[0], hsl[1], hsl[2]));
    });
}

/// Rotates hue by `degrees`, wrapping into `[0, 360)`.
pub fn rotate_hue(buf: &mut PixelBuffer, degrees: f32) {
    trace!(degrees, "rotate hue");
    map_hsl(buf, |[h, s, l]| {
        let deg = (h * 360.0 + degrees).rem_euclid(360.0);
        [deg / 360.0, s, l]
    });
}

/// Shifts saturation by `amount / 100`, clamped to `[0, 1]`.
pub fn adjust_saturation(buf: &mut PixelBuffer, amount: f32) {
    trace!(amount, "adjust saturation");
    let delta = amount / 100.0;
    map_hsl(buf, |[h, s, l]| [h, (s + delta).clamp(0.0, 1.0), l]);
}

/// Contrast multiplier for `amount` in `[-255, 255]`.
///
/// `factor = 259 * (amount + 255) / (255 * (259 - amount))`. Amounts beyond
/// the range are clamped first.
///
/// ```rust
/// use retouch_ops::adjust::contrast_factor;
///
/// assert_eq!(contrast_factor(0.0), 1.0);
/// assert_eq!(contrast_factor(-255.0), 0.0);
/// ```
pub fn contrast_factor(amount: f32) -> f32 {
    let amount = amount.clamp(-MAX_CONTRAST, MAX_CONTRAST);
    (259.0 * (amount + 255.0)) / (255.0 * (259.0 - amount))
}

/// Scales each channel's distance from 128 by [`contrast_factor`].
pub fn adjust_contrast(buf: &mut PixelBuffer, amount: f32) {
    let factor = contrast_factor(amount);
    trace!(amount, factor, "adjust contrast");
    for_each_pixel_mut(buf.as_bytes_mut(), |px| {
        for c in &mut px[..3] {
            *c = store_channel(factor * (*c as f32 - 128.0) + 128.0);
        }
    });
}

/// Adds `amount` to each color channel.
pub fn adjust_brightness(buf: &mut PixelBuffer, amount: f32) {
    trace!(amount, "adjust brightness");
    for_each_pixel_mut(buf.as_bytes_mut(), |px| {
        for c in &mut px[..3] {
            *c = store_channel(*c as f32 + amount);
        }
    });
}
