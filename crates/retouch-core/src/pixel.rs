//! Channel storage rules for 8-bit pixels.
//!
//! Every transform computes in floating point and writes back through
//! [`store_channel`], so overflow clamps instead of wrapping and fractional
//! results round to the nearest integer (ties to even).

/// Number of interleaved channels per pixel (R, G, B, A).
pub const CHANNELS: usize = 4;

/// Index of the alpha channel inside a pixel.
pub const ALPHA: usize = 3;

/// Fully opaque alpha value.
pub const OPAQUE: u8 = 255;

/// Converts a computed channel value to its 8-bit storage form.
///
/// Values are clamped to `[0, 255]` and rounded half-to-even. NaN stores as 0.
///
/// # Example
///
/// ```rust
/// use retouch_core::store_channel;
///
/// assert_eq!(store_channel(300.0), 255);
/// assert_eq!(store_channel(-12.0), 0);
/// assert_eq!(store_channel(127.5), 128);
/// assert_eq!(store_channel(128.5), 128);
/// ```
#[inline]
pub fn store_channel(v: f32) -> u8 {
    if v.is_nan() {
        return 0;
    }
    v.clamp(0.0, 255.0).round_ties_even() as u8
}

/// Stores an RGB triple produced by float math into the first three channels.
#[inline]
pub fn store_rgb(px: &mut [u8], rgb: [f32; 3]) {
    px[0] = store_channel(rgb[0]);
    px[1] = store_channel(rgb[1]);
    px[2] = store_channel(rgb[2]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_clamps() {
        assert_eq!(store_channel(256.0), 255);
        assert_eq!(store_channel(1e9), 255);
        assert_eq!(store_channel(-0.4), 0);
        assert_eq!(store_channel(f32::NEG_INFINITY), 0);
        assert_eq!(store_channel(f32::NAN), 0);
    }

    #[test]
    fn test_store_rounds_ties_to_even() {
        assert_eq!(store_channel(0.5), 0);
        assert_eq!(store_channel(1.5), 2);
        assert_eq!(store_channel(2.5), 2);
        assert_eq!(store_channel(2.5001), 3);
        assert_eq!(store_channel(254.49), 254);
    }

    #[test]
    fn test_store_rgb_leaves_alpha() {
        let mut px = [0u8, 0, 0, 77];
        store_rgb(&mut px, [10.2, 300.0, -4.0]);
        assert_eq!(px, [10, 255, 0, 77]);
    }
}
