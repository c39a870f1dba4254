//! RGB <-> HSL conversion.
//!
//! Hue, saturation and lightness are all normalized to `[0, 1]`:
//! - 0.0 = Red
//! - 0.167 = Yellow
//! - 0.333 = Green
//! - 0.5 = Cyan
//! - 0.667 = Blue
//! - 0.833 = Magenta
//!
//! Hue wraps, so 0.0 and 1.0 are the same color.
//!
//! # Example
//!
//! ```rust
//! use retouch_color::{hsl_to_rgb, rgb_to_hsl};
//! use retouch_core::store_channel;
//!
//! let [h, s, l] = rgb_to_hsl(200, 40, 90);
//! let rgb = hsl_to_rgb(h, s, l);
//! assert_eq!(rgb.map(store_channel), [200, 40, 90]);
//! ```

/// Converts 8-bit RGB to normalized HSL.
///
/// Achromatic input (all channels equal) yields hue and saturation 0.
pub fn rgb_to_hsl(r: u8, g: u8, b: u8) -> [f32; 3] {
    let r = r as f32 / 255.0;
    let g = g as f32 / 255.0;
    let b = b as f32 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if max == min {
        return [0.0, 0.0, l];
    }

    let d = max - min;
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };

    let h = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };

    [h / 6.0, s, l]
}

/// Converts normalized HSL back to RGB in `[0, 255]`.
///
/// The result is floating point; store it with
/// [`retouch_core::store_channel`].
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> [f32; 3] {
    if s == 0.0 {
        let v = l * 255.0;
        return [v, v, v];
    }

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;

    [
        hue_to_rgb(p, q, h + 1.0 / 3.0) * 255.0,
        hue_to_rgb(p, q, h) * 255.0,
        hue_to_rgb(p, q, h - 1.0 / 3.0) * 255.0,
    ]
}

/// Piecewise hue interpolation between `p` and `q`, wrapping `t` into `[0, 1]`.
#[inline]
pub fn hue_to_rgb(p: f32, q: f32, mut t: f32) -> f32 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        return p + (q - p) * 6.0 * t;
    }
    if t < 1.0 / 2.0 {
        return q;
    }
    if t < 2.0 / 3.0 {
        return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
    }
    p
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_primaries_to_hsl() {
        let red = rgb_to_hsl(255, 0, 0);
        assert_abs_diff_eq!(red[0], 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(red[1], 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(red[2], 0.5, epsilon = 1e-6);

        let green = rgb_to_hsl(0, 255, 0);
        assert_abs_diff_eq!(green[0], 1.0 / 3.0, epsilon = 1e-6);

        let blue = rgb_to_hsl(0, 0, 255);
        assert_abs_diff_eq!(blue[0], 2.0 / 3.0, epsilon = 1e-6);

        let magenta = rgb_to_hsl(255, 0, 255);
        assert_abs_diff_eq!(magenta[0], 5.0 / 6.0, epsilon = 1e-6);
    }

    #[test]
    fn test_achromatic() {
        let gray = rgb_to_hsl(128, 128, 128);
        assert_eq!(gray[0], 0.0);
        assert_eq!(gray[1], 0.0);
        assert_abs_diff_eq!(gray[2], 128.0 / 255.0, epsilon = 1e-6);

        let rgb = hsl_to_rgb(0.7, 0.0, 0.25);
        assert_eq!(rgb, [63.75, 63.75, 63.75]);
    }

    #[test]
    fn test_saturation_uses_lightness_side() {
        // Dark color: d / (max + min)
        let dark = rgb_to_hsl(100, 50, 50);
        let (max, min) = (100.0 / 255.0, 50.0 / 255.0);
        assert_abs_diff_eq!(dark[1], (max - min) / (max + min), epsilon = 1e-6);

        // Light color: d / (2 - max - min)
        let light = rgb_to_hsl(250, 200, 200);
        let (max, min) = (250.0 / 255.0, 200.0 / 255.0);
        assert_abs_diff_eq!(light[1], (max - min) / (2.0 - max - min), epsilon = 1e-6);
    }

    #[test]
    fn test_hue_to_rgb_wraps() {
        let (p, q) = (0.2, 0.8);
        assert_abs_diff_eq!(hue_to_rgb(p, q, -0.1), hue_to_rgb(p, q, 0.9), epsilon = 1e-6);
        assert_abs_diff_eq!(hue_to_rgb(p, q, 1.2), hue_to_rgb(p, q, 0.2), epsilon = 1e-6);
        assert_eq!(hue_to_rgb(p, q, 0.3), q);
        assert_eq!(hue_to_rgb(p, q, 0.8), p);
    }

    #[test]
    fn test_roundtrip_sampled() {
        for r in (0..=255u16).step_by(15) {
            for g in (0..=255u16).step_by(17) {
                for b in (0..=255u16).step_by(5) {
                    let (r, g, b) = (r as u8, g as u8, b as u8);
                    let [h, s, l] = rgb_to_hsl(r, g, b);
                    let out = hsl_to_rgb(h, s, l);
                    for (got, want) in out.iter().zip([r, g, b]) {
                        assert!(
                            (got - want as f32).abs() <= 1.0,
                            "({r},{g},{b}) -> {out:?}"
                        );
                    }
                }
            }
        }
    }
}
