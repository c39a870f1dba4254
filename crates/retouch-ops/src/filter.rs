//! Convolution filters for RGBA8 buffers.
//!
//! Provides square-kernel convolution and a separable 3-tap box blur.
//!
//! # Kernels
//!
//! - [`Kernel::identity`] - Pass-through
//! - [`Kernel::sharpen`] - Identity blended toward a 4-neighbour sharpen kernel
//! - [`Kernel::denoise`] - Center/neighbour weighted average
//!
//! # Boundaries
//!
//! [`EdgeMode::Clamp`] samples the nearest edge pixel for out-of-bounds taps.
//! [`EdgeMode::Skip`] drops those taps without renormalizing, so kernels
//! that sum to one darken toward the border.
//!
//! # Example
//!
//! ```rust
//! use retouch_core::PixelBuffer;
//! use retouch_ops::filter::{convolve, AlphaMode, EdgeMode, Kernel};
//!
//! let src = PixelBuffer::filled(8, 8, [90, 90, 90, 255]);
//! let out = convolve(&src, &Kernel::denoise(0.5), EdgeMode::Clamp, AlphaMode::Opaque);
//! assert_eq!(out, src);
//! ```

use crate::parallel::for_each_row_mut;
use crate::{OpsError, OpsResult};
use retouch_core::{ALPHA, CHANNELS, OPAQUE, PixelBuffer, store_channel};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// 3x3 sharpen kernel that [`Kernel::sharpen`] blends toward.
pub const SHARPEN_3X3: [f32; 9] = [
    0.0, -1.0, 0.0,
    -1.0, 5.0, -1.0,
    0.0, -1.0, 0.0,
];

/// Weights of the 3-tap box blur.
pub const BOX_3: [f32; 3] = [1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0];

/// How taps that fall outside the image are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeMode {
    /// Out-of-bounds taps contribute nothing.
    Skip,
    /// Out-of-bounds taps read the nearest edge pixel.
    #[default]
    Clamp,
}

/// How the alpha channel is produced by [`convolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlphaMode {
    /// Alpha is weighted and summed like the color channels.
    Convolve,
    /// Alpha is forced to 255.
    Opaque,
}

/// Square convolution kernel with odd side length.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    data: Vec<f32>,
    side: usize,
}

impl Kernel {
    /// Creates a kernel from row-major weights.
    ///
    /// The side length is `sqrt(data.len())`.
    ///
    /// # Errors
    ///
    /// [`OpsError::InvalidParameter`] if the data is empty, not square, has an
    /// even side, or contains non-finite weights.
    pub fn new(data: Vec<f32>) -> OpsResult<Self> {
        let side = (data.len() as f64).sqrt() as usize;
        if data.is_empty() || side * side != data.len() {
            return Err(OpsError::InvalidParameter(format!(
                "kernel of {} weights is not square",
                data.len()
            )));
        }
        if side % 2 == 0 {
            return Err(OpsError::InvalidParameter(format!(
                "kernel side {side} must be odd"
            )));
        }
        if data.iter().any(|w| !w.is_finite()) {
            return Err(OpsError::InvalidParameter(
                "kernel weights must be finite".into(),
            ));
        }
        Ok(Self { data, side })
    }

    /// Creates an identity kernel. An even `side` is bumped to the next odd.
    ///
    /// ```rust
    /// use retouch_ops::filter::Kernel;
    ///
    /// let k = Kernel::identity(3);
    /// assert_eq!(k.weights(), &[0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0]);
    /// ```
    pub fn identity(side: usize) -> Self {
        let side = if side % 2 == 0 { side + 1 } else { side };
        let mut data = vec![0.0; side * side];
        data[side * side / 2] = 1.0;
        Self { data, side }
    }

    /// Blends the identity kernel toward [`SHARPEN_3X3`] by `factor`.
    ///
    /// Each weight is `identity + (sharpen - identity) * factor`, so a factor
    /// of 0 is the identity and 1 is the full sharpen kernel. Weights always
    /// sum to one.
    pub fn sharpen(factor: f32) -> Self {
        let identity = Self::identity(3);
        let data = identity
            .data
            .iter()
            .zip(SHARPEN_3X3)
            .map(|(&id, sh)| id + (sh - id) * factor)
            .collect();
        Self { data, side: 3 }
    }

    /// 3x3 weighted average: center `1 - strength`, each neighbour `strength / 8`.
    pub fn denoise(strength: f32) -> Self {
        let base = 1.0 - strength;
        let blur = strength / 8.0;
        Self {
            data: vec![blur, blur, blur, blur, base, blur, blur, blur, blur],
            side: 3,
        }
    }

    /// Row-major weights.
    #[inline]
    pub fn weights(&self) -> &[f32] {
        &self.data
    }

    /// Side length.
    #[inline]
    pub fn side(&self) -> usize {
        self.side
    }

    /// Half the side length.
    #[inline]
    pub fn radius(&self) -> usize {
        self.side / 2
    }

    /// Sum of all weights.
    pub fn sum(&self) -> f32 {
        self.data.iter().sum()
    }
}

/// Resolves a tap coordinate according to `edges`.
#[inline]
fn tap(pos: isize, len: usize, edges: EdgeMode) -> Option<usize> {
    if pos >= 0 && (pos as usize) < len {
        return Some(pos as usize);
    }
    match edges {
        EdgeMode::Skip => None,
        EdgeMode::Clamp => Some(pos.clamp(0, len as isize - 1) as usize),
    }
}

/// Convolves `src` with `kernel`, returning a new buffer.
///
/// The source is never modified; every output pixel is computed from the
/// original input.
pub fn convolve(
    src: &PixelBuffer,
    kernel: &Kernel,
    edges: EdgeMode,
    alpha: AlphaMode,
) -> PixelBuffer {
    let mut dst = PixelBuffer::new(src.width(), src.height());
    convolve_rows(src, dst.as_bytes_mut(), kernel, edges, alpha);
    dst
}

/// Convolves `src` into an existing buffer of the same size.
///
/// # Errors
///
/// Fails with a dimension mismatch when `dst` differs in size from `src`.
pub fn convolve_into(
    src: &PixelBuffer,
    dst: &mut PixelBuffer,
    kernel: &Kernel,
    edges: EdgeMode,
    alpha: AlphaMode,
) -> OpsResult<()> {
    src.ensure_same_size(dst)?;
    convolve_rows(src, dst.as_bytes_mut(), kernel, edges, alpha);
    Ok(())
}

fn convolve_rows(
    src: &PixelBuffer,
    dst: &mut [u8],
    kernel: &Kernel,
    edges: EdgeMode,
    alpha: AlphaMode,
) {
    let (width, height) = (src.width() as usize, src.height() as usize);
    trace!(width, height, side = kernel.side(), ?edges, ?alpha, "convolve");

    let bytes = src.as_bytes();
    let side = kernel.side();
    let r = kernel.radius() as isize;

    for_each_row_mut(dst, width, |y, row| {
        for x in 0..width {
            let mut sums = [0.0f32; CHANNELS];
            for ky in 0..side {
                let Some(sy) = tap(y as isize + ky as isize - r, height, edges) else {
                    continue;
                };
                for kx in 0..side {
                    let Some(sx) = tap(x as isize + kx as isize - r, width, edges) else {
                        continue;
                    };
                    let w = kernel.data[ky * side + kx];
                    let i = (sy * width + sx) * CHANNELS;
                    for (c, sum) in sums.iter_mut().enumerate() {
                        *sum += bytes[i + c] as f32 * w;
                    }
                }
            }

            let o = x * CHANNELS;
            row[o] = store_channel(sums[0]);
            row[o + 1] = store_channel(sums[1]);
            row[o + 2] = store_channel(sums[2]);
            row[o + ALPHA] = match alpha {
                AlphaMode::Convolve => store_channel(sums[ALPHA]),
                AlphaMode::Opaque => OPAQUE,
            };
        }
    });
}

/// Separable 3-tap box blur repeated `passes` times.
///
/// Each pass runs a horizontal [`BOX_3`] filter into an intermediate buffer,
/// then a vertical one back. All four channels are filtered. `passes <= 0`
/// returns an unchanged copy.
///
/// ```rust
/// use retouch_core::PixelBuffer;
/// use retouch_ops::filter::{box_blur, EdgeMode};
///
/// let src = PixelBuffer::from_fn(5, 5, |x, _| [(x * 50) as u8, 0, 0, 255]);
/// assert_eq!(box_blur(&src, 0, EdgeMode::Clamp), src);
/// assert_ne!(box_blur(&src, 1, EdgeMode::Clamp), src);
/// ```
pub fn box_blur(src: &PixelBuffer, passes: i32, edges: EdgeMode) -> PixelBuffer {
    if passes <= 0 {
        return src.clone();
    }
    debug!(width = src.width(), height = src.height(), passes, "box blur");

    let mut current = src.clone();
    let mut temp = PixelBuffer::new(src.width(), src.height());
    for _ in 0..passes {
        blur_pass(&current, &mut temp, true, edges);
        blur_pass(&temp, &mut current, false, edges);
    }
    current
}

/// One 1-D [`BOX_3`] pass from `src` into `dst`.
fn blur_pass(src: &PixelBuffer, dst: &mut PixelBuffer, horizontal: bool, edges: EdgeMode) {
    let (width, height) = (src.width() as usize, src.height() as usize);
    let bytes = src.as_bytes();
    let half = (BOX_3.len() / 2) as isize;

    for_each_row_mut(dst.as_bytes_mut(), width, |y, row| {
        for x in 0..width {
            let mut sums = [0.0f32; CHANNELS];
            for (k, &w) in BOX_3.iter().enumerate() {
                let d = k as isize - half;
                let sample = if horizontal {
                    tap(x as isize + d, width, edges).map(|sx| (y, sx))
                } else {
                    tap(y as isize + d, height, edges).map(|sy| (sy, x))
                };
                let Some((sy, sx)) = sample else {
                    continue;
                };
                let i = (sy * width + sx) * CHANNELS;
                for (c, sum) in sums.iter_mut().enumerate() {
                    *sum += bytes[i + c] as f32 * w;
                }
            }
            let o = x * CHANNELS;
            for (c, sum) in sums.iter().enumerate() {
                row[o + c] = store_channel(*sum);
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn gradient(w: u32, h: u32) -> PixelBuffer {
        PixelBuffer::from_fn(w, h, |x, y| {
            [(x * 40) as u8, (y * 30) as u8, ((x + y) * 20) as u8, 200]
        })
    }

    #[test]
    fn test_kernel_new_validates() {
        assert!(Kernel::new(vec![1.0]).is_ok());
        assert!(Kernel::new(vec![0.0; 9]).is_ok());
        assert!(Kernel::new(vec![0.0; 25]).is_ok());
        assert!(Kernel::new(vec![]).is_err());
        assert!(Kernel::new(vec![0.0; 8]).is_err());
        assert!(Kernel::new(vec![0.0; 4]).is_err());
        assert!(Kernel::new(vec![f32::NAN; 9]).is_err());
    }

    #[test]
    fn test_kernel_identity_bumps_even_side() {
        let k = Kernel::identity(4);
        assert_eq!(k.side(), 5);
        assert_eq!(k.radius(), 2);
        assert_eq!(k.weights()[12], 1.0);
        assert_eq!(k.sum(), 1.0);
    }

    #[test]
    fn test_kernel_sharpen_blend() {
        assert_eq!(Kernel::sharpen(0.0), Kernel::identity(3));
        assert_eq!(Kernel::sharpen(1.0).weights(), &SHARPEN_3X3);

        let half = Kernel::sharpen(0.5);
        assert_abs_diff_eq!(half.weights()[4], 3.0);
        assert_abs_diff_eq!(half.weights()[1], -0.5);
        assert_abs_diff_eq!(half.weights()[0], 0.0);
        assert_abs_diff_eq!(half.sum(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_kernel_denoise_weights() {
        let k = Kernel::denoise(1.0);
        assert_eq!(k.weights()[4], 0.0);
        assert_eq!(k.weights()[0], 0.125);
        assert_abs_diff_eq!(k.sum(), 1.0, epsilon = 1e-6);
        assert_eq!(Kernel::denoise(0.0), Kernel::identity(3));
    }

    #[test]
    fn test_convolve_identity_preserves_color() {
        let src = gradient(6, 4);
        let out = convolve(&src, &Kernel::identity(3), EdgeMode::Skip, AlphaMode::Convolve);
        assert_eq!(out, src);

        let opaque = convolve(&src, &Kernel::identity(3), EdgeMode::Clamp, AlphaMode::Opaque);
        assert!(opaque.pixels().all(|p| p[ALPHA] == OPAQUE));
        for (a, b) in opaque.pixels().zip(src.pixels()) {
            assert_eq!(a[..3], b[..3]);
        }
    }

    #[test]
    fn test_convolve_weights_alpha_like_color() {
        let src = PixelBuffer::from_fn(3, 3, |x, y| {
            if (x, y) == (1, 1) { [60, 60, 60, 0] } else { [60, 60, 60, 80] }
        });
        let out = convolve(&src, &Kernel::denoise(1.0), EdgeMode::Clamp, AlphaMode::Convolve);
        // Center takes only its eight neighbours.
        assert_eq!(out.pixel(1, 1).unwrap(), [60, 60, 60, 80]);
    }

    #[test]
    fn test_convolve_clamp_keeps_flat_image() {
        let src = PixelBuffer::filled(2, 2, [128, 128, 128, 255]);
        let out = convolve(&src, &Kernel::denoise(1.0), EdgeMode::Clamp, AlphaMode::Opaque);
        assert_eq!(out, src);
    }

    #[test]
    fn test_convolve_skip_crops_kernel_at_edges() {
        // 2x2: each pixel sees itself plus three neighbours.
        let src = PixelBuffer::filled(2, 2, [128, 128, 128, 255]);
        let out = convolve(&src, &Kernel::denoise(1.0), EdgeMode::Skip, AlphaMode::Opaque);
        // 3 * 128 / 8 = 48
        assert!(out.pixels().all(|p| p == [48, 48, 48, 255]));
    }

    #[test]
    fn test_convolve_reads_only_source() {
        // A kernel that copies the left neighbour must shift, not smear.
        let k = Kernel::new(vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0]).unwrap();
        let src = PixelBuffer::from_fn(4, 1, |x, _| [(x * 10) as u8, 0, 0, 255]);
        let out = convolve(&src, &k, EdgeMode::Clamp, AlphaMode::Convolve);
        let reds: Vec<u8> = out.pixels().map(|p| p[0]).collect();
        assert_eq!(reds, vec![0, 0, 10, 20]);
    }

    #[test]
    fn test_convolve_clamps_overflow() {
        let src = PixelBuffer::from_fn(3, 3, |x, y| {
            if (x, y) == (1, 1) { [255, 255, 255, 255] } else { [0, 0, 0, 255] }
        });
        let out = convolve(&src, &Kernel::sharpen(1.0), EdgeMode::Clamp, AlphaMode::Opaque);
        assert_eq!(out.pixel(1, 1).unwrap(), [255, 255, 255, 255]);
        assert_eq!(out.pixel(0, 1).unwrap(), [0, 0, 0, 255]);
    }

    #[test]
    fn test_convolve_into_checks_size() {
        let src = gradient(3, 3);
        let mut dst = PixelBuffer::new(2, 3);
        let identity = Kernel::identity(3);
        let err = convolve_into(&src, &mut dst, &identity, EdgeMode::Clamp, AlphaMode::Convolve);
        assert!(matches!(err, Err(OpsError::Core(_))));

        let mut dst = PixelBuffer::new(3, 3);
        convolve_into(&src, &mut dst, &identity, EdgeMode::Clamp, AlphaMode::Convolve).unwrap();
        assert_eq!(dst, src);
    }

    #[test]
    fn test_box_blur_noop_for_non_positive_passes() {
        let src = gradient(5, 5);
        assert_eq!(box_blur(&src, 0, EdgeMode::Clamp), src);
        assert_eq!(box_blur(&src, -3, EdgeMode::Skip), src);
    }

    #[test]
    fn test_box_blur_constant_clamped_is_identity() {
        let src = PixelBuffer::filled(7, 5, [10, 20, 30, 40]);
        assert_eq!(box_blur(&src, 5, EdgeMode::Clamp), src);
    }

    #[test]
    fn test_box_blur_skip_darkens_edges() {
        let src = PixelBuffer::filled(3, 3, [90, 90, 90, 255]);
        let out = box_blur(&src, 1, EdgeMode::Skip);
        // Corners lose one tap in each direction: 90 * 2/3 * 2/3 = 40
        assert_eq!(out.pixel(0, 0).unwrap(), [40, 40, 40, 113]);
        assert_eq!(out.pixel(1, 1).unwrap(), [90, 90, 90, 255]);
    }

    #[test]
    fn test_box_blur_spreads_single_pixel() {
        let src = PixelBuffer::from_fn(5, 5, |x, y| {
            if (x, y) == (2, 2) { [255, 255, 255, 255] } else { [0, 0, 0, 0] }
        });
        let out = box_blur(&src, 1, EdgeMode::Clamp);
        // 255 / 3 = 85 horizontally, then 85 / 3 = 28.33 vertically
        assert_eq!(out.pixel(2, 2).unwrap(), [28, 28, 28, 28]);
        assert_eq!(out.pixel(1, 1).unwrap(), [28, 28, 28, 28]);
        assert_eq!(out.pixel(0, 0).unwrap(), [0, 0, 0, 0]);
    }
}
