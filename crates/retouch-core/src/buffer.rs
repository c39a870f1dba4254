//! RGBA8 pixel buffer.
//!
//! [`PixelBuffer`] is the single image container used by every retouch crate:
//! the immutable source image, the working buffer of a render pass and the
//! output handed to the display surface.
//!
//! # Memory Layout
//!
//! Pixels are stored **row-major**, top-to-bottom, four interleaved 8-bit
//! channels per pixel:
//!
//! ```text
//! Memory: [R G B A R G B A ...]  <- Row 0
//!         [R G B A R G B A ...]  <- Row 1
//!         ...
//! ```
//!
//! # Usage
//!
//! ```rust
//! use retouch_core::PixelBuffer;
//!
//! let mut buf = PixelBuffer::filled(4, 2, [10, 20, 30, 255]);
//! buf.set_pixel(1, 1, [0, 0, 0, 255]).unwrap();
//! assert_eq!(buf.pixel(1, 1).unwrap(), [0, 0, 0, 255]);
//! assert_eq!(buf.pixel(0, 0).unwrap(), [10, 20, 30, 255]);
//! ```

use crate::{CHANNELS, Error, Result};

/// Owned RGBA8 image buffer.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl PixelBuffer {
    /// Creates a transparent black buffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            data: vec![0; width as usize * height as usize * CHANNELS],
            width,
            height,
        }
    }

    /// Creates a buffer with every pixel set to `px`.
    ///
    /// ```rust
    /// use retouch_core::PixelBuffer;
    ///
    /// let gray = PixelBuffer::filled(2, 2, [128, 128, 128, 255]);
    /// assert!(gray.pixels().all(|p| p == [128, 128, 128, 255]));
    /// ```
    pub fn filled(width: u32, height: u32, px: [u8; 4]) -> Self {
        Self {
            data: px.repeat(width as usize * height as usize),
            width,
            height,
        }
    }

    /// Wraps existing RGBA8 bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if `data` is not exactly
    /// `width * height * 4` bytes long, or if that size overflows.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(CHANNELS))
            .ok_or_else(|| Error::invalid_dimensions(width, height, "buffer size overflows"))?;
        if data.len() != expected {
            return Err(Error::invalid_dimensions(
                width,
                height,
                format!("expected {} bytes, got {}", expected, data.len()),
            ));
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Builds a buffer by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> [u8; 4]) -> Self {
        let mut data = Vec::with_capacity(width as usize * height as usize * CHANNELS);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&f(x, y));
            }
        }
        Self {
            data,
            width,
            height,
        }
    }

    /// Buffer width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Buffer height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Number of pixels.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// True when the buffer holds no pixels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Raw interleaved bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Mutable raw interleaved bytes.
    #[inline]
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consumes the buffer, returning its bytes.
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * CHANNELS
    }

    /// Reads the pixel at `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`] outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Result<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return Err(Error::out_of_bounds(x, y, self.width, self.height));
        }
        let i = self.offset(x, y);
        Ok([self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]])
    }

    /// Writes the pixel at `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`] outside the buffer.
    pub fn set_pixel(&mut self, x: u32, y: u32, px: [u8; 4]) -> Result<()> {
        if x >= self.width || y >= self.height {
            return Err(Error::out_of_bounds(x, y, self.width, self.height));
        }
        let i = self.offset(x, y);
        self.data[i..i + CHANNELS].copy_from_slice(&px);
        Ok(())
    }

    /// Iterates pixels in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = [u8; 4]> + '_ {
        self.data
            .chunks_exact(CHANNELS)
            .map(|p| [p[0], p[1], p[2], p[3]])
    }

    /// Mutable 4-byte pixel slices in row-major order.
    pub fn pixels_mut(&mut self) -> std::slice::ChunksExactMut<'_, u8> {
        self.data.chunks_exact_mut(CHANNELS)
    }

    /// Bytes of row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    pub fn row(&self, y: u32) -> &[u8] {
        let stride = self.width as usize * CHANNELS;
        let start = y as usize * stride;
        &self.data[start..start + stride]
    }

    /// Fails unless `other` has the same dimensions.
    pub fn ensure_same_size(&self, other: &PixelBuffer) -> Result<()> {
        if self.dimensions() != other.dimensions() {
            return Err(Error::dimension_mismatch(
                self.dimensions(),
                other.dimensions(),
            ));
        }
        Ok(())
    }
}

impl std::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.data.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_new() {
        let buf = PixelBuffer::new(10, 5);
        assert_eq!(buf.dimensions(), (10, 5));
        assert_eq!(buf.pixel_count(), 50);
        assert_eq!(buf.as_bytes().len(), 200);
        assert!(buf.pixels().all(|p| p == [0, 0, 0, 0]));
    }

    #[test]
    fn test_buffer_from_raw_checks_len() {
        assert!(PixelBuffer::from_raw(2, 2, vec![0; 16]).is_ok());
        let err = PixelBuffer::from_raw(2, 2, vec![0; 15]).unwrap_err();
        assert!(matches!(err, Error::InvalidDimensions { .. }));
    }

    #[test]
    fn test_buffer_set_get_pixel() {
        let mut buf = PixelBuffer::new(3, 3);
        buf.set_pixel(2, 1, [1, 2, 3, 4]).unwrap();
        assert_eq!(buf.pixel(2, 1).unwrap(), [1, 2, 3, 4]);
        assert_eq!(buf.as_bytes()[(1 * 3 + 2) * 4], 1);
        assert!(buf.pixel(3, 0).unwrap_err().is_bounds_error());
        assert!(buf.set_pixel(0, 3, [0; 4]).is_err());
    }

    #[test]
    fn test_buffer_from_fn_row_major() {
        let buf = PixelBuffer::from_fn(2, 2, |x, y| [x as u8, y as u8, 0, 255]);
        let px: Vec<_> = buf.pixels().collect();
        assert_eq!(
            px,
            vec![[0, 0, 0, 255], [1, 0, 0, 255], [0, 1, 0, 255], [1, 1, 0, 255]]
        );
        assert_eq!(buf.row(1), &[0, 1, 0, 255, 1, 1, 0, 255]);
    }

    #[test]
    fn test_ensure_same_size() {
        let a = PixelBuffer::new(2, 3);
        let b = PixelBuffer::new(3, 2);
        assert!(a.ensure_same_size(&a.clone()).is_ok());
        assert!(matches!(
            a.ensure_same_size(&b),
            Err(Error::DimensionMismatch { .. })
        ));
    }
}
