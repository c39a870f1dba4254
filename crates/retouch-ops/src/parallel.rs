//! Row and pixel iteration, parallel with Rayon when the `parallel` feature is on.
//!
//! Every operation in this crate computes each output row from read-only
//! input, so the parallel and sequential paths produce identical bytes.

use retouch_core::CHANNELS;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Calls `f(y, row)` for every row of an interleaved RGBA8 buffer.
pub(crate) fn for_each_row_mut<F>(data: &mut [u8], width: usize, f: F)
where
    F: Fn(usize, &mut [u8]) + Sync + Send,
{
    let stride = width * CHANNELS;
    if stride == 0 {
        return;
    }

    #[cfg(feature = "parallel")]
    data.par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, row)| f(y, row));

    #[cfg(not(feature = "parallel"))]
    data.chunks_mut(stride)
        .enumerate()
        .for_each(|(y, row)| f(y, row));
}

/// Calls `f(px)` for every 4-byte pixel.
pub(crate) fn for_each_pixel_mut<F>(data: &mut [u8], f: F)
where
    F: Fn(&mut [u8]) + Sync + Send,
{
    #[cfg(feature = "parallel")]
    data.par_chunks_exact_mut(CHANNELS).for_each(f);

    #[cfg(not(feature = "parallel"))]
    data.chunks_exact_mut(CHANNELS).for_each(f);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_visit_in_index_order() {
        let mut data = vec![0u8; 3 * 2 * CHANNELS];
        for_each_row_mut(&mut data, 2, |y, row| row.fill(y as u8));
        assert_eq!(&data[0..8], &[0; 8]);
        assert_eq!(&data[8..16], &[1; 8]);
        assert_eq!(&data[16..24], &[2; 8]);
    }

    #[test]
    fn test_zero_width_is_noop() {
        let mut data: Vec<u8> = Vec::new();
        for_each_row_mut(&mut data, 0, |_, _| panic!("no rows expected"));
    }

    #[test]
    fn test_pixels() {
        let mut data = vec![1u8; 4 * CHANNELS];
        for_each_pixel_mut(&mut data, |px| px[3] = 9);
        assert!(data.chunks_exact(CHANNELS).all(|p| p == [1, 1, 1, 9]));
    }
}
