//! Foreground mask construction.
//!
//! A pixel is foreground when its RGB color lies farther than `tolerance`
//! (Euclidean distance) from the background reference. The raw threshold
//! is then cleaned in a fixed order:
//!
//! threshold -> open -> close -> fill holes
//!
//! The order is fixed. Reordering the stages changes region shapes.

use log::warn;
use ndarray::{Array2, ArrayView3};
use rayon::prelude::*;

use crate::filters::morphology::{close_mask, fill_holes, open_mask};
use crate::segmentation::background::BackgroundColor;

/// Largest possible RGB distance, sqrt(3 * 255^2).
pub const MAX_TOLERANCE: f64 = 441.672_955_930_063_7;

/// Clip a requested tolerance into `[0, MAX_TOLERANCE]`.
///
/// Out-of-range values are never rejected. NaN is treated as zero.
pub fn clamp_tolerance(tolerance: f64) -> f64 {
    if tolerance.is_nan() {
        return 0.0;
    }
    let clamped = tolerance.clamp(0.0, MAX_TOLERANCE);
    if clamped != tolerance {
        warn!("tolerance {} clipped to {}", tolerance, clamped);
    }
    clamped
}

/// Threshold RGB distance from the background.
///
/// # Arguments
/// * `raster` - RGBA image (height, width, 4)
/// * `background` - Reference color
/// * `tolerance` - Distance threshold, already clamped with [`clamp_tolerance`]
///
/// # Returns
/// Mask with `true` where distance > tolerance
pub fn threshold_distance(raster: ArrayView3<u8>, background: BackgroundColor, tolerance: f64) -> Array2<bool> {
    let (height, width, _) = raster.dim();
    let bg = [background[0] as f64, background[1] as f64, background[2] as f64];

    let mut flat = vec![false; height * width];
    if width > 0 {
        flat.par_chunks_mut(width).enumerate().for_each(|(y, row)| {
            for (x, out) in row.iter_mut().enumerate() {
                let dr = raster[[y, x, 0]] as f64 - bg[0];
                let dg = raster[[y, x, 1]] as f64 - bg[1];
                let db = raster[[y, x, 2]] as f64 - bg[2];
                *out = (dr * dr + dg * dg + db * db).sqrt() > tolerance;
            }
        });
    }

    Array2::from_shape_vec((height, width), flat).expect("Shape mismatch in threshold_distance")
}

/// Build the cleaned foreground mask for a raster.
///
/// Each stage consumes the previous stage's mask and produces a new one.
/// `tolerance` is expected to be clamped already.
pub fn build_foreground_mask(raster: ArrayView3<u8>, background: BackgroundColor, tolerance: f64) -> Array2<bool> {
    let raw = threshold_distance(raster, background, tolerance);
    let opened = open_mask(raw.view());
    drop(raw);
    let closed = close_mask(opened.view());
    drop(opened);
    fill_holes(closed.view())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    fn solid(height: usize, width: usize, rgb: [u8; 3]) -> Array3<u8> {
        let mut img = Array3::<u8>::zeros((height, width, 4));
        for y in 0..height {
            for x in 0..width {
                img[[y, x, 0]] = rgb[0];
                img[[y, x, 1]] = rgb[1];
                img[[y, x, 2]] = rgb[2];
                img[[y, x, 3]] = 255;
            }
        }
        img
    }

    fn paint(img: &mut Array3<u8>, y0: usize, x0: usize, y1: usize, x1: usize, rgb: [u8; 3]) {
        for y in y0..y1 {
            for x in x0..x1 {
                img[[y, x, 0]] = rgb[0];
                img[[y, x, 1]] = rgb[1];
                img[[y, x, 2]] = rgb[2];
            }
        }
    }

    #[test]
    fn test_max_tolerance_constant() {
        assert!((MAX_TOLERANCE - (3.0f64 * 255.0 * 255.0).sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_clamp_tolerance() {
        assert_eq!(clamp_tolerance(-5.0), 0.0);
        assert_eq!(clamp_tolerance(8.0), 8.0);
        assert_eq!(clamp_tolerance(1000.0), MAX_TOLERANCE);
        assert_eq!(clamp_tolerance(f64::INFINITY), MAX_TOLERANCE);
        assert_eq!(clamp_tolerance(f64::NAN), 0.0);
    }

    #[test]
    fn test_threshold_is_strict() {
        let mut img = solid(1, 3, [0, 0, 0]);
        img[[0, 1, 0]] = 3;
        img[[0, 1, 1]] = 4; // distance 5
        img[[0, 2, 0]] = 6; // distance 6

        let mask = threshold_distance(img.view(), [0, 0, 0], 5.0);

        assert!(!mask[[0, 0]]);
        assert!(!mask[[0, 1]]);
        assert!(mask[[0, 2]]);
    }

    #[test]
    fn test_threshold_max_tolerance_selects_nothing() {
        let mut img = solid(2, 2, [0, 0, 0]);
        img[[1, 1, 0]] = 255;
        img[[1, 1, 1]] = 255;
        img[[1, 1, 2]] = 255;

        let mask = threshold_distance(img.view(), [0, 0, 0], clamp_tolerance(10_000.0));

        assert!(mask.iter().all(|&v| !v));
    }

    #[test]
    fn test_negative_tolerance_selects_all_but_exact_matches() {
        let mut img = solid(2, 2, [10, 10, 10]);
        img[[0, 0, 0]] = 11;

        let mask = threshold_distance(img.view(), [10, 10, 10], clamp_tolerance(-3.0));

        assert!(mask[[0, 0]]);
        assert_eq!(mask.iter().filter(|&&v| v).count(), 1);
    }

    #[test]
    fn test_threshold_takes_tolerance_as_given() {
        let img = solid(2, 2, [10, 10, 10]);

        // Clamping is the caller's job, so a raw negative selects every pixel
        let mask = threshold_distance(img.view(), [10, 10, 10], -3.0);

        assert!(mask.iter().all(|&v| v));
    }

    #[test]
    fn test_build_mask_drops_speckle_and_fills_hole() {
        let mut img = solid(13, 13, [255, 255, 255]);
        // 9x9 block with a 3x3 hole
        paint(&mut img, 1, 1, 10, 10, [0, 0, 200]);
        paint(&mut img, 4, 4, 7, 7, [255, 255, 255]);
        // Isolated speck
        paint(&mut img, 11, 11, 12, 12, [0, 0, 0]);

        let mask = build_foreground_mask(img.view(), [255, 255, 255], 8.0);

        assert!(!mask[[11, 11]]);
        for y in 1..10 {
            for x in 1..10 {
                assert!(mask[[y, x]], "({}, {}) should be foreground", x, y);
            }
        }
        assert_eq!(mask.iter().filter(|&&v| v).count(), 81);
    }
}
