//! Alpha un-premultiplication.
//!
//! Decoded rasters may store color already scaled by alpha. Segmentation
//! compares true colors, so the working raster is normalized first:
//! RGB_out = clamp(RGB_in / (A / 255), 0, 255)
//!
//! Fully transparent pixels keep their stored color; there is nothing to
//! divide by and their color is never visible.

use ndarray::{Array3, ArrayView3};
use rayon::prelude::*;

/// Un-premultiply an RGBA u8 image into a new working raster.
///
/// Alpha is copied unchanged. Results are truncated toward zero after
/// clipping, so fully opaque input is returned exactly as given.
///
/// # Arguments
/// * `input` - RGBA image (height, width, 4)
///
/// # Returns
/// New RGBA image with straight (non-premultiplied) color
pub fn unpremultiply_rgba(input: ArrayView3<u8>) -> Array3<u8> {
    let (height, width, channels) = input.dim();
    let mut flat: Vec<u8> = input.iter().copied().collect();

    if width > 0 && channels == 4 {
        flat.par_chunks_mut(width * channels).for_each(|row| {
            for px in row.chunks_exact_mut(4) {
                let a = px[3];
                if a == 0 || a == 255 {
                    continue;
                }
                let scale = a as f64 / 255.0;
                for c in px.iter_mut().take(3) {
                    *c = (*c as f64 / scale).clamp(0.0, 255.0) as u8;
                }
            }
        });
    }

    Array3::from_shape_vec((height, width, channels), flat)
        .expect("Shape mismatch in unpremultiply_rgba")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opaque_input_unchanged() {
        let mut img = Array3::<u8>::zeros((3, 4, 4));
        for y in 0..3 {
            for x in 0..4 {
                img[[y, x, 0]] = (y * 40 + x * 7) as u8;
                img[[y, x, 1]] = 200 - (x * 13) as u8;
                img[[y, x, 2]] = 17;
                img[[y, x, 3]] = 255;
            }
        }

        let result = unpremultiply_rgba(img.view());

        assert_eq!(result, img);
    }

    #[test]
    fn test_half_alpha_doubles_color() {
        let mut img = Array3::<u8>::zeros((1, 1, 4));
        img[[0, 0, 0]] = 64;
        img[[0, 0, 1]] = 200;
        img[[0, 0, 2]] = 0;
        img[[0, 0, 3]] = 128;

        let result = unpremultiply_rgba(img.view());

        assert_eq!(result[[0, 0, 0]], 127);
        assert_eq!(result[[0, 0, 1]], 255); // clipped
        assert_eq!(result[[0, 0, 2]], 0);
        assert_eq!(result[[0, 0, 3]], 128);
    }

    #[test]
    fn test_transparent_pixels_keep_color() {
        let mut img = Array3::<u8>::zeros((1, 2, 4));
        img[[0, 0, 0]] = 9;
        img[[0, 0, 1]] = 8;
        img[[0, 0, 2]] = 7;
        img[[0, 0, 3]] = 0;

        let result = unpremultiply_rgba(img.view());

        assert_eq!(result[[0, 0, 0]], 9);
        assert_eq!(result[[0, 0, 1]], 8);
        assert_eq!(result[[0, 0, 2]], 7);
        assert_eq!(result[[0, 0, 3]], 0);
    }

    #[test]
    fn test_does_not_mutate_input() {
        let mut img = Array3::<u8>::zeros((2, 2, 4));
        img[[1, 1, 0]] = 100;
        img[[1, 1, 3]] = 128;
        let before = img.clone();

        let result = unpremultiply_rgba(img.view());

        assert_eq!(img, before);
        assert_eq!(result[[1, 1, 0]], 199);
    }
}
