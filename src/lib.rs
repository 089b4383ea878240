//! RegionSplit
//!
//! Splits a raster image into its foreground regions: infers (or accepts) a
//! background color, builds a cleaned foreground mask, labels the connected
//! components, and cuts each one out as its own alpha-masked image with a
//! placement rectangle in the host's coordinate space.
//!
//! ## Image Format
//! Input rasters are RGBA8 arrays of shape (height, width, 4). Color may be
//! premultiplied by alpha; the pipeline normalizes a working copy and never
//! touches the caller's array.
//!
//! ## Pipeline
//! 1. Un-premultiply alpha (`filters::alpha`)
//! 2. Estimate background (`segmentation::background`)
//! 3. Threshold, open, close, fill holes (`segmentation::mask`, `filters::morphology`)
//! 4. Label 8-connected components (`selection::components`)
//! 5. Extract regions, apply pixel floor (`segmentation::regions`)
//! 6. Map to output coordinates (`segmentation::placement`)
//!
//! ```
//! use ndarray::Array3;
//! use regionsplit::{split_regions, Placement, SplitOptions};
//!
//! let mut image = Array3::<u8>::from_elem((16, 16, 4), 255);
//! for y in 4..10 {
//!     for x in 5..12 {
//!         image[[y, x, 0]] = 0;
//!     }
//! }
//!
//! let outcome = split_regions(image.view(), &SplitOptions::default()).unwrap();
//! assert_eq!(outcome.regions.len(), 1);
//!
//! let rects = outcome.placements(&Placement::new(0.0, 0.0, 0.5, 0.5));
//! assert_eq!(rects[0].width, 3.5);
//! ```

pub mod error;
pub mod filters;
pub mod segmentation;
pub mod selection;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use error::{Result, SplitError};
pub use segmentation::background::{BackgroundColor, BackgroundMode, PixelCoord};
pub use segmentation::mask::MAX_TOLERANCE;
pub use segmentation::pipeline::{split_regions, PlacedRegion, SplitOptions, SplitOutcome};
pub use segmentation::placement::{ImageFrame, Placement, PlacementRect};
pub use segmentation::regions::{BoundingBox, Region};

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use numpy::{IntoPyArray, PyArray3, PyReadonlyArray3};
    use pyo3::exceptions::PyValueError;
    use pyo3::prelude::*;

    use crate::error::SplitError;
    use crate::segmentation::background::{estimate_background, BackgroundMode, PixelCoord};
    use crate::segmentation::pipeline::{split_regions as split_regions_impl, SplitOptions};
    use crate::segmentation::placement::Placement;
    use crate::segmentation::regions::BoundingBox;
    use crate::segmentation::validate_raster;
    use crate::filters::alpha::unpremultiply_rgba;

    type PyRegion<'py> = ((usize, usize, usize, usize), usize, Bound<'py, PyArray3<u8>>);

    fn to_py_err(err: SplitError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }

    fn background_mode(
        bg_mode: &str,
        bg_color: Option<&str>,
        pick: Option<(i64, i64)>,
    ) -> PyResult<BackgroundMode> {
        let coord = pick.map(|(x, y)| PixelCoord::new(x, y));
        BackgroundMode::parse(bg_mode, bg_color, coord).map_err(to_py_err)
    }

    // ========================================================================
    // Region Splitting
    // ========================================================================

    /// Split an RGBA u8 image into its foreground regions.
    ///
    /// # Arguments
    /// * `image` - RGBA image (height, width, 4)
    /// * `bg_mode` - "border", "manual" or "pick"
    /// * `bg_color` - Hex color for manual mode (default "#000000")
    /// * `pick` - (x, y) pixel for pick mode
    /// * `tolerance` - RGB distance threshold, clipped to 0..441.67
    /// * `min_pixels` - Drop regions smaller than this (0 = keep all)
    ///
    /// # Returns
    /// List of ((x0, y0, x1, y1), pixel_count, rgba_crop) tuples
    #[pyfunction]
    #[pyo3(signature = (image, bg_mode="border", bg_color=None, pick=None, tolerance=8.0, min_pixels=0))]
    pub fn split_regions<'py>(
        py: Python<'py>,
        image: Option<PyReadonlyArray3<'py, u8>>,
        bg_mode: &str,
        bg_color: Option<&str>,
        pick: Option<(i64, i64)>,
        tolerance: f64,
        min_pixels: usize,
    ) -> PyResult<Vec<PyRegion<'py>>> {
        let image = image.ok_or_else(|| to_py_err(SplitError::EmptySelectionOrWrongType))?;
        let options = SplitOptions {
            background: background_mode(bg_mode, bg_color, pick)?,
            tolerance,
            min_pixels,
        };

        let outcome = split_regions_impl(image.as_array(), &options).map_err(to_py_err)?;

        Ok(outcome
            .regions
            .into_iter()
            .map(|r| {
                let b = r.bbox;
                ((b.x0, b.y0, b.x1, b.y1), r.pixel_count, r.image.into_pyarray(py))
            })
            .collect())
    }

    /// Estimate the background color of an RGBA u8 image.
    ///
    /// Returns (r, g, b).
    #[pyfunction]
    #[pyo3(signature = (image, bg_mode="border", bg_color=None, pick=None))]
    pub fn background_color<'py>(
        image: PyReadonlyArray3<'py, u8>,
        bg_mode: &str,
        bg_color: Option<&str>,
        pick: Option<(i64, i64)>,
    ) -> PyResult<(u8, u8, u8)> {
        let mode = background_mode(bg_mode, bg_color, pick)?;
        validate_raster(image.as_array()).map_err(to_py_err)?;
        let working = unpremultiply_rgba(image.as_array());
        let [r, g, b] = estimate_background(working.view(), &mode).map_err(to_py_err)?;
        Ok((r, g, b))
    }

    /// Map a pixel bounding box (x0, y0, x1, y1) to output coordinates.
    ///
    /// Returns (x, y, width, height).
    #[pyfunction]
    pub fn placement_rect(
        bbox: (usize, usize, usize, usize),
        base_x: f64,
        base_y: f64,
        scale_x: f64,
        scale_y: f64,
    ) -> (f64, f64, f64, f64) {
        let (x0, y0, x1, y1) = bbox;
        let rect = Placement::new(base_x, base_y, scale_x, scale_y).place(&BoundingBox { x0, y0, x1, y1 });
        (rect.x, rect.y, rect.width, rect.height)
    }

    /// RegionSplit Rust extension module
    #[pymodule]
    pub fn regionsplit(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_function(wrap_pyfunction!(split_regions, m)?)?;
        m.add_function(wrap_pyfunction!(background_color, m)?)?;
        m.add_function(wrap_pyfunction!(placement_rect, m)?)?;
        Ok(())
    }
}

#[cfg(feature = "python")]
pub use python::regionsplit;
