//! End-to-end region splitting.
//!
//! un-premultiply -> background -> mask (threshold, open, close, fill holes)
//! -> label -> extract
//!
//! Each run is a single pass over its own working copies. Nothing is shared
//! between calls.

use log::{debug, info};
use ndarray::ArrayView3;

use crate::error::Result;
use crate::filters::alpha::unpremultiply_rgba;
use crate::segmentation::background::{estimate_background, BackgroundColor, BackgroundMode};
use crate::segmentation::mask::{build_foreground_mask, clamp_tolerance};
use crate::segmentation::placement::{Placement, PlacementRect};
use crate::segmentation::regions::{extract_regions, Region};
use crate::segmentation::validate_raster;
use crate::selection::components::label_components;

/// Default color-distance tolerance.
pub const DEFAULT_TOLERANCE: f64 = 8.0;

/// Parameters for one split.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitOptions {
    /// Background estimation policy
    pub background: BackgroundMode,
    /// RGB distance above which a pixel is foreground (clamped, never rejected)
    pub tolerance: f64,
    /// Regions smaller than this are dropped; 0 keeps everything
    pub min_pixels: usize,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            background: BackgroundMode::Border,
            tolerance: DEFAULT_TOLERANCE,
            min_pixels: 0,
        }
    }
}

impl SplitOptions {
    pub fn with_background(mut self, background: BackgroundMode) -> Self {
        self.background = background;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_min_pixels(mut self, min_pixels: usize) -> Self {
        self.min_pixels = min_pixels;
        self
    }
}

/// Result of a split.
#[derive(Debug, Clone)]
pub struct SplitOutcome {
    /// Background color the mask was measured against
    pub background: BackgroundColor,
    /// Tolerance after clamping
    pub tolerance: f64,
    /// Connected components found before the pixel floor was applied
    pub labels_found: usize,
    /// Emitted regions
    pub regions: Vec<Region>,
}

/// A region together with its output rectangle.
#[derive(Debug, Clone)]
pub struct PlacedRegion {
    pub region: Region,
    pub rect: PlacementRect,
}

impl SplitOutcome {
    /// Output rectangles for every region, in region order.
    pub fn placements(&self, placement: &Placement) -> Vec<PlacementRect> {
        self.regions.iter().map(|r| placement.place(&r.bbox)).collect()
    }

    /// Pair every region with its output rectangle.
    pub fn into_placed(self, placement: &Placement) -> Vec<PlacedRegion> {
        self.regions
            .into_iter()
            .map(|region| {
                let rect = placement.place(&region.bbox);
                PlacedRegion { region, rect }
            })
            .collect()
    }
}

/// Split an RGBA raster into its foreground regions.
///
/// # Arguments
/// * `raster` - Decoded RGBA image (height, width, 4); not modified
/// * `options` - Background mode, tolerance and pixel floor
///
/// # Errors
/// Parameter validation only, before any mask is built: `InvalidShape`,
/// `InvalidColorFormat`, `MissingSampleCoordinate`.
pub fn split_regions(raster: ArrayView3<u8>, options: &SplitOptions) -> Result<SplitOutcome> {
    validate_raster(raster)?;
    let (height, width, _) = raster.dim();

    let working = unpremultiply_rgba(raster);
    let background = estimate_background(working.view(), &options.background)?;
    let tolerance = clamp_tolerance(options.tolerance);
    debug!("background {:?}, tolerance {}", background, tolerance);

    let mask = build_foreground_mask(working.view(), background, tolerance);
    let labeling = label_components(mask.view());
    drop(mask);
    debug!("found {} connected regions", labeling.count);

    let regions = extract_regions(working.view(), &labeling, options.min_pixels);
    info!("split {}x{} image into {} regions", width, height, regions.len());

    Ok(SplitOutcome {
        background,
        tolerance,
        labels_found: labeling.count,
        regions,
    })
}
