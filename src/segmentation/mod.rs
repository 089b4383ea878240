//! Foreground/background segmentation and region splitting.
//!
//! ## Stages
//! 1. **Background** - border median, manual hex color, or point sample (`background.rs`)
//! 2. **Mask** - distance threshold cleaned by open, close and hole filling (`mask.rs`)
//! 3. **Labeling** - 8-connected components (`crate::selection`)
//! 4. **Regions** - per-component crops with transparent surroundings (`regions.rs`)
//! 5. **Placement** - linear mapping into output coordinates (`placement.rs`)
//!
//! `pipeline.rs` runs the stages in that order.

pub mod background;
pub mod mask;
pub mod pipeline;
pub mod placement;
pub mod regions;

use ndarray::ArrayView3;

use crate::error::{Result, SplitError};

/// Check that a raster is RGBA (height, width, 4) with at least one pixel.
///
/// # Errors
/// `InvalidShape` carrying the raster's actual dimensions.
pub fn validate_raster(raster: ArrayView3<u8>) -> Result<()> {
    let (height, width, channels) = raster.dim();
    if height == 0 || width == 0 || channels != 4 {
        return Err(SplitError::InvalidShape {
            height,
            width,
            channels,
        });
    }
    Ok(())
}
