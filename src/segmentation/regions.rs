//! Region extraction.
//!
//! Each labeled component is cut out of the working raster into its own
//! tightly cropped RGBA image. Pixels inside the crop that belong to other
//! components (or to the background) are made fully transparent.

use log::trace;
use ndarray::{Array3, ArrayView3};

use crate::selection::components::Labeling;

/// Half-open pixel bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoundingBox {
    pub x0: usize,
    pub y0: usize,
    pub x1: usize,
    pub y1: usize,
}

impl BoundingBox {
    pub fn width(&self) -> usize {
        self.x1.saturating_sub(self.x0)
    }

    pub fn height(&self) -> usize {
        self.y1.saturating_sub(self.y0)
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        x >= self.x0 && x < self.x1 && y >= self.y0 && y < self.y1
    }
}

/// One extracted connected component.
#[derive(Debug, Clone)]
pub struct Region {
    /// Label the component carried in the label grid
    pub label: u32,
    /// Bounds within the source raster
    pub bbox: BoundingBox,
    /// Number of pixels in the component
    pub pixel_count: usize,
    /// Cropped RGBA image (bbox.height(), bbox.width(), 4), transparent outside the component
    pub image: Array3<u8>,
}

#[derive(Clone, Copy)]
struct ComponentStats {
    min_x: usize,
    min_y: usize,
    max_x: usize,
    max_y: usize,
    pixel_count: usize,
}

/// Cut every labeled component out of `raster`.
///
/// Components with fewer than `min_pixels` pixels are dropped; a floor of
/// zero keeps everything. Regions are returned in ascending label order.
///
/// # Arguments
/// * `raster` - Working RGBA image (height, width, 4)
/// * `labeling` - Component labels over the same grid
/// * `min_pixels` - Minimum component size to emit
pub fn extract_regions(raster: ArrayView3<u8>, labeling: &Labeling, min_pixels: usize) -> Vec<Region> {
    let stats = component_stats(labeling);
    let mut regions = Vec::with_capacity(stats.len());

    for (idx, stat) in stats.iter().enumerate() {
        let label = (idx + 1) as u32;
        let Some(stat) = stat else {
            continue;
        };

        if min_pixels > 0 && stat.pixel_count < min_pixels {
            trace!(
                "skipping region {} ({} px < floor {})",
                label,
                stat.pixel_count,
                min_pixels
            );
            continue;
        }

        let bbox = BoundingBox {
            x0: stat.min_x,
            y0: stat.min_y,
            x1: stat.max_x + 1,
            y1: stat.max_y + 1,
        };

        regions.push(Region {
            label,
            bbox,
            pixel_count: stat.pixel_count,
            image: carve(raster, labeling, label, &bbox),
        });
    }

    regions
}

/// Bounding box and size of every label in one pass over the grid.
fn component_stats(labeling: &Labeling) -> Vec<Option<ComponentStats>> {
    let mut stats: Vec<Option<ComponentStats>> = vec![None; labeling.count];

    for ((y, x), &label) in labeling.labels.indexed_iter() {
        if label == 0 {
            continue;
        }
        let Some(slot) = stats.get_mut(label as usize - 1) else {
            continue;
        };
        match slot {
            Some(s) => {
                s.min_x = s.min_x.min(x);
                s.min_y = s.min_y.min(y);
                s.max_x = s.max_x.max(x);
                s.max_y = s.max_y.max(y);
                s.pixel_count += 1;
            }
            None => {
                *slot = Some(ComponentStats {
                    min_x: x,
                    min_y: y,
                    max_x: x,
                    max_y: y,
                    pixel_count: 1,
                });
            }
        }
    }

    stats
}

/// Copy the bbox window, zeroing every pixel not carrying `label`.
fn carve(raster: ArrayView3<u8>, labeling: &Labeling, label: u32, bbox: &BoundingBox) -> Array3<u8> {
    let mut output = Array3::<u8>::zeros((bbox.height(), bbox.width(), 4));

    for y in bbox.y0..bbox.y1 {
        for x in bbox.x0..bbox.x1 {
            if labeling.labels[[y, x]] != label {
                continue; // Stays (0, 0, 0, 0)
            }
            for c in 0..4 {
                output[[y - bbox.y0, x - bbox.x0, c]] = raster[[y, x, c]];
            }
        }
    }

    output
}
