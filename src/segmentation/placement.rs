//! Placement of extracted regions in output coordinates.
//!
//! The host places the source image somewhere in its own coordinate space.
//! Each region is positioned with the same linear mapping per axis:
//! out = base + pixel * scale

use crate::segmentation::background::PixelCoord;
use crate::segmentation::regions::BoundingBox;

/// Rectangle in output coordinate units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Where and how large the source image is drawn in output coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageFrame {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ImageFrame {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Convert a pick given relative to the frame centre into a raster pixel.
    ///
    /// `cx` grows to the right and `cy` grows upward, the way hosts store a
    /// transform-centre offset. The result is not clamped.
    pub fn resolve_center_pick(&self, cx: f64, cy: f64, raster_width: usize, raster_height: usize) -> PixelCoord {
        let px = ((cx + self.width / 2.0) / self.width) * raster_width as f64;
        let py = ((-cy + self.height / 2.0) / self.height) * raster_height as f64;
        PixelCoord::new(px.floor() as i64, py.floor() as i64)
    }
}

/// Linear pixel-to-output mapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub base_x: f64,
    pub base_y: f64,
    pub scale_x: f64,
    pub scale_y: f64,
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            base_x: 0.0,
            base_y: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }
}

impl Placement {
    pub fn new(base_x: f64, base_y: f64, scale_x: f64, scale_y: f64) -> Self {
        Self {
            base_x,
            base_y,
            scale_x,
            scale_y,
        }
    }

    /// Mapping for a raster of the given size drawn into `frame`.
    pub fn for_frame(frame: &ImageFrame, raster_width: usize, raster_height: usize) -> Self {
        Self {
            base_x: frame.x,
            base_y: frame.y,
            scale_x: frame.width / raster_width as f64,
            scale_y: frame.height / raster_height as f64,
        }
    }

    /// Map a pixel bounding box to output coordinates.
    pub fn place(&self, bbox: &BoundingBox) -> PlacementRect {
        PlacementRect {
            x: self.base_x + bbox.x0 as f64 * self.scale_x,
            y: self.base_y + bbox.y0 as f64 * self.scale_y,
            width: bbox.width() as f64 * self.scale_x,
            height: bbox.height() as f64 * self.scale_y,
        }
    }
}
