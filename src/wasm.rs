//! WebAssembly exports for region splitting.
//!
//! These functions are exposed to JavaScript via wasm-bindgen. Images cross
//! the boundary as flat RGBA u8 buffers (length = width * height * 4).

use ndarray::ArrayView3;
use wasm_bindgen::prelude::*;

use crate::error::SplitError;
use crate::segmentation::background::{BackgroundMode, PixelCoord};
use crate::segmentation::pipeline::{split_regions, SplitOptions};
use crate::segmentation::placement::Placement;

/// One extracted region as seen from JavaScript.
#[wasm_bindgen]
pub struct WasmRegion {
    x0: u32,
    y0: u32,
    x1: u32,
    y1: u32,
    pixel_count: u32,
    pixels: Vec<u8>,
}

#[wasm_bindgen]
impl WasmRegion {
    #[wasm_bindgen(getter)]
    pub fn x0(&self) -> u32 {
        self.x0
    }

    #[wasm_bindgen(getter)]
    pub fn y0(&self) -> u32 {
        self.y0
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.x1 - self.x0
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.y1 - self.y0
    }

    #[wasm_bindgen(getter, js_name = pixelCount)]
    pub fn pixel_count(&self) -> u32 {
        self.pixel_count
    }

    /// Flat RGBA bytes of the cropped region (width * height * 4).
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }

    /// Output rectangle [x, y, width, height] for the given mapping.
    pub fn placement(&self, base_x: f64, base_y: f64, scale_x: f64, scale_y: f64) -> Vec<f64> {
        let placement = Placement::new(base_x, base_y, scale_x, scale_y);
        let rect = placement.place(&crate::segmentation::regions::BoundingBox {
            x0: self.x0 as usize,
            y0: self.y0 as usize,
            x1: self.x1 as usize,
            y1: self.y1 as usize,
        });
        vec![rect.x, rect.y, rect.width, rect.height]
    }
}

/// Split a flat RGBA u8 image into its foreground regions.
///
/// # Arguments
/// * `data` - Flat array of RGBA bytes (length = width * height * 4)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `bg_mode` - "border", "manual" or "pick"
/// * `bg_color` - Hex color for manual mode
/// * `pick_x`, `pick_y` - Pixel for pick mode
/// * `tolerance` - RGB distance threshold
/// * `min_pixels` - Drop regions smaller than this (0 = keep all)
#[wasm_bindgen]
#[allow(clippy::too_many_arguments)]
pub fn split_regions_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    bg_mode: &str,
    bg_color: Option<String>,
    pick_x: Option<i32>,
    pick_y: Option<i32>,
    tolerance: f64,
    min_pixels: usize,
) -> Result<Vec<WasmRegion>, JsError> {
    let input = ArrayView3::from_shape((height, width, 4), data).map_err(|_| SplitError::InvalidShape {
        height,
        width,
        channels: data.len() / (width * height).max(1),
    })?;

    let coord = match (pick_x, pick_y) {
        (Some(x), Some(y)) => Some(PixelCoord::new(x as i64, y as i64)),
        _ => None,
    };
    let options = SplitOptions {
        background: BackgroundMode::parse(bg_mode, bg_color.as_deref(), coord)?,
        tolerance,
        min_pixels,
    };

    let outcome = split_regions(input, &options)?;

    Ok(outcome
        .regions
        .into_iter()
        .map(|r| WasmRegion {
            x0: r.bbox.x0 as u32,
            y0: r.bbox.y0 as u32,
            x1: r.bbox.x1 as u32,
            y1: r.bbox.y1 as u32,
            pixel_count: r.pixel_count as u32,
            pixels: r.image.into_raw_vec_and_offset().0,
        })
        .collect())
}
