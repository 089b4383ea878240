//! Background color estimation.
//!
//! Three policies pick the single reference color the foreground mask is
//! measured against:
//! - **Border**: per-channel median of every pixel on the raster's edge
//! - **Manual**: a caller-supplied hex string (#RGB, #RRGGBB, #RRRGGGBBB, ...)
//! - **Point sample**: the color of one pixel, clamped into bounds

use log::debug;
use ndarray::ArrayView3;

use crate::error::{Result, SplitError};
use crate::segmentation::validate_raster;

/// Reference background color (R, G, B).
pub type BackgroundColor = [u8; 3];

/// Manual color used when the caller selects manual mode without a value.
pub const DEFAULT_MANUAL_COLOR: &str = "#000000";

/// A pixel position in raster space.
///
/// Signed so a collaborator can pass a pick that landed outside the image;
/// sampling clamps it into bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelCoord {
    pub x: i64,
    pub y: i64,
}

impl PixelCoord {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

/// How the background color is determined.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BackgroundMode {
    /// Median of the raster's border pixels
    #[default]
    Border,
    /// Explicit hex color string
    Manual(String),
    /// Color of a single sampled pixel
    PointSample(Option<PixelCoord>),
}

impl BackgroundMode {
    /// Build a mode from its option name as the host tool spells it.
    ///
    /// Accepts `border`, `manual` and `pick` (or `point`). Parameters are
    /// validated later by [`estimate_background`], so a missing coordinate
    /// or malformed color is reported there.
    pub fn parse(name: &str, color: Option<&str>, coord: Option<PixelCoord>) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "border" => Ok(BackgroundMode::Border),
            "manual" => Ok(BackgroundMode::Manual(
                color.unwrap_or(DEFAULT_MANUAL_COLOR).to_string(),
            )),
            "pick" | "point" => Ok(BackgroundMode::PointSample(coord)),
            _ => Err(SplitError::InvalidMode {
                name: name.to_string(),
            }),
        }
    }

    /// Option name of this mode.
    pub fn name(&self) -> &'static str {
        match self {
            BackgroundMode::Border => "border",
            BackgroundMode::Manual(_) => "manual",
            BackgroundMode::PointSample(_) => "pick",
        }
    }
}

/// Determine the background color of an RGBA raster.
///
/// # Arguments
/// * `raster` - Un-premultiplied RGBA image (height, width, 4), non-empty
/// * `mode` - Estimation policy
///
/// # Errors
/// `InvalidShape` for a raster that is not (height, width, 4) or is empty,
/// `InvalidColorFormat` for a malformed manual color,
/// `MissingSampleCoordinate` for point sampling without a coordinate.
pub fn estimate_background(raster: ArrayView3<u8>, mode: &BackgroundMode) -> Result<BackgroundColor> {
    validate_raster(raster)?;
    let color = match mode {
        BackgroundMode::Border => border_median(raster),
        BackgroundMode::Manual(value) => parse_hex_color(value)?,
        BackgroundMode::PointSample(Some(coord)) => sample_point(raster, *coord),
        BackgroundMode::PointSample(None) => return Err(SplitError::MissingSampleCoordinate),
    };

    debug!("background mode {} -> {:?}", mode.name(), color);
    Ok(color)
}

// ============================================================================
// Border
// ============================================================================

/// Per-channel median of the raster's border pixels.
///
/// Each edge pixel is sampled once, corners included. With an even number
/// of samples the two middle values are averaged and rounded half up.
pub fn border_median(raster: ArrayView3<u8>) -> BackgroundColor {
    let (height, width, _) = raster.dim();
    let mut samples: [Vec<u8>; 3] = [Vec::new(), Vec::new(), Vec::new()];

    for y in 0..height {
        for x in 0..width {
            if y != 0 && y != height - 1 && x != 0 && x != width - 1 {
                continue;
            }
            for (c, channel) in samples.iter_mut().enumerate() {
                channel.push(raster[[y, x, c]]);
            }
        }
    }

    let mut color = [0u8; 3];
    for (c, channel) in samples.iter_mut().enumerate() {
        color[c] = median_u8(channel);
    }
    color
}

fn median_u8(values: &mut [u8]) -> u8 {
    if values.is_empty() {
        return 0;
    }
    values.sort_unstable();
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        values[mid]
    } else {
        ((values[mid - 1] as u16 + values[mid] as u16 + 1) / 2) as u8
    }
}

// ============================================================================
// Manual
// ============================================================================

/// Parse a hex color with one equal-width digit group per channel.
///
/// Surrounding whitespace and a leading `#` are ignored. Each group of
/// width `w` is scaled to 8 bits: a single digit is repeated (`F` -> `FF`),
/// wider groups are right-shifted by `4 * (w - 2)` bits, which keeps their
/// two leading digits.
///
/// # Errors
/// `InvalidColorFormat` when the digit count is zero or not divisible by
/// three, or when any character is not a hex digit.
pub fn parse_hex_color(value: &str) -> Result<BackgroundColor> {
    let invalid = || SplitError::InvalidColorFormat {
        value: value.to_string(),
    };

    let trimmed = value.trim();
    let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);

    if digits.is_empty() || digits.len() % 3 != 0 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    let width = digits.len() / 3;
    let mut color = [0u8; 3];
    for (c, out) in color.iter_mut().enumerate() {
        let group = &digits[c * width..(c + 1) * width];
        *out = if width == 1 {
            let nibble = u8::from_str_radix(group, 16).map_err(|_| invalid())?;
            nibble * 17
        } else {
            // Shifting out all but the two leading digits
            u8::from_str_radix(&group[..2], 16).map_err(|_| invalid())?
        };
    }

    Ok(color)
}

// ============================================================================
// Point sample
// ============================================================================

/// Read the color at `coord`, clamped into the raster.
pub fn sample_point(raster: ArrayView3<u8>, coord: PixelCoord) -> BackgroundColor {
    let (height, width, _) = raster.dim();
    let x = coord.x.clamp(0, width.saturating_sub(1) as i64) as usize;
    let y = coord.y.clamp(0, height.saturating_sub(1) as i64) as usize;

    [raster[[y, x, 0]], raster[[y, x, 1]], raster[[y, x, 2]]]
}
