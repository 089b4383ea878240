//! Pixel and mask filters used by the region splitter.
//!
//! | Filter | Input | Output |
//! |--------|-------|--------|
//! | un-premultiply | RGBA8 (H, W, 4) | RGBA8 (H, W, 4) |
//! | erode / dilate / open / close | mask (H, W) bool | mask (H, W) bool |
//! | fill holes | mask (H, W) bool | mask (H, W) bool |
//!
//! Every filter returns a new array and leaves its input untouched.

pub mod alpha;
pub mod morphology;
