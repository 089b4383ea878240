//! Selection algorithms over binary masks.
//!
//! - **Connected components**: 8-connected labeling of foreground pixels

pub mod components;

pub use components::{label_components, Labeling};
