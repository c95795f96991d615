//! Contrast Limited Adaptive Histogram Equalization for RGB images.
//!
//! The enhancement runs in LAB space: the lightness channel is equalized
//! tile-by-tile with per-tile contrast clipping and bilinear blending across
//! tile boundaries, while chroma (`a`/`b`) passes through untouched.

pub mod clahe;
pub mod color;
pub mod error;
pub mod image;
pub mod metrics;

pub use clahe::{enhance, DEFAULT_CLIP_LIMIT, DEFAULT_TILE_GRID_SIZE};
pub use error::{ClaheError, ClaheResult};
pub use image::{LabImage, RgbImage};
pub use metrics::{metrics, Metrics};
