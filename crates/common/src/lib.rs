//! Common types shared by the flexbox layout crates.

pub mod error;
pub mod geometry;

pub use error::{LayoutError, LayoutResult};
pub use geometry::{EdgeSizes, Rect};
