//! Axis-normalized geometry.
//!
//! Layout math is written once against a "major" and "minor" axis. An
//! [`AxisRect`] is converted to and from a concrete [`Rect`] with an [`Axis`]
//! deciding which concrete dimension is major.

use common::geometry::Rect;
use serde::{Deserialize, Serialize};

/// Main layout direction of a container.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Children are laid out left to right; width is the major size.
    #[default]
    Horizontal,
    /// Children are laid out top to bottom; height is the major size.
    Vertical,
}

impl Axis {
    pub const ALL: [Axis; 2] = [Axis::Horizontal, Axis::Vertical];
}

/// A rectangle expressed along a major and a minor axis.
///
/// Sizes are expected to be non-negative; this is not enforced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AxisRect {
    pub major_pos: f32,
    pub minor_pos: f32,
    pub major_size: f32,
    pub minor_size: f32,
}

impl AxisRect {
    pub const ZERO: AxisRect = AxisRect {
        major_pos: 0.0,
        minor_pos: 0.0,
        major_size: 0.0,
        minor_size: 0.0,
    };

    #[inline]
    pub const fn new(major_pos: f32, minor_pos: f32, major_size: f32, minor_size: f32) -> Self {
        Self {
            major_pos,
            minor_pos,
            major_size,
            minor_size,
        }
    }

    /// Project a concrete rectangle onto `axis`.
    pub fn from_rect(rect: Rect, axis: Axis) -> Self {
        match axis {
            Axis::Horizontal => Self::new(rect.x, rect.y, rect.width, rect.height),
            Axis::Vertical => Self::new(rect.y, rect.x, rect.height, rect.width),
        }
    }

    /// Inverse of [`AxisRect::from_rect`].
    pub fn to_rect(&self, axis: Axis) -> Rect {
        match axis {
            Axis::Horizontal => Rect::new(self.major_pos, self.minor_pos, self.major_size, self.minor_size),
            Axis::Vertical => Rect::new(self.minor_pos, self.major_pos, self.minor_size, self.major_size),
        }
    }

    #[inline]
    pub fn major_center(&self) -> f32 {
        self.major_pos + self.major_size / 2.0
    }

    /// Move along the major axis so the center lands on `value`.
    #[inline]
    pub fn set_major_center(&mut self, value: f32) {
        self.major_pos = value - self.major_size / 2.0;
    }

    #[inline]
    pub fn minor_center(&self) -> f32 {
        self.minor_pos + self.minor_size / 2.0
    }

    /// Move along the minor axis so the center lands on `value`.
    #[inline]
    pub fn set_minor_center(&mut self, value: f32) {
        self.minor_pos = value - self.minor_size / 2.0;
    }

    #[inline]
    pub fn major_end(&self) -> f32 {
        self.major_pos + self.major_size
    }

    /// Component-wise comparison within `epsilon`.
    pub fn approx_eq(&self, other: &AxisRect, epsilon: f32) -> bool {
        (self.major_pos - other.major_pos).abs() <= epsilon
            && (self.minor_pos - other.minor_pos).abs() <= epsilon
            && (self.major_size - other.major_size).abs() <= epsilon
            && (self.minor_size - other.minor_size).abs() <= epsilon
    }
}
