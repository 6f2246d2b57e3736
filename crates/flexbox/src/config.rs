//! Layout configuration.

use common::error::{LayoutError, LayoutResult};
use common::geometry::{EdgeSizes, Rect};
use layout::{Axis, ChildBox, ChildHandle, FlexContainer, FlexLayout, OrthogonalAlignment, Transition};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Description of a container and its children.
///
/// Every field has a default, so a JSON file only needs the fields it
/// changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlexConfig {
    /// Container width.
    pub width: f32,
    /// Container height.
    pub height: f32,
    /// Major axis.
    pub axis: Axis,
    /// One flex weight per child.
    pub weights: Vec<u32>,
    /// Gap before, between and after children.
    pub spacing: f32,
    /// Minor-axis alignment.
    pub alignment: OrthogonalAlignment,
    /// Inset applied to every child frame.
    pub padding: EdgeSizes,
    /// Initial child width, read by center and trailing alignment.
    pub child_width: f32,
    /// Request an animated transition for frame application.
    pub animate: bool,
}

impl FlexConfig {
    /// Create a configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON document.
    pub fn from_json(json: &str) -> LayoutResult<Self> {
        serde_json::from_str(json).map_err(|e| LayoutError::config(e.to_string()))
    }

    /// Load a JSON file.
    pub fn load(path: impl AsRef<Path>) -> LayoutResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| LayoutError::config(format!("{}: {e}", path.display())))?;
        Self::from_json(&json)
    }

    /// Set container size.
    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set flex weights.
    pub fn with_weights(mut self, weights: Vec<u32>) -> Self {
        self.weights = weights;
        self
    }

    /// Set spacing.
    pub fn with_spacing(mut self, spacing: f32) -> Self {
        self.spacing = spacing;
        self
    }

    /// Container bounds at the origin.
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    /// Check the configuration before building anything from it.
    pub fn validate(&self) -> LayoutResult<()> {
        if !self.bounds().is_finite() || self.width < 0.0 || self.height < 0.0 {
            return Err(LayoutError::config(format!(
                "container size must be finite and non-negative, got {}x{}",
                self.width, self.height
            )));
        }
        if self.weights.is_empty() {
            return Err(LayoutError::config("at least one flex weight is required"));
        }
        if self.weights.iter().all(|&w| w == 0) {
            return Err(LayoutError::ZeroFlexSum);
        }
        if !self.spacing.is_finite() || self.spacing < 0.0 {
            return Err(LayoutError::config(format!("spacing must be non-negative, got {}", self.spacing)));
        }
        Ok(())
    }

    /// Build the container plus typed handles to its children.
    pub fn build_container(&self) -> (FlexContainer, Vec<Arc<ChildBox>>) {
        let children: Vec<Arc<ChildBox>> = self
            .weights
            .iter()
            .map(|_| ChildBox::with_frame(Rect::new(0.0, 0.0, self.child_width, 0.0)).handle())
            .collect();

        let layout = FlexLayout::new(self.weights.clone())
            .with_spacing(self.spacing)
            .with_alignment(self.alignment);

        let container = FlexContainer::new(children.iter().map(|c| c.clone() as ChildHandle))
            .with_axis(self.axis)
            .with_layout(layout)
            .with_padding(self.padding)
            .with_transition(self.animate.then(Transition::default));

        (container, children)
    }
}

impl Default for FlexConfig {
    fn default() -> Self {
        Self {
            width: 320.0,
            height: 100.0,
            axis: Axis::Horizontal,
            weights: vec![1, 1, 1],
            spacing: 0.0,
            alignment: OrthogonalAlignment::Leading,
            padding: EdgeSizes::ZERO,
            child_width: 0.0,
            animate: true,
        }
    }
}
