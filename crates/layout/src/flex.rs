//! Weighted single-line flex layout.
//!
//! Every child receives a share of the container's major size proportional
//! to its flex weight and fills the minor axis completely. Spacing inserts a
//! fixed gap before the first child, between children, and after the last.

use crate::axis::AxisRect;
use crate::child::Child;
use crate::engine::Layout;
use common::error::{LayoutError, LayoutResult};
use serde::{Deserialize, Serialize};
use std::ops::Index;

/// Flex weights in child order.
///
/// A weight of 0 is accepted and yields a zero-length child. The weights must
/// not all be zero by the time container geometry is assigned.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlexSpec(Vec<u32>);

impl FlexSpec {
    pub fn new(weights: Vec<u32>) -> Self {
        Self(weights)
    }

    /// `count` children of weight 1.
    pub fn equal(count: usize) -> Self {
        Self(vec![1; count])
    }

    pub fn weights(&self) -> &[u32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<u32> {
        self.0.get(index).copied()
    }

    /// Sum of all weights.
    pub fn total(&self) -> u64 {
        self.0.iter().map(|&w| u64::from(w)).sum()
    }

    pub fn push(&mut self, weight: u32) {
        self.0.push(weight);
    }

    pub fn remove(&mut self, index: usize) -> Option<u32> {
        (index < self.0.len()).then(|| self.0.remove(index))
    }
}

impl Index<usize> for FlexSpec {
    type Output = u32;

    fn index(&self, index: usize) -> &u32 {
        &self.0[index]
    }
}

impl From<Vec<u32>> for FlexSpec {
    fn from(weights: Vec<u32>) -> Self {
        Self(weights)
    }
}

impl FromIterator<u32> for FlexSpec {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Minor-axis placement applied to every child of a pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrthogonalAlignment {
    /// Flush with the start of the minor axis.
    #[default]
    Leading,
    /// Centered on the minor axis.
    Center,
    /// Flush with the end of the minor axis.
    Trailing,
}

impl OrthogonalAlignment {
    pub const ALL: [OrthogonalAlignment; 3] = [
        OrthogonalAlignment::Leading,
        OrthogonalAlignment::Center,
        OrthogonalAlignment::Trailing,
    ];
}

/// A computed child rectangle together with the weight that sized it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlexNode {
    pub axis_rect: AxisRect,
    pub flex: u32,
}

/// Per-pass cursor state.
///
/// Reset by [`Layout::will_layout`]; `container` and `unit_step` survive
/// between passes and change only when geometry, weights or spacing do.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LayoutSession {
    /// Container rectangle along the layout axis.
    pub container: AxisRect,
    /// Major length of one unit of flex weight.
    pub unit_step: f32,
    /// Major position of the next child.
    pub offset: f32,
    /// Index of the next child.
    pub index: usize,
}

/// Proportional flex layout strategy.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FlexLayout {
    flex: FlexSpec,
    spacing: f32,
    alignment: OrthogonalAlignment,
    session: LayoutSession,
}

impl FlexLayout {
    pub fn new(flex: impl Into<FlexSpec>) -> Self {
        Self {
            flex: flex.into(),
            ..Self::default()
        }
    }

    /// Equal weights for `count` children.
    pub fn equal(count: usize) -> Self {
        Self::new(FlexSpec::equal(count))
    }

    /// Set the gap size. Once geometry has been assigned the unit step
    /// follows; an invalid spacing is reported when geometry is next set.
    pub fn with_spacing(mut self, spacing: f32) -> Self {
        self.spacing = spacing;
        if self.session.container.major_size > 0.0 {
            self.refresh_unit_step().ok();
        }
        self
    }

    pub fn with_alignment(mut self, alignment: OrthogonalAlignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn flex(&self) -> &FlexSpec {
        &self.flex
    }

    pub fn spacing(&self) -> f32 {
        self.spacing
    }

    pub fn alignment(&self) -> OrthogonalAlignment {
        self.alignment
    }

    pub fn session(&self) -> &LayoutSession {
        &self.session
    }

    pub fn unit_step(&self) -> f32 {
        self.session.unit_step
    }

    /// Replace the weights and recompute the unit step.
    pub fn set_flex(&mut self, flex: impl Into<FlexSpec>) -> LayoutResult<()> {
        self.flex = flex.into();
        self.refresh_unit_step()
    }

    /// Change the gap size and recompute the unit step.
    pub fn set_spacing(&mut self, spacing: f32) -> LayoutResult<()> {
        check_spacing(spacing)?;
        self.spacing = spacing;
        self.refresh_unit_step()
    }

    pub fn set_alignment(&mut self, alignment: OrthogonalAlignment) {
        self.alignment = alignment;
    }

    /// Run a complete pass over `children` inside `container`.
    pub fn compute(&mut self, container: AxisRect, children: &[&dyn Child]) -> LayoutResult<Vec<FlexNode>> {
        if children.len() != self.flex.len() {
            return Err(LayoutError::weight_count(self.flex.len(), children.len()));
        }
        self.set_layout_rect(container)?;
        self.will_layout();
        let mut nodes = Vec::with_capacity(children.len());
        for (i, child) in children.iter().enumerate() {
            let flex = self.flex[i];
            nodes.push(FlexNode {
                axis_rect: self.transform(*child),
                flex,
            });
        }
        Ok(nodes)
    }

    fn refresh_unit_step(&mut self) -> LayoutResult<()> {
        check_spacing(self.spacing)?;
        let total = self.flex.total();
        if total == 0 {
            return Err(LayoutError::ZeroFlexSum);
        }

        let gaps = self.spacing * (self.flex.len() as f32 + 1.0);
        let mut available = self.session.container.major_size - gaps;
        if available < 0.0 {
            tracing::warn!(
                major_size = self.session.container.major_size,
                gaps,
                "spacing exceeds container length; children collapse to zero size"
            );
            available = 0.0;
        }

        self.session.unit_step = available / total as f32;
        Ok(())
    }
}

fn check_spacing(spacing: f32) -> LayoutResult<()> {
    if spacing.is_finite() && spacing >= 0.0 {
        Ok(())
    } else {
        Err(LayoutError::config(format!(
            "spacing must be finite and non-negative, got {spacing}"
        )))
    }
}

impl Layout for FlexLayout {
    fn layout_rect(&self) -> AxisRect {
        self.session.container
    }

    fn set_layout_rect(&mut self, rect: AxisRect) -> LayoutResult<()> {
        self.session.container = rect;
        self.refresh_unit_step()
    }

    fn will_layout(&mut self) {
        self.session.index = 0;
        self.session.offset = self.spacing;
    }

    fn transform(&mut self, child: &dyn Child) -> AxisRect {
        let index = self.session.index;
        assert!(
            index < self.flex.len(),
            "flex layout asked for child #{} but only {} weights are configured",
            index + 1,
            self.flex.len()
        );

        let container = self.session.container;
        let mut rect = AxisRect::ZERO;
        rect.minor_size = container.minor_size;
        rect.major_size = self.session.unit_step * self.flex[index] as f32;

        // Center and trailing place the child by its current concrete width,
        // even on the horizontal axis where the minor size is a height.
        match self.alignment {
            OrthogonalAlignment::Leading => rect.minor_pos = container.minor_pos,
            OrthogonalAlignment::Center => {
                let mut probe = AxisRect::ZERO;
                probe.minor_size = child.frame().width;
                probe.set_minor_center(container.minor_center());
                rect.minor_pos = probe.minor_pos;
            }
            OrthogonalAlignment::Trailing => {
                rect.minor_pos = container.minor_size - child.frame().width;
            }
        }

        rect.major_pos = self.session.offset;
        self.session.offset += rect.major_size + self.spacing;
        self.session.index += 1;

        tracing::trace!(index, ?rect, "flex child placed");
        rect
    }

    fn capacity(&self) -> Option<usize> {
        Some(self.flex.len())
    }

    fn boxed_clone(&self) -> Box<dyn Layout> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axis::Axis;
    use crate::child::ChildBox;
    use common::geometry::Rect;

    const EPS: f32 = 1e-4;

    fn children(n: usize) -> Vec<ChildBox> {
        (0..n).map(|_| ChildBox::new()).collect()
    }

    fn run(layout: &mut FlexLayout, container: AxisRect, kids: &[ChildBox]) -> Vec<AxisRect> {
        let refs: Vec<&dyn Child> = kids.iter().map(|c| c as &dyn Child).collect();
        layout
            .compute(container, &refs)
            .unwrap()
            .into_iter()
            .map(|node| node.axis_rect)
            .collect()
    }

    #[test]
    fn test_weights_one_two_three() {
        let container = AxisRect::from_rect(Rect::new(0.0, 0.0, 300.0, 100.0), Axis::Horizontal);
        let mut layout = FlexLayout::new(vec![1, 2, 3]);
        let rects = run(&mut layout, container, &children(3));

        let sizes: Vec<f32> = rects.iter().map(|r| r.major_size).collect();
        let positions: Vec<f32> = rects.iter().map(|r| r.major_pos).collect();
        assert_eq!(sizes, vec![50.0, 100.0, 150.0]);
        assert_eq!(positions, vec![0.0, 50.0, 150.0]);
        assert!(rects.iter().all(|r| r.minor_size == 100.0));
    }

    #[test]
    fn test_proportional_sizes_fill_major_axis() {
        let container = AxisRect::new(0.0, 0.0, 1000.0, 40.0);
        let weights = vec![3, 7, 11];
        let total: u32 = weights.iter().sum();
        let mut layout = FlexLayout::new(weights.clone());
        let rects = run(&mut layout, container, &children(3));

        for (rect, weight) in rects.iter().zip(&weights) {
            let expected = 1000.0 * *weight as f32 / total as f32;
            assert!((rect.major_size - expected).abs() < 1e-3);
        }
        let sum: f32 = rects.iter().map(|r| r.major_size).sum();
        assert!((sum - 1000.0).abs() < 1e-3);
    }

    #[test]
    fn test_sequential_tiling_without_spacing() {
        let container = AxisRect::new(0.0, 0.0, 240.0, 10.0);
        let mut layout = FlexLayout::new(vec![2, 1, 4, 1]);
        let rects = run(&mut layout, container, &children(4));

        assert_eq!(rects[0].major_pos, 0.0);
        let mut expected = 0.0;
        for rect in &rects {
            assert!((rect.major_pos - expected).abs() < EPS);
            expected += rect.major_size;
        }
    }

    #[test]
    fn test_spacing_gaps_are_exact() {
        let spacing = 8.0;
        let container = AxisRect::new(0.0, 0.0, 332.0, 50.0);
        let mut layout = FlexLayout::new(vec![1, 2, 3]).with_spacing(spacing);
        let rects = run(&mut layout, container, &children(3));

        assert_eq!(rects[0].major_pos, spacing);
        for pair in rects.windows(2) {
            let gap = pair[1].major_pos - pair[0].major_end();
            assert!((gap - spacing).abs() < EPS, "gap was {gap}");
        }
        // Trailing gap closes the axis.
        let tail = container.major_size - rects[2].major_end();
        assert!((tail - spacing).abs() < EPS);
        // (332 - 4 * 8) / 6 = 50
        assert!((layout.unit_step() - 50.0).abs() < EPS);
    }

    #[test]
    fn test_spacing_larger_than_container_collapses() {
        let container = AxisRect::new(0.0, 0.0, 10.0, 10.0);
        let mut layout = FlexLayout::equal(2).with_spacing(20.0);
        let rects = run(&mut layout, container, &children(2));
        assert!(rects.iter().all(|r| r.major_size == 0.0));
        assert_eq!(rects[1].major_pos, 40.0);
    }

    #[test]
    fn test_minor_axis_fill() {
        for axis in Axis::ALL {
            let container = AxisRect::from_rect(Rect::new(0.0, 0.0, 120.0, 80.0), axis);
            let mut layout = FlexLayout::new(vec![5, 0, 1]);
            let rects = run(&mut layout, container, &children(3));
            assert!(rects.iter().all(|r| r.minor_size == container.minor_size));
        }
    }

    #[test]
    fn test_zero_weight_child_has_no_length() {
        let container = AxisRect::new(0.0, 0.0, 100.0, 10.0);
        let mut layout = FlexLayout::new(vec![1, 0, 1]);
        let rects = run(&mut layout, container, &children(3));
        assert_eq!(rects[1].major_size, 0.0);
        assert_eq!(rects[1].major_pos, 50.0);
        assert_eq!(rects[2].major_pos, 50.0);
    }

    #[test]
    fn test_alignment_modes() {
        // Vertical axis: minor axis is the concrete width.
        let container = AxisRect::from_rect(Rect::new(0.0, 0.0, 100.0, 300.0), Axis::Vertical);
        assert_eq!(container.minor_size, 100.0);
        let kids = vec![ChildBox::with_frame(Rect::new(0.0, 0.0, 20.0, 20.0))];

        let expected = [
            (OrthogonalAlignment::Leading, 0.0),
            (OrthogonalAlignment::Center, 40.0),
            (OrthogonalAlignment::Trailing, 80.0),
        ];
        for (alignment, minor_pos) in expected {
            let mut layout = FlexLayout::equal(1).with_alignment(alignment);
            let rects = run(&mut layout, container, &kids);
            assert_eq!(rects[0].minor_pos, minor_pos, "{alignment:?}");
        }
    }

    #[test]
    fn test_alignment_reads_width_on_horizontal_axis() {
        // Horizontal axis: minor axis is the concrete height, yet center and
        // trailing still place the child by its width.
        let container = AxisRect::from_rect(Rect::new(0.0, 0.0, 300.0, 100.0), Axis::Horizontal);
        let kids = vec![ChildBox::with_frame(Rect::new(0.0, 0.0, 20.0, 60.0))];

        let mut trailing = FlexLayout::equal(1).with_alignment(OrthogonalAlignment::Trailing);
        let rects = run(&mut trailing, container, &kids);
        assert_eq!(rects[0].minor_pos, container.minor_size - 20.0);
        assert_eq!(rects[0].minor_size, 100.0);

        let mut center = FlexLayout::equal(1).with_alignment(OrthogonalAlignment::Center);
        let rects = run(&mut center, container, &kids);
        assert_eq!(rects[0].minor_pos, container.minor_center() - 10.0);
        assert_eq!(rects[0].minor_size, 100.0);
    }

    #[test]
    fn test_leading_follows_container_origin() {
        let container = AxisRect::new(0.0, 15.0, 100.0, 100.0);
        let mut layout = FlexLayout::equal(1);
        let rects = run(&mut layout, container, &children(1));
        assert_eq!(rects[0].minor_pos, 15.0);
    }

    #[test]
    fn test_consecutive_passes_do_not_leak_state() {
        let kids = children(3);
        let mut layout = FlexLayout::new(vec![1, 2, 3]).with_spacing(2.0);

        let first = run(&mut layout, AxisRect::new(0.0, 0.0, 308.0, 100.0), &kids);
        let second = run(&mut layout, AxisRect::new(0.0, 0.0, 608.0, 50.0), &kids);
        let mut fresh = FlexLayout::new(vec![1, 2, 3]).with_spacing(2.0);
        let expected = run(&mut fresh, AxisRect::new(0.0, 0.0, 608.0, 50.0), &kids);

        assert_eq!(second, expected);
        assert_eq!(first[0].major_pos, 2.0);
        assert_eq!(second[0].major_pos, 2.0);
        assert!((first[2].major_size - 150.0).abs() < EPS);
        assert!((second[2].major_size - 300.0).abs() < EPS);
    }

    #[test]
    fn test_manual_protocol_matches_compute() {
        let kids = children(2);
        let container = AxisRect::new(0.0, 0.0, 90.0, 30.0);
        let mut layout = FlexLayout::new(vec![1, 2]);
        layout.set_layout_rect(container).unwrap();
        layout.will_layout();
        let a = layout.transform(&kids[0]);
        let b = layout.transform(&kids[1]);
        assert_eq!(a, AxisRect::new(0.0, 0.0, 30.0, 30.0));
        assert_eq!(b, AxisRect::new(30.0, 0.0, 60.0, 30.0));
        assert_eq!(layout.session().index, 2);
    }

    #[test]
    fn test_zero_flex_sum_is_rejected() {
        let mut layout = FlexLayout::new(vec![0, 0]);
        let err = layout.set_layout_rect(AxisRect::new(0.0, 0.0, 10.0, 10.0)).unwrap_err();
        assert_eq!(err, LayoutError::ZeroFlexSum);
        assert_eq!(FlexLayout::default().set_spacing(1.0), Err(LayoutError::ZeroFlexSum));
    }

    #[test]
    fn test_changing_weights_recomputes_unit_step() {
        let mut layout = FlexLayout::equal(2);
        layout.set_layout_rect(AxisRect::new(0.0, 0.0, 100.0, 10.0)).unwrap();
        assert_eq!(layout.unit_step(), 50.0);
        layout.set_flex(vec![1, 3]).unwrap();
        assert_eq!(layout.unit_step(), 25.0);
        layout.set_spacing(5.0).unwrap();
        assert!((layout.unit_step() - 21.25).abs() < EPS);
    }

    #[test]
    fn test_invalid_spacing_is_rejected() {
        let container = AxisRect::new(0.0, 0.0, 100.0, 10.0);
        for spacing in [f32::NAN, f32::INFINITY, -10.0] {
            let mut layout = FlexLayout::equal(2).with_spacing(spacing);
            let err = layout.set_layout_rect(container).unwrap_err();
            assert!(matches!(err, LayoutError::Config(_)), "{spacing}: {err:?}");
        }

        let mut layout = FlexLayout::equal(2).with_spacing(4.0);
        layout.set_layout_rect(container).unwrap();
        assert!(matches!(layout.set_spacing(-1.0), Err(LayoutError::Config(_))));
        assert_eq!(layout.spacing(), 4.0);
        assert_eq!(layout.unit_step(), 44.0);
    }

    #[test]
    fn test_builder_spacing_follows_assigned_geometry() {
        let mut layout = FlexLayout::equal(2);
        layout.set_layout_rect(AxisRect::new(0.0, 0.0, 100.0, 10.0)).unwrap();
        assert_eq!(layout.unit_step(), 50.0);

        let layout = layout.with_spacing(10.0);
        assert_eq!(layout.unit_step(), 35.0);
    }

    #[test]
    fn test_compute_rejects_wrong_child_count() {
        let mut layout = FlexLayout::equal(2);
        let kids = children(3);
        let refs: Vec<&dyn Child> = kids.iter().map(|c| c as &dyn Child).collect();
        let err = layout.compute(AxisRect::new(0.0, 0.0, 10.0, 10.0), &refs).unwrap_err();
        assert_eq!(err, LayoutError::weight_count(2, 3));
    }

    #[test]
    #[should_panic(expected = "only 1 weights are configured")]
    fn test_transform_overrun_panics() {
        let kid = ChildBox::new();
        let mut layout = FlexLayout::equal(1);
        layout.set_layout_rect(AxisRect::new(0.0, 0.0, 10.0, 10.0)).unwrap();
        layout.will_layout();
        layout.transform(&kid);
        layout.transform(&kid);
    }

    #[test]
    fn test_flex_spec_helpers() {
        let mut spec: FlexSpec = [1, 2].into_iter().collect();
        spec.push(3);
        assert_eq!(spec.total(), 6);
        assert_eq!(spec.remove(0), Some(1));
        assert_eq!(spec.remove(9), None);
        assert_eq!(spec.weights(), &[2, 3]);
        let json = serde_json::to_string(&spec).unwrap();
        assert_eq!(json, "[2,3]");
    }
}
