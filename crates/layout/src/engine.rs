//! Layout strategy protocol and the pass driver.
//!
//! A pass runs in two halves. [`PassRequest::prepare`] assigns the container
//! geometry, resets the strategy cursor and snapshots the children; it is
//! cheap and runs wherever the bounds change was observed.
//! [`PassRequest::compute`] then walks the snapshot, asks the strategy for
//! one rectangle per child and converts the results into padded concrete
//! frames. The second half may run on another thread.

use crate::axis::{Axis, AxisRect};
use crate::child::{Child, ChildHandle, ChildId};
use common::error::{LayoutError, LayoutResult};
use common::geometry::{EdgeSizes, Rect};
use std::fmt;

/// A layout strategy.
///
/// Implementations hold configuration plus per-pass cursor state. The
/// protocol for one pass is: [`set_layout_rect`](Layout::set_layout_rect),
/// [`will_layout`](Layout::will_layout), then exactly one
/// [`transform`](Layout::transform) per child in child order.
pub trait Layout: Send + fmt::Debug {
    /// Container geometry along the layout axis.
    fn layout_rect(&self) -> AxisRect;

    /// Assign container geometry and recompute anything derived from it.
    fn set_layout_rect(&mut self, rect: AxisRect) -> LayoutResult<()>;

    /// Reset the per-pass cursor.
    fn will_layout(&mut self);

    /// Produce the next child's rectangle and advance the cursor.
    ///
    /// Calling this more often than the strategy has room for is a
    /// programming error and may panic.
    fn transform(&mut self, child: &dyn Child) -> AxisRect;

    /// Number of children one pass can place, if fixed.
    fn capacity(&self) -> Option<usize> {
        None
    }

    /// Copy the strategy so a pass can own isolated state.
    fn boxed_clone(&self) -> Box<dyn Layout>;
}

impl Clone for Box<dyn Layout> {
    fn clone(&self) -> Self {
        self.boxed_clone()
    }
}

/// One child's outcome in a pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PassFrame {
    pub id: ChildId,
    /// Rectangle reported by the strategy.
    pub axis_rect: AxisRect,
    /// Concrete frame after the padding inset.
    pub frame: Rect,
}

/// The result of a computed pass, ready to be applied.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutPass {
    pub generation: u64,
    pub bounds: Rect,
    pub frames: Vec<PassFrame>,
}

impl LayoutPass {
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Frame computed for `id`, if it was part of the snapshot.
    pub fn frame_of(&self, id: ChildId) -> Option<Rect> {
        self.frames.iter().find(|f| f.id == id).map(|f| f.frame)
    }
}

/// A prepared pass: strategy copy, geometry and child snapshot.
pub struct PassRequest {
    generation: u64,
    bounds: Rect,
    axis: Axis,
    padding: EdgeSizes,
    layout: Box<dyn Layout>,
    snapshot: Vec<(ChildId, ChildHandle)>,
}

impl PassRequest {
    /// Prepare a pass against a copy of `layout`.
    ///
    /// Fails when the bounds are not finite, when the strategy cannot place
    /// exactly `snapshot.len()` children, or when the strategy rejects the
    /// geometry.
    pub fn prepare(
        generation: u64,
        bounds: Rect,
        axis: Axis,
        padding: EdgeSizes,
        layout: &dyn Layout,
        snapshot: Vec<(ChildId, ChildHandle)>,
    ) -> LayoutResult<Self> {
        if !bounds.is_finite() {
            return Err(LayoutError::non_finite(bounds));
        }
        if let Some(capacity) = layout.capacity() {
            if capacity != snapshot.len() {
                return Err(LayoutError::weight_count(capacity, snapshot.len()));
            }
        }

        let mut layout = layout.boxed_clone();
        if !snapshot.is_empty() {
            layout.set_layout_rect(AxisRect::from_rect(bounds, axis))?;
        }
        layout.will_layout();

        Ok(Self {
            generation,
            bounds,
            axis,
            padding,
            layout,
            snapshot,
        })
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn child_count(&self) -> usize {
        self.snapshot.len()
    }

    /// Walk the snapshot and produce the padded frames.
    pub fn compute(mut self) -> LayoutPass {
        let mut frames = Vec::with_capacity(self.snapshot.len());
        for (id, child) in &self.snapshot {
            let axis_rect = self.layout.transform(child.as_ref());
            let frame = axis_rect.to_rect(self.axis).inset(self.padding);
            tracing::trace!(generation = self.generation, ?id, ?frame, "child frame computed");
            frames.push(PassFrame {
                id: *id,
                axis_rect,
                frame,
            });
        }

        LayoutPass {
            generation: self.generation,
            bounds: self.bounds,
            frames,
        }
    }
}

impl fmt::Debug for PassRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PassRequest")
            .field("generation", &self.generation)
            .field("bounds", &self.bounds)
            .field("axis", &self.axis)
            .field("children", &self.snapshot.len())
            .finish()
    }
}
