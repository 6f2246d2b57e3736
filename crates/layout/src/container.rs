//! Flex container: owns children and drives layout passes.

use crate::axis::Axis;
use crate::child::{ChildHandle, ChildId};
use crate::engine::{Layout, LayoutPass, PassRequest};
use crate::flex::FlexLayout;
use crate::scheduler::PassScheduler;
use crate::transition::Transition;
use common::error::LayoutResult;
use common::geometry::{EdgeSizes, Rect};
use slotmap::SlotMap;
use tokio::runtime::Handle;

/// A single-line flex container.
///
/// Without a scheduler, [`on_bounds_changed`](FlexContainer::on_bounds_changed)
/// computes and applies a pass before returning. With one attached through
/// [`scheduled_on`](FlexContainer::scheduled_on), the computation runs on a
/// background worker and frames are applied later, on the caller's context,
/// by [`apply_pending`](FlexContainer::apply_pending) or
/// [`next_layout`](FlexContainer::next_layout).
#[derive(Debug)]
pub struct FlexContainer {
    children: SlotMap<ChildId, ChildHandle>,
    order: Vec<ChildId>,
    axis: Axis,
    padding: EdgeSizes,
    layout: Box<dyn Layout>,
    /// True while `layout` is the implicit equal-weight strategy.
    default_layout: bool,
    transition: Option<Transition>,
    bounds: Rect,
    generation: u64,
    applied_generation: u64,
    scheduler: Option<PassScheduler>,
}

impl FlexContainer {
    /// Create a container for `children`, each with flex weight 1.
    pub fn new(children: impl IntoIterator<Item = ChildHandle>) -> Self {
        let mut slots = SlotMap::with_key();
        let order: Vec<ChildId> = children.into_iter().map(|child| slots.insert(child)).collect();
        let layout = FlexLayout::equal(order.len());

        Self {
            children: slots,
            order,
            axis: Axis::default(),
            padding: EdgeSizes::ZERO,
            layout: Box::new(layout),
            default_layout: true,
            transition: Some(Transition::default()),
            bounds: Rect::ZERO,
            generation: 0,
            applied_generation: 0,
            scheduler: None,
        }
    }

    pub fn with_axis(mut self, axis: Axis) -> Self {
        self.set_axis(axis);
        self
    }

    pub fn with_layout(mut self, layout: impl Layout + 'static) -> Self {
        self.set_layout(layout);
        self
    }

    pub fn with_padding(mut self, padding: EdgeSizes) -> Self {
        self.set_padding(padding);
        self
    }

    /// Transition passed to every frame application; `None` applies instantly.
    pub fn with_transition(mut self, transition: Option<Transition>) -> Self {
        self.set_transition(transition);
        self
    }

    /// Run pass computation on a background worker spawned on `handle`.
    pub fn scheduled_on(mut self, handle: &Handle) -> Self {
        self.scheduler = Some(PassScheduler::spawn(handle));
        self
    }

    pub fn set_axis(&mut self, axis: Axis) {
        self.axis = axis;
    }

    pub fn set_layout(&mut self, layout: impl Layout + 'static) {
        self.layout = Box::new(layout);
        self.default_layout = false;
    }

    pub fn set_padding(&mut self, padding: EdgeSizes) {
        self.padding = padding;
    }

    pub fn set_transition(&mut self, transition: Option<Transition>) {
        self.transition = transition;
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn padding(&self) -> EdgeSizes {
        self.padding
    }

    pub fn layout(&self) -> &dyn Layout {
        self.layout.as_ref()
    }

    pub fn transition(&self) -> Option<Transition> {
        self.transition
    }

    /// Bounds seen by the most recent bounds change.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn is_scheduled(&self) -> bool {
        self.scheduler.is_some()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Child ids in layout order.
    pub fn child_ids(&self) -> &[ChildId] {
        &self.order
    }

    pub fn child(&self, id: ChildId) -> Option<&ChildHandle> {
        self.children.get(id)
    }

    /// Append a child. The implicit equal-weight strategy grows with it.
    pub fn push_child(&mut self, child: ChildHandle) -> ChildId {
        let id = self.children.insert(child);
        self.order.push(id);
        self.refresh_default_layout();
        id
    }

    /// Remove a child. A pass already in flight skips it when applied.
    pub fn remove_child(&mut self, id: ChildId) -> Option<ChildHandle> {
        let child = self.children.remove(id)?;
        self.order.retain(|&other| other != id);
        self.refresh_default_layout();
        Some(child)
    }

    /// True while a scheduled pass has not been applied yet.
    pub fn is_layout_pending(&self) -> bool {
        self.generation > self.applied_generation
    }

    /// Compute a pass for `bounds` without applying it.
    pub fn compute_pass(&self, bounds: Rect) -> LayoutResult<LayoutPass> {
        Ok(self.prepare(self.generation, bounds)?.compute())
    }

    /// React to a change of the container's bounds.
    pub fn on_bounds_changed(&mut self, bounds: Rect) -> LayoutResult<()> {
        let generation = self.generation + 1;
        let request = self.prepare(generation, bounds)?;
        self.bounds = bounds;
        self.generation = generation;

        tracing::debug!(
            generation,
            children = request.child_count(),
            ?bounds,
            scheduled = self.scheduler.is_some(),
            "layout pass started"
        );

        if let Some(scheduler) = &self.scheduler {
            return scheduler.submit(request);
        }
        let pass = request.compute();
        self.apply(&pass);
        Ok(())
    }

    /// Re-run layout with the last known bounds.
    pub fn relayout(&mut self) -> LayoutResult<()> {
        self.on_bounds_changed(self.bounds)
    }

    /// Apply the newest completed pass, if any. Returns the frames applied.
    pub fn apply_pending(&mut self) -> usize {
        match self.scheduler.as_mut().and_then(PassScheduler::try_next) {
            Some(pass) => self.apply(&pass),
            None => 0,
        }
    }

    /// Wait for the outstanding scheduled pass and apply it.
    ///
    /// Returns 0 immediately when nothing is pending.
    pub async fn next_layout(&mut self) -> LayoutResult<usize> {
        if !self.is_layout_pending() {
            return Ok(0);
        }
        let Some(scheduler) = self.scheduler.as_mut() else {
            return Ok(0);
        };
        let pass = scheduler.next().await?;
        Ok(self.apply(&pass))
    }

    fn prepare(&self, generation: u64, bounds: Rect) -> LayoutResult<PassRequest> {
        let snapshot = self
            .order
            .iter()
            .filter_map(|&id| self.children.get(id).map(|child| (id, child.clone())))
            .collect();
        PassRequest::prepare(
            generation,
            bounds,
            self.axis,
            self.padding,
            self.layout.as_ref(),
            snapshot,
        )
    }

    fn apply(&mut self, pass: &LayoutPass) -> usize {
        if pass.generation < self.applied_generation {
            tracing::debug!(
                generation = pass.generation,
                applied = self.applied_generation,
                "ignoring pass older than the applied one"
            );
            return 0;
        }

        let mut applied = 0;
        for entry in &pass.frames {
            match self.children.get(entry.id) {
                Some(child) => {
                    child.set_frame(entry.frame, self.transition.as_ref());
                    applied += 1;
                }
                None => {
                    tracing::warn!(
                        generation = pass.generation,
                        child = ?entry.id,
                        "child removed before its frame was applied"
                    );
                }
            }
        }

        self.applied_generation = pass.generation;
        tracing::debug!(generation = pass.generation, applied, "layout pass applied");
        applied
    }

    fn refresh_default_layout(&mut self) {
        if self.default_layout {
            self.layout = Box::new(FlexLayout::equal(self.order.len()));
        }
    }
}
