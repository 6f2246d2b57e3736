//! Child handles managed by a flex container.

use crate::transition::Transition;
use common::geometry::Rect;
use parking_lot::RwLock;
use slotmap::new_key_type;
use std::fmt;
use std::sync::Arc;

new_key_type! {
    /// Stable identifier for a child within one container.
    pub struct ChildId;
}

/// Something a container can position.
///
/// Frames are read from the layout worker thread and written on the
/// container's owning context, so implementations must be thread-safe.
pub trait Child: Send + Sync + fmt::Debug {
    /// Current concrete frame.
    fn frame(&self) -> Rect;

    /// Move the child to `frame`, animating with `transition` if given.
    fn set_frame(&self, frame: Rect, transition: Option<&Transition>);
}

/// Shared handle to a child.
pub type ChildHandle = Arc<dyn Child>;

/// A plain child that just stores the frame it was given.
#[derive(Debug, Default)]
pub struct ChildBox {
    state: RwLock<ChildBoxState>,
}

#[derive(Debug, Default)]
struct ChildBoxState {
    frame: Rect,
    last_transition: Option<Transition>,
    applied: u64,
}

impl ChildBox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a child with an initial frame.
    pub fn with_frame(frame: Rect) -> Self {
        Self {
            state: RwLock::new(ChildBoxState {
                frame,
                ..ChildBoxState::default()
            }),
        }
    }

    /// Wrap in a [`ChildHandle`].
    pub fn handle(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Transition requested by the most recent frame application.
    pub fn last_transition(&self) -> Option<Transition> {
        self.state.read().last_transition
    }

    /// Number of frame applications so far.
    pub fn applied_count(&self) -> u64 {
        self.state.read().applied
    }
}

impl Child for ChildBox {
    fn frame(&self) -> Rect {
        self.state.read().frame
    }

    fn set_frame(&self, frame: Rect, transition: Option<&Transition>) {
        let mut state = self.state.write();
        state.frame = frame;
        state.last_transition = transition.copied();
        state.applied += 1;
    }
}

/// Invisible child that only takes up flex space.
#[derive(Debug, Default)]
pub struct Spacer {
    frame: RwLock<Rect>,
}

impl Spacer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Child for Spacer {
    fn frame(&self) -> Rect {
        *self.frame.read()
    }

    fn set_frame(&self, frame: Rect, _transition: Option<&Transition>) {
        // Nothing to animate.
        *self.frame.write() = frame;
    }
}
