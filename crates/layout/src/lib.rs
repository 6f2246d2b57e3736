//! Single-axis flex layout engine.
//!
//! A [`FlexContainer`] owns an ordered list of children and, whenever its
//! bounds change, asks its [`Layout`] strategy for one rectangle per child.
//! Geometry is computed in axis-normalized form ([`AxisRect`]) and converted
//! back to concrete frames before being applied.

pub mod axis;
pub mod child;
pub mod container;
pub mod engine;
pub mod flex;
pub mod scheduler;
pub mod transition;

pub use axis::{Axis, AxisRect};
pub use child::{Child, ChildBox, ChildHandle, ChildId, Spacer};
pub use container::FlexContainer;
pub use engine::{Layout, LayoutPass, PassFrame, PassRequest};
pub use flex::{FlexLayout, FlexNode, FlexSpec, LayoutSession, OrthogonalAlignment};
pub use scheduler::PassScheduler;
pub use transition::{Easing, Transition};
