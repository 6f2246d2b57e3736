//! Command-line front end for the flex layout engine.
//!
//! Builds a container from a [`FlexConfig`], runs one scheduled layout pass
//! and reports the resulting child frames.

pub mod config;

pub use config::FlexConfig;

use common::error::LayoutResult;
use common::geometry::Rect;
use layout::Child;
use tokio::runtime::Handle;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Lay out the configured container on a background worker and return the
/// applied child frames in child order.
pub async fn compute_frames(config: &FlexConfig, handle: &Handle) -> LayoutResult<Vec<Rect>> {
    config.validate()?;
    let (container, children) = config.build_container();
    let mut container = container.scheduled_on(handle);

    container.on_bounds_changed(config.bounds())?;
    let applied = container.next_layout().await?;
    tracing::info!(applied, "layout applied");

    Ok(children.iter().map(|child| child.frame()).collect())
}
