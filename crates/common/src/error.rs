//! Common error types.

use thiserror::Error;

/// Errors raised while configuring or running a layout pass.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error("flex weights sum to zero; at least one weight must be positive")]
    ZeroFlexSum,

    #[error("layout expects {weights} children but the container has {children}")]
    WeightCountMismatch { weights: usize, children: usize },

    #[error("container bounds are not finite: {0}")]
    NonFiniteBounds(String),

    #[error("layout scheduler is no longer running")]
    SchedulerClosed,

    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type LayoutResult<T> = Result<T, LayoutError>;

impl LayoutError {
    pub fn weight_count(weights: usize, children: usize) -> Self {
        Self::WeightCountMismatch { weights, children }
    }

    pub fn non_finite(bounds: impl std::fmt::Debug) -> Self {
        Self::NonFiniteBounds(format!("{bounds:?}"))
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
