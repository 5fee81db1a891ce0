//! Kinetics error types.

use thiserror::Error;

/// Errors reported by the optional validation layer.
///
/// Stepping never fails; these only come from `try_*` constructors and
/// [`Physics::validate`](crate::Physics::validate).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum KineticsError {
    /// World configuration is out of range.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Body parameters are out of range.
    #[error("invalid body: {0}")]
    InvalidBody(String),
}

/// Result alias for fallible kinetics operations.
pub type Result<T> = std::result::Result<T, KineticsError>;
