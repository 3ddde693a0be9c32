//! Error taxonomy shared by every operator.

/// Convenience result type used across the crate.
pub type ProcessorResult<T> = Result<T, ProcessorError>;

/// Errors raised synchronously by constructors, operators and the store.
///
/// No operator mutates its input, so an `Err` never leaves a partially
/// written image behind.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ProcessorError {
    /// A value violates a construction invariant (channel range, matrix or
    /// kernel shape, array layout).
    #[error("validation error: {0}")]
    Validation(String),

    /// A call argument is out of range for the image it is applied to.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A named image is absent from the store.
    #[error("image not found: {0}")]
    NotFound(String),
}

impl ProcessorError {
    /// Build a [`ProcessorError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ProcessorError::InvalidArgument`] value.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Build a [`ProcessorError::NotFound`] value.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }
}
