/// Convenience result type used across memegen.
pub type MemeResult<T> = Result<T, MemeError>;

/// Top-level error taxonomy used by the rendering pipeline.
///
/// Every variant aborts the pipeline. Degenerate per-frame geometry is not an error; it is
/// reported as [`FrameOutcome::Kept`](crate::FrameOutcome::Kept) instead.
#[derive(thiserror::Error, Debug)]
pub enum MemeError {
    /// Font or decal could not be loaded.
    #[error("asset error: {0}")]
    Asset(String),

    /// Input bytes are malformed or in an unsupported format.
    #[error("decode error: {0}")]
    Decode(String),

    /// Output could not be encoded.
    #[error("encode error: {0}")]
    Encode(String),

    /// Invalid request or configuration values.
    #[error("validation error: {0}")]
    Validation(String),

    /// A frame worker failed to report a result.
    #[error("worker error: {0}")]
    Worker(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MemeError {
    /// Build a [`MemeError::Asset`] value.
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build a [`MemeError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`MemeError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`MemeError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`MemeError::Worker`] value.
    pub fn worker(msg: impl Into<String>) -> Self {
        Self::Worker(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
