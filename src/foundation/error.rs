/// Convenience result type used across BrandCanvas.
pub type CreativeResult<T> = Result<T, CreativeError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Budget misses are deliberately absent: an over-budget export is a successful outcome and is
/// detected by comparing the returned byte count against the budget.
#[derive(thiserror::Error, Debug)]
pub enum CreativeError {
    /// Invalid user-provided data (layer edits, formats, configuration).
    #[error("validation error: {0}")]
    Validation(String),

    /// The rendering surface cannot produce pixels for the requested format.
    #[error("surface unavailable: {0}")]
    SurfaceUnavailable(String),

    /// Another export batch is already running on this engine instance.
    #[error("export busy: another export batch is in progress")]
    Busy,

    /// The image encoder rejected the surface pixels.
    #[error("encode error: {0}")]
    Encode(String),

    /// The background-removal service answered with a failure.
    #[error("background removal failed ({status}): {message}")]
    Removal {
        /// Status code reported by the service.
        status: u16,
        /// Service-provided failure text.
        message: String,
    },

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CreativeError {
    /// Build a [`CreativeError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`CreativeError::SurfaceUnavailable`] value.
    pub fn surface_unavailable(msg: impl Into<String>) -> Self {
        Self::SurfaceUnavailable(msg.into())
    }

    /// Build a [`CreativeError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`CreativeError::Removal`] value.
    pub fn removal(status: u16, msg: impl Into<String>) -> Self {
        Self::Removal {
            status,
            message: msg.into(),
        }
    }

    /// Build a [`CreativeError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Whether this error aborts an export batch because the surface could not deliver pixels.
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::SurfaceUnavailable(_) | Self::Encode(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
