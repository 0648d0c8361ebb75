use crate::foundation::error::CreativeError;

/// Structured failure reported by a background-removal service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RemovalFailure {
    /// Service status code.
    pub status: u16,
    /// Service-provided failure text, possibly empty.
    pub message: String,
}

impl RemovalFailure {
    /// Failure with `status` and `message`.
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl From<RemovalFailure> for CreativeError {
    fn from(f: RemovalFailure) -> Self {
        CreativeError::removal(f.status, f.message)
    }
}

/// Cuts the background out of an uploaded image.
///
/// Input is the uploaded file as-is; output is an encoded image with alpha (PNG in practice).
pub trait BackgroundRemover {
    /// Remove the background of `image`.
    fn remove_background(&self, image: &[u8]) -> Result<Vec<u8>, RemovalFailure>;
}

impl<F> BackgroundRemover for F
where
    F: Fn(&[u8]) -> Result<Vec<u8>, RemovalFailure>,
{
    fn remove_background(&self, image: &[u8]) -> Result<Vec<u8>, RemovalFailure> {
        self(image)
    }
}

/// Remover that returns the upload unchanged, for images that already carry alpha.
#[derive(Clone, Copy, Debug, Default)]
pub struct KeepBackground;

impl BackgroundRemover for KeepBackground {
    fn remove_background(&self, image: &[u8]) -> Result<Vec<u8>, RemovalFailure> {
        Ok(image.to_vec())
    }
}
