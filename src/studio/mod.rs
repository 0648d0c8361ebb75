/// Uploaded image decoding and storage.
pub mod assets;
/// Engine configuration and the saved-creative document.
pub mod config;
/// The editing session tying layers, compliance and export together.
pub mod session;
/// Background-removal seam.
pub mod upload;
