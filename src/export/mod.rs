/// Batch orchestration across formats.
pub mod batch;
/// Byte-budgeted encoding with a quality ladder.
pub mod budget;
/// Capture-backed surface and RGBA encoders.
pub mod raster;
/// Artifact destinations.
pub mod sink;
/// The rendering-surface seam.
pub mod surface;
