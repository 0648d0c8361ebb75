/// Layer values and their derived geometry.
pub mod model;
/// Validated partial edits.
pub mod patch;
/// Ordered layer collection with editing operations.
pub mod stack;
