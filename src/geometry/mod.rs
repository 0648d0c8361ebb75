/// Rotated-rectangle bounds.
pub mod rotate;
/// Canvas-in-stage fitting used when capturing exports.
pub mod stage;
