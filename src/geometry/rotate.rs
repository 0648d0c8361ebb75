use crate::foundation::core::{Affine, BBox, Point, Rect};

/// Axis-aligned bounds of a `w x h` rectangle at `(x, y)` rotated by `angle_deg`.
///
/// The pivot is the rectangle's own top-left corner `(x, y)`, not its center; this is how the
/// canvas positions rotated layers. Positive angles turn clockwise in the y-down canvas space.
/// Corners are rotated in pivot-local space and translated back, so `angle_deg == 0` returns the
/// input unchanged bit-for-bit. Zero-sized rectangles yield zero-sized boxes.
pub fn rotated_bounding_box(x: f64, y: f64, w: f64, h: f64, angle_deg: f64) -> BBox {
    let local = Rect::new(0.0, 0.0, w, h);
    let rotated = Affine::rotate(angle_deg.to_radians()).transform_rect_bbox(local);
    BBox::new(
        x + rotated.x0,
        y + rotated.y0,
        rotated.width(),
        rotated.height(),
    )
}

/// Where the rectangle's own center lands after rotating about its top-left corner.
pub fn rotated_center(x: f64, y: f64, w: f64, h: f64, angle_deg: f64) -> Point {
    let pivot = Point::new(x, y);
    Affine::rotate_about(angle_deg.to_radians(), pivot) * Point::new(x + w / 2.0, y + h / 2.0)
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/rotate.rs"]
mod tests;
