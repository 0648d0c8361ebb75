/// Round half toward positive infinity, the rounding used for pixel placement and size labels.
pub(crate) fn round_half_up(v: f64) -> f64 {
    (v + 0.5).floor()
}

/// Byte count expressed in whole KiB, rounded to nearest.
pub(crate) fn kib_rounded(bytes: usize) -> u64 {
    round_half_up(bytes as f64 / 1024.0) as u64
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
