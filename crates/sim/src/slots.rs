//! Slot geometry: snapping a continuous drag coordinate to the nearest
//! discrete compartment of the array box.

/// Center of slot `idx` along the box axis. Slots are evenly spaced across
/// `[-total_width/2, total_width/2]`, so slot `k` is centered at
/// `-total_width/2 + slot_width/2 + k*slot_width`.
pub fn slot_center(idx: usize, total_width: f32, slot_width: f32) -> f32 {
    -total_width / 2.0 + slot_width / 2.0 + idx as f32 * slot_width
}

/// Index of the slot whose center is closest to `x`.
///
/// Linear scan, first minimum wins, so ties break toward the lower index.
/// Coordinates outside the box clamp to the end slots. `slot_count` of zero
/// returns 0 (callers always have at least one compartment).
pub fn nearest_slot(x: f32, slot_count: usize, total_width: f32, slot_width: f32) -> usize {
    let mut min_dist = f32::INFINITY;
    let mut min_idx = 0;
    for idx in 0..slot_count {
        let dist = (x - slot_center(idx, total_width, slot_width)).abs();
        if dist < min_dist {
            min_dist = dist;
            min_idx = idx;
        }
    }
    min_idx
}
