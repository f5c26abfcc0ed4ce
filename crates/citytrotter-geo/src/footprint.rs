//! Footprint derivation from a site location and a floor area.

use citytrotter_core::models::{Footprint, Location};

/// Degrees per foot under a flat-earth local approximation.
///
/// Only valid near the deployment region (Atlanta, GA). Longitude degrees
/// shrink with latitude, so footprints far from it are not geodesically
/// square. Consumers rely on the exact constant; do not replace it with a
/// projected conversion.
pub const DEG_PER_FOOT: f64 = 1.0 / 305_000.0;

/// Compute the square footprint of a building centered on `location`.
///
/// `area_sq_ft` must be positive. Range checks belong to the caller; this is
/// a pure geometric transform and produces bit-identical output for equal
/// inputs.
pub fn compute_footprint(location: &Location, area_sq_ft: f64) -> Footprint {
    let side_ft = area_sq_ft.sqrt();
    let half_size_deg = side_ft * DEG_PER_FOOT / 2.0;

    let min_lng = location.lng - half_size_deg;
    let max_lng = location.lng + half_size_deg;
    let min_lat = location.lat - half_size_deg;
    let max_lat = location.lat + half_size_deg;

    Footprint::from_corners([
        [min_lng, min_lat],
        [max_lng, min_lat],
        [max_lng, max_lat],
        [min_lng, max_lat],
    ])
}
