//! Spherical geometry primitives.
//!
//! Distances are great-circle distances on a sphere of radius
//! [`EARTH_RADIUS_M`]; good enough for city-scale trip planning.

use crate::types::Coordinates;

/// Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Haversine great-circle distance in meters.
pub fn spherical_distance(a: Coordinates, b: Coordinates) -> f64 {
    EARTH_RADIUS_M * angular_distance(a, b)
}

/// Distance in meters from `point` to the segment `seg_start..seg_end`.
///
/// Uses the cross-track distance to the great circle through the segment
/// when the along-track projection lands inside the segment, otherwise the
/// distance to the nearer endpoint. A zero-length segment is just the
/// distance to its start.
pub fn point_to_segment_distance(
    point: Coordinates,
    seg_start: Coordinates,
    seg_end: Coordinates,
) -> f64 {
    let segment = angular_distance(seg_start, seg_end);
    if segment == 0.0 {
        return spherical_distance(point, seg_start);
    }

    let to_point = angular_distance(seg_start, point);
    let relative_bearing = bearing(seg_start, point) - bearing(seg_start, seg_end);

    let cross_track = (to_point.sin() * relative_bearing.sin())
        .clamp(-1.0, 1.0)
        .asin();

    let ratio = (to_point.cos() / cross_track.cos()).clamp(-1.0, 1.0);
    let along_track = ratio.acos() * relative_bearing.cos().signum();

    if along_track < 0.0 || along_track > segment {
        spherical_distance(point, seg_start).min(spherical_distance(point, seg_end))
    } else {
        EARTH_RADIUS_M * cross_track.abs()
    }
}

/// Central angle between two points in radians.
fn angular_distance(a: Coordinates, b: Coordinates) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let delta_lat = (b.lat - a.lat).to_radians();
    let delta_lng = (b.lng - a.lng).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lng / 2.0).sin().powi(2);

    2.0 * h.sqrt().min(1.0).asin()
}

/// Initial bearing from `from` to `to` in radians.
fn bearing(from: Coordinates, to: Coordinates) -> f64 {
    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();
    let delta_lng = (to.lng - from.lng).to_radians();

    let y = delta_lng.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * delta_lng.cos();
    y.atan2(x)
}
