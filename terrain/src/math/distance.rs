//! Conversions between distances on the earth's surface and the
//! angles they subtend.

/// Mean earth radius, in meters.
pub const EARTH_RADIUS: f64 = 6_371_000.0;

/// Length of a great circle, in meters.
pub const EARTH_PERIMETER: f64 = 2.0 * std::f64::consts::PI * EARTH_RADIUS;

/// Returns the angle subtended by `meters` of great-circle arc.
pub fn to_radians(meters: f64) -> f64 {
    meters / EARTH_RADIUS
}

/// Returns the length of great-circle arc subtending `radians`.
pub fn to_meters(radians: f64) -> f64 {
    radians * EARTH_RADIUS
}
