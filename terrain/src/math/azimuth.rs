//! Compass bearings, in radians clockwise from north.

use super::floor_mod;
use crate::TerrainError;
use std::f64::consts::TAU;

/// True for azimuths in `[0, 2π)`.
pub fn is_canonical(azimuth: f64) -> bool {
    (0.0..TAU).contains(&azimuth)
}

/// Maps `azimuth` into `[0, 2π)`.
pub fn canonicalize(azimuth: f64) -> f64 {
    let canonical = floor_mod(azimuth, TAU);
    // Tiny negative inputs round up to exactly 2π.
    if canonical >= TAU {
        0.0
    } else {
        canonical
    }
}

/// Converts a compass azimuth to a mathematical angle
/// (counter-clockwise from east).
pub fn to_math(azimuth: f64) -> Result<f64, TerrainError> {
    if !is_canonical(azimuth) {
        return Err(TerrainError::Azimuth(azimuth));
    }
    Ok(canonicalize(-azimuth))
}

/// Converts a mathematical angle back to a compass azimuth.
pub fn from_math(angle: f64) -> Result<f64, TerrainError> {
    if !is_canonical(angle) {
        return Err(TerrainError::Azimuth(angle));
    }
    Ok(canonicalize(-angle))
}

/// Returns the nearest of the eight compass octants, built from the
/// given cardinal labels (e.g. `"N"`, `"E"`, `"S"`, `"W"` gives
/// `"NE"` for 45°).
pub fn to_octant_string(
    azimuth: f64,
    n: &str,
    e: &str,
    s: &str,
    w: &str,
) -> Result<String, TerrainError> {
    if !is_canonical(azimuth) {
        return Err(TerrainError::Azimuth(azimuth));
    }
    let cardinals = [n, e, s, w];
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let octant = (8.0 * azimuth / TAU + 0.5).floor() as usize % 8;
    if octant % 2 == 0 {
        Ok(cardinals[octant / 2].to_owned())
    } else {
        let prefix = if (3..=5).contains(&octant) { s } else { n };
        let suffix = cardinals[(octant / 4) * 2 + 1];
        Ok(format!("{prefix}{suffix}"))
    }
}

#[cfg(test)]
mod tests {
    use super::{canonicalize, from_math, is_canonical, to_math, to_octant_string};
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, PI, TAU};

    #[test]
    fn test_canonical() {
        assert!(is_canonical(0.0));
        assert!(is_canonical(PI));
        assert!(!is_canonical(TAU));
        assert!(!is_canonical(-0.1));
        assert_relative_eq!(canonicalize(-FRAC_PI_2), 3.0 * FRAC_PI_2);
        assert_relative_eq!(canonicalize(5.0 * PI), PI, epsilon = 1e-12);
        assert!(is_canonical(canonicalize(-1e-18)));
    }

    #[test]
    fn test_math_conversion() {
        assert_relative_eq!(to_math(FRAC_PI_2).unwrap(), 3.0 * FRAC_PI_2);
        assert_relative_eq!(from_math(3.0 * FRAC_PI_2).unwrap(), FRAC_PI_2);
        assert_relative_eq!(to_math(0.0).unwrap(), 0.0);
        assert!(to_math(TAU).is_err());
        assert!(from_math(-1.0).is_err());
    }

    #[test]
    fn test_octants() {
        let octant = |deg: f64| to_octant_string(deg.to_radians(), "N", "E", "S", "W").unwrap();
        assert_eq!(octant(0.0), "N");
        assert_eq!(octant(20.0), "N");
        assert_eq!(octant(45.0), "NE");
        assert_eq!(octant(90.0), "E");
        assert_eq!(octant(135.0), "SE");
        assert_eq!(octant(180.0), "S");
        assert_eq!(octant(225.0), "SW");
        assert_eq!(octant(270.0), "W");
        assert_eq!(octant(315.0), "NW");
        assert_eq!(octant(350.0), "N");
        assert!(to_octant_string(7.0, "N", "E", "S", "W").is_err());
    }
}
