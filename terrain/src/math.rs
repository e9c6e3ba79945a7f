//! Angle helpers, interpolation and root finding on a spherical earth.

pub mod azimuth;
pub mod distance;
mod root;

pub use root::{first_interval_containing_root, improve_root};

use num_traits::{Float, FloatConst};

pub fn sq<T: Float>(x: T) -> T {
    x * x
}

/// Floor modulo: the result has the sign of `y`.
pub fn floor_mod<T: Float>(x: T, y: T) -> T {
    x - y * (x / y).floor()
}

pub fn haversin<T: Float>(x: T) -> T {
    let two = T::one() + T::one();
    sq((x / two).sin())
}

/// Signed angle, in `[-π, π)`, to go from `a1` to `a2`.
pub fn angular_distance<T: Float + FloatConst>(a1: T, a2: T) -> T {
    floor_mod(a2 - a1 + T::PI(), T::TAU()) - T::PI()
}

/// Wraps a longitude into `[-π, π)`.
pub fn wrap_longitude<T: Float + FloatConst>(lon: T) -> T {
    floor_mod(lon + T::PI(), T::TAU()) - T::PI()
}

pub fn lerp<T: Float>(y0: T, y1: T, x: T) -> T {
    y0 + x * (y1 - y0)
}

/// Bilinear interpolation between the values at the corners of the
/// unit square.
pub fn bilerp<T: Float>(z00: T, z10: T, z01: T, z11: T, x: T, y: T) -> T {
    lerp(lerp(z00, z10, x), lerp(z01, z11, x), y)
}

#[cfg(test)]
mod tests {
    use super::{angular_distance, bilerp, floor_mod, haversin, lerp, wrap_longitude};
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_floor_mod() {
        assert_relative_eq!(floor_mod(7.0, 3.0), 1.0);
        assert_relative_eq!(floor_mod(-1.0, 3.0), 2.0);
        assert_relative_eq!(floor_mod(-7.5, 2.5), 0.0);
    }

    #[test]
    fn test_haversin() {
        assert_relative_eq!(haversin(PI), 1.0);
        assert_relative_eq!(haversin(0.0_f64), 0.0);
    }

    #[test]
    fn test_angular_distance() {
        assert_relative_eq!(angular_distance(0.1, 0.3), 0.2, epsilon = 1e-12);
        assert_relative_eq!(angular_distance(0.3, 0.1), -0.2, epsilon = 1e-12);
        assert_relative_eq!(
            angular_distance(2.0 * PI - 0.1, 0.1),
            0.2,
            epsilon = 1e-12
        );
        assert_relative_eq!(angular_distance(0.0, PI), -PI, epsilon = 1e-12);
    }

    #[test]
    fn test_wrap_longitude() {
        assert_relative_eq!(wrap_longitude(PI + 0.25), -PI + 0.25, epsilon = 1e-12);
        assert_relative_eq!(wrap_longitude(-PI - 0.25), PI - 0.25, epsilon = 1e-12);
        assert_relative_eq!(wrap_longitude(1.0), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_interpolation() {
        assert_relative_eq!(lerp(10.0, 20.0, 0.25), 12.5);
        assert_relative_eq!(bilerp(0.0, 1.0, 2.0, 3.0, 0.0, 0.0), 0.0);
        assert_relative_eq!(bilerp(0.0, 1.0, 2.0, 3.0, 1.0, 0.0), 1.0);
        assert_relative_eq!(bilerp(0.0, 1.0, 2.0, 3.0, 0.0, 1.0), 2.0);
        assert_relative_eq!(bilerp(0.0, 1.0, 2.0, 3.0, 1.0, 1.0), 3.0);
        assert_relative_eq!(bilerp(0.0, 1.0, 2.0, 3.0, 0.5, 0.5), 1.5);
    }
}
