//! Spherical trigonometry helpers shared by the projection pipeline.
//!
//! Spherical points are `[lambda, phi]` in radians. Cartesian points live on
//! the unit sphere with `x` towards `(0, 0)`, `y` towards `(90°E, 0)` and `z`
//! towards the north pole.

use core::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI, TAU};

use super::Vec3;

/// Equality threshold for angles and plane coordinates.
pub const EPSILON: f64 = 1e-6;
pub const EPSILON2: f64 = 1e-12;
pub const HALF_PI: f64 = FRAC_PI_2;
pub const QUARTER_PI: f64 = FRAC_PI_4;
pub const RADIANS: f64 = PI / 180.0;
pub const DEGREES: f64 = 180.0 / PI;

/// `asin` clamped to the valid domain so rounding noise never yields NaN.
#[inline]
pub fn asin(x: f64) -> f64 {
    if x > 1.0 {
        HALF_PI
    } else if x < -1.0 {
        -HALF_PI
    } else {
        x.asin()
    }
}

/// `acos` clamped to the valid domain.
#[inline]
pub fn acos(x: f64) -> f64 {
    if x > 1.0 {
        0.0
    } else if x < -1.0 {
        PI
    } else {
        x.acos()
    }
}

pub fn cartesian(lambda: f64, phi: f64) -> Vec3 {
    let cos_phi = phi.cos();
    Vec3::new(cos_phi * lambda.cos(), cos_phi * lambda.sin(), phi.sin())
}

pub fn spherical(v: Vec3) -> [f64; 2] {
    [v.y.atan2(v.x), asin(v.z)]
}

/// Fold a longitude into `[-PI, PI]`.
pub fn wrap_longitude(lambda: f64) -> f64 {
    if lambda.abs() > PI {
        lambda - (lambda / TAU).round() * TAU
    } else {
        lambda
    }
}

/// Component-wise equality within `EPSILON`.
#[inline]
pub fn point_equal(a: [f64; 2], b: [f64; 2]) -> bool {
    (a[0] - b[0]).abs() < EPSILON && (a[1] - b[1]).abs() < EPSILON
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn cartesian_axes() {
        let v = cartesian(0.0, 0.0);
        assert_close(v.x, 1.0, 1e-15);
        let v = cartesian(HALF_PI, 0.0);
        assert_close(v.y, 1.0, 1e-15);
        let v = cartesian(0.3, HALF_PI);
        assert_close(v.z, 1.0, 1e-15);
    }

    #[test]
    fn spherical_round_trip() {
        let p = [-2.1, 0.7];
        let q = spherical(cartesian(p[0], p[1]));
        assert_close(q[0], p[0], 1e-12);
        assert_close(q[1], p[1], 1e-12);
    }

    #[test]
    fn wrap_longitude_folds_into_range() {
        assert_close(wrap_longitude(3.0 * PI / 2.0), -PI / 2.0, 1e-12);
        assert_close(wrap_longitude(-5.0 * PI / 2.0), -PI / 2.0, 1e-12);
        assert_eq!(wrap_longitude(PI), PI);
        assert_eq!(wrap_longitude(0.25), 0.25);
    }

    #[test]
    fn clamped_inverse_trig() {
        assert_eq!(asin(1.0 + 1e-12), HALF_PI);
        assert_eq!(acos(-1.0 - 1e-12), PI);
    }
}
