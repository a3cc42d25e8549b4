//! Point-in-polygon on the sphere.
//!
//! Rings are open (the closing vertex is implied) lists of `[lambda, phi]`
//! radians. Exterior rings wind clockwise, holes counter-clockwise, so a
//! small clockwise ring contains the small area it encloses and a
//! counter-clockwise one contains the rest of the sphere.

use core::f64::consts::{PI, TAU};

use foundation::math::{Adder, EPSILON, EPSILON2, HALF_PI, QUARTER_PI, Vec3, asin, cartesian};

fn longitude(point: [f64; 2]) -> f64 {
    let lambda = point[0];
    if lambda.abs() <= PI {
        lambda
    } else {
        lambda.signum() * ((lambda.abs() + PI) % TAU - PI)
    }
}

/// Whether `point` lies inside the spherical polygon made of `rings`.
///
/// First decides on which side the south pole falls (winding of the
/// longitudes, falling back to the sign of the enclosed area), then counts the
/// signed crossings of the meridian arc between the point and the south pole.
pub fn polygon_contains(rings: &[Vec<[f64; 2]>], point: [f64; 2]) -> bool {
    let lambda = longitude(point);
    let mut phi = point[1];
    let sin_phi = phi.sin();
    let normal = Vec3::new(lambda.sin(), -lambda.cos(), 0.0);
    let mut angle = 0.0;
    let mut winding: i64 = 0;
    let mut sum = Adder::new();

    if sin_phi == 1.0 {
        phi = HALF_PI + EPSILON;
    } else if sin_phi == -1.0 {
        phi = -HALF_PI - EPSILON;
    }

    for ring in rings {
        let Some(&last) = ring.last() else {
            continue;
        };
        let mut point0 = last;
        let mut lambda0 = longitude(point0);
        let phi0 = point0[1] / 2.0 + QUARTER_PI;
        let mut sin_phi0 = phi0.sin();
        let mut cos_phi0 = phi0.cos();

        for &point1 in ring {
            let lambda1 = longitude(point1);
            let phi1 = point1[1] / 2.0 + QUARTER_PI;
            let sin_phi1 = phi1.sin();
            let cos_phi1 = phi1.cos();
            let delta = lambda1 - lambda0;
            let sign = if delta >= 0.0 { 1.0 } else { -1.0 };
            let abs_delta = sign * delta;
            let antimeridian = abs_delta > PI;
            let k = sin_phi0 * sin_phi1;

            sum.add(
                (k * sign * abs_delta.sin()).atan2(cos_phi0 * cos_phi1 + k * abs_delta.cos()),
            );
            angle += if antimeridian { delta + sign * TAU } else { delta };

            // Do the longitudes straddle the point's meridian?
            if antimeridian ^ (lambda0 >= lambda) ^ (lambda1 >= lambda) {
                let arc = cartesian(point0[0], point0[1])
                    .cross(cartesian(point1[0], point1[1]))
                    .normalize();
                let intersection = normal.cross(arc).normalize();
                let flip = antimeridian ^ (delta >= 0.0);
                let phi_arc = if flip { -1.0 } else { 1.0 } * asin(intersection.z);
                if phi > phi_arc || (phi == phi_arc && (arc.x != 0.0 || arc.y != 0.0)) {
                    winding += if flip { 1 } else { -1 };
                }
            }

            lambda0 = lambda1;
            sin_phi0 = sin_phi1;
            cos_phi0 = cos_phi1;
            point0 = point1;
        }
    }

    let south_pole_inside = angle < -EPSILON || (angle < EPSILON && sum.value() < -EPSILON2);
    south_pole_inside ^ (winding & 1 != 0)
}

#[cfg(test)]
mod tests {
    use super::polygon_contains;
    use foundation::math::RADIANS;

    fn ring(points: &[[f64; 2]]) -> Vec<[f64; 2]> {
        points.iter().map(|p| [p[0] * RADIANS, p[1] * RADIANS]).collect()
    }

    fn contains(rings: &[Vec<[f64; 2]>], p: [f64; 2]) -> bool {
        polygon_contains(rings, [p[0] * RADIANS, p[1] * RADIANS])
    }

    #[test]
    fn empty_polygon_contains_nothing() {
        assert!(!contains(&[], [0.0, 0.0]));
    }

    #[test]
    fn small_clockwise_square() {
        let square = vec![ring(&[[0.0, 0.0], [0.0, 1.0], [1.0, 1.0], [1.0, 0.0]])];
        assert!(contains(&square, [0.1, 0.1]));
        assert!(!contains(&square, [0.1, 2.0]));
        assert!(!contains(&square, [-10.0, -10.0]));
    }

    #[test]
    fn reversed_square_contains_the_complement() {
        let square = vec![ring(&[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]])];
        assert!(!contains(&square, [0.1, 0.1]));
        assert!(contains(&square, [0.1, 2.0]));
    }

    #[test]
    fn ring_across_the_antimeridian() {
        let square = vec![ring(&[[170.0, -10.0], [170.0, 10.0], [-170.0, 10.0], [-170.0, -10.0]])];
        assert!(contains(&square, [180.0, 0.0]));
        assert!(contains(&square, [-175.0, 5.0]));
        assert!(!contains(&square, [0.0, 0.0]));
    }

    #[test]
    fn hole_is_excluded() {
        let donut = vec![
            ring(&[[-10.0, -10.0], [-10.0, 10.0], [10.0, 10.0], [10.0, -10.0]]),
            ring(&[[-5.0, -5.0], [5.0, -5.0], [5.0, 5.0], [-5.0, 5.0]]),
        ];
        assert!(contains(&donut, [7.0, 0.0]));
        assert!(!contains(&donut, [0.0, 0.0]));
    }

    #[test]
    fn south_pole_cap() {
        // Running eastward keeps the pole on the right.
        let cap = vec![ring(&[[0.0, -60.0], [90.0, -60.0], [180.0, -60.0], [-90.0, -60.0]])];
        assert!(contains(&cap, [0.0, -90.0]));
        assert!(!contains(&cap, [0.0, 0.0]));
    }
}
