//! Clipping to a spherical cap of angular radius `r` centred on `(0, 0)`.

use core::f64::consts::{PI, TAU};

use foundation::math::{EPSILON, RADIANS, Vec3, acos, cartesian, point_equal, spherical};

use super::Direction;
use crate::stream::Stream;

/// Angular step used to walk the clip circle.
pub const CIRCLE_STEP: f64 = 6.0 * RADIANS;

/// Cap geometry shared by the visibility test, the line filter and the
/// boundary walk.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CircleClip {
    radius: f64,
    cr: f64,
    small_radius: bool,
    not_hemisphere: bool,
}

impl CircleClip {
    pub fn new(radius: f64) -> Self {
        let cr = radius.cos();
        Self {
            radius,
            cr,
            small_radius: cr > 0.0,
            not_hemisphere: cr.abs() > EPSILON,
        }
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn is_visible(&self, lambda: f64, phi: f64) -> bool {
        lambda.cos() * phi.cos() > self.cr
    }

    /// A point known to be on or outside the boundary.
    pub fn start(&self) -> [f64; 2] {
        if self.small_radius {
            [0.0, -self.radius]
        } else {
            [-PI, self.radius - PI]
        }
    }

    pub fn line(&self) -> CircleLine {
        CircleLine {
            circle: *self,
            point0: None,
            c0: 0,
            v0: false,
            v00: false,
            clean: true,
        }
    }

    pub fn interpolate<S: Stream + ?Sized>(
        &self,
        from_to: Option<([f64; 2], [f64; 2])>,
        direction: Direction,
        stream: &mut S,
    ) {
        circle_stream(stream, self.radius, CIRCLE_STEP, direction, from_to);
    }

    /// 4-bit code of a point relative to the cap's bounding box:
    /// 1 left, 2 right, 4 below, 8 above.
    fn code(&self, lambda: f64, phi: f64) -> u8 {
        let r = if self.small_radius {
            self.radius
        } else {
            PI - self.radius
        };
        let mut code = 0;
        if lambda < -r {
            code |= 1;
        } else if lambda > r {
            code |= 2;
        }
        if phi < -r {
            code |= 4;
        } else if phi > r {
            code |= 8;
        }
        code
    }

    /// Planes `n1·p = cr` (the clip circle) and `n2·p = 0` (the great circle
    /// through `a` and `b`) meet along `p(t) = A + t·u`; returns `A`, `u` and
    /// the two parameters where `|p(t)| = 1`.
    fn intersect_line(&self, a: [f64; 2], b: [f64; 2]) -> Option<(Vec3, Vec3, f64, f64)> {
        let pa = cartesian(a[0], a[1]);
        let pb = cartesian(b[0], b[1]);
        let n1 = Vec3::new(1.0, 0.0, 0.0);
        let n2 = pa.cross(pb);
        let n2n2 = n2.dot(n2);
        let n1n2 = n2.x;
        let determinant = n2n2 - n1n2 * n1n2;

        if determinant == 0.0 {
            return None;
        }

        let c1 = self.cr * n2n2 / determinant;
        let c2 = -self.cr * n1n2 / determinant;
        let u = n1.cross(n2);
        let origin = n1.scale(c1) + n2.scale(c2);

        let w = origin.dot(u);
        let uu = u.dot(u);
        let t2 = w * w - uu * (origin.dot(origin) - 1.0);
        if t2 < 0.0 {
            return None;
        }
        let t = t2.sqrt();
        Some((origin, u, (-w - t) / uu, (-w + t) / uu))
    }

    /// First crossing of the arc `a → b` with the clip circle.
    ///
    /// Two antipodal endpoints span no unique plane; `a` itself is returned.
    fn intersect(&self, a: [f64; 2], b: [f64; 2]) -> Option<[f64; 2]> {
        let pa = cartesian(a[0], a[1]);
        let pb = cartesian(b[0], b[1]);
        let n2 = pa.cross(pb);
        if n2.dot(n2) - n2.x * n2.x == 0.0 {
            return Some(a);
        }
        let (origin, u, t0, _) = self.intersect_line(a, b)?;
        Some(spherical(u.scale(t0) + origin))
    }

    /// Both crossings of the arc `a → b`, when the first lies between the
    /// endpoints.
    fn intersect_two(&self, a: [f64; 2], b: [f64; 2]) -> Option<([f64; 2], [f64; 2])> {
        let (origin, u, t0, t1) = self.intersect_line(a, b)?;
        let q = spherical(u.scale(t0) + origin);

        let (mut lambda0, mut lambda1) = (a[0], b[0]);
        let (mut phi0, mut phi1) = (a[1], b[1]);
        if lambda1 < lambda0 {
            std::mem::swap(&mut lambda0, &mut lambda1);
        }

        let delta = lambda1 - lambda0;
        let polar = (delta - PI).abs() < EPSILON;
        let meridian = polar || delta < EPSILON;

        if !polar && phi1 < phi0 {
            std::mem::swap(&mut phi0, &mut phi1);
        }

        let between = if meridian {
            if polar {
                let limit = if (q[0] - lambda0).abs() < EPSILON {
                    phi0
                } else {
                    phi1
                };
                (phi0 + phi1 > 0.0) ^ (q[1] < limit)
            } else {
                phi0 <= q[1] && q[1] <= phi1
            }
        } else {
            (delta > PI) ^ (lambda0 <= q[0] && q[0] <= lambda1)
        };

        if between {
            Some((q, spherical(u.scale(t1) + origin)))
        } else {
            None
        }
    }
}

/// Per-line filter for the cap.
#[derive(Debug, Clone)]
pub struct CircleLine {
    circle: CircleClip,
    point0: Option<[f64; 2]>,
    c0: u8,
    v0: bool,
    v00: bool,
    clean: bool,
}

impl CircleLine {
    pub fn line_start<S: Stream + ?Sized>(&mut self, _stream: &mut S) {
        self.v00 = false;
        self.v0 = false;
        self.clean = true;
    }

    pub fn point<S: Stream + ?Sized>(&mut self, stream: &mut S, lambda: f64, phi: f64) {
        let circle = self.circle;
        let mut point1 = [lambda, phi];
        let mut v = circle.is_visible(lambda, phi);
        let code_for = |p: [f64; 2], v: bool| {
            if circle.small_radius {
                if v { 0 } else { circle.code(p[0], p[1]) }
            } else if v {
                circle.code(p[0] + if p[0] < 0.0 { PI } else { -PI }, p[1])
            } else {
                0
            }
        };
        let mut c = code_for(point1, v);

        if self.point0.is_none() {
            self.v00 = v;
            self.v0 = v;
            if v {
                stream.line_start();
            }
        }

        if v != self.v0 {
            if let Some(point0) = self.point0 {
                let crossing = circle.intersect(point0, point1);
                let degenerate = match crossing {
                    None => true,
                    Some(p2) => point_equal(point0, p2) || point_equal(point1, p2),
                };
                if degenerate {
                    // Nudge off the boundary and reclassify.
                    point1[0] += EPSILON;
                    point1[1] += EPSILON;
                    v = circle.is_visible(point1[0], point1[1]);
                    c = code_for(point1, v);
                }
            }
        }

        if v != self.v0 {
            self.clean = false;
            if let Some(point0) = self.point0 {
                let point2 = if v {
                    // Outside going in.
                    stream.line_start();
                    let p2 = circle.intersect(point1, point0).unwrap_or(point1);
                    stream.point(p2[0], p2[1], None);
                    p2
                } else {
                    // Inside going out.
                    let p2 = circle.intersect(point0, point1).unwrap_or(point0);
                    stream.point(p2[0], p2[1], Some(2.0));
                    stream.line_end();
                    p2
                };
                self.point0 = Some(point2);
            }
        } else if circle.not_hemisphere && (circle.small_radius ^ v) {
            // Both ends on the same side, but the arc may still pass through
            // the cap (small circle) or around it (large circle).
            if let Some(point0) = self.point0 {
                if c & self.c0 == 0 {
                    if let Some((t0, t1)) = circle.intersect_two(point1, point0) {
                        self.clean = false;
                        if circle.small_radius {
                            stream.line_start();
                            stream.point(t0[0], t0[1], None);
                            stream.point(t1[0], t1[1], None);
                            stream.line_end();
                        } else {
                            stream.point(t1[0], t1[1], None);
                            stream.line_end();
                            stream.line_start();
                            stream.point(t0[0], t0[1], Some(3.0));
                        }
                    }
                }
            }
        }

        if v && self.point0.is_none_or(|p0| !point_equal(p0, point1)) {
            stream.point(point1[0], point1[1], None);
        }
        self.point0 = Some(point1);
        self.v0 = v;
        self.c0 = c;
    }

    pub fn line_end<S: Stream + ?Sized>(&mut self, stream: &mut S) {
        if self.v0 {
            stream.line_end();
        }
        self.point0 = None;
    }

    /// Bit 0: no intersections. Bit 1: first and last points visible, so the
    /// head and tail fragments join.
    pub fn clean(&self) -> u8 {
        u8::from(self.clean) | (u8::from(self.v00 && self.v0) << 1)
    }
}

/// Signed angle of a boundary point around the cap centre.
fn circle_radius(cos_radius: f64, point: [f64; 2]) -> f64 {
    let mut p = cartesian(point[0], point[1]);
    p.x -= cos_radius;
    let p = p.normalize();
    let radius = acos(-p.y);
    ((if -p.z < 0.0 { -radius } else { radius }) + TAU - EPSILON) % TAU
}

/// Emit points along a small circle of `radius` about `(0, 0)`, every
/// `delta` radians, from `from` to `to` or all the way round.
pub fn circle_stream<S: Stream + ?Sized>(
    stream: &mut S,
    radius: f64,
    delta: f64,
    direction: Direction,
    from_to: Option<([f64; 2], [f64; 2])>,
) {
    if delta == 0.0 {
        return;
    }
    let cos_radius = radius.cos();
    let sin_radius = radius.sin();
    let sign = direction.sign();
    let step = sign * delta;

    let (mut t0, t1) = match from_to {
        None => (radius + sign * TAU, radius - step / 2.0),
        Some((from, to)) => (circle_radius(cos_radius, from), circle_radius(cos_radius, to)),
    };
    if from_to.is_some() && (if sign > 0.0 { t0 < t1 } else { t0 > t1 }) {
        t0 += sign * TAU;
    }

    let mut t = t0;
    while if sign > 0.0 { t > t1 } else { t < t1 } {
        let p = spherical(Vec3::new(cos_radius, -sin_radius * t.cos(), -sin_radius * t.sin()));
        stream.point(p[0], p[1], None);
        t -= step;
    }
}
