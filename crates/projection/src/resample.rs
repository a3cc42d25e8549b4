//! Adaptive resampling of projected great-circle arcs.
//!
//! Each spherical segment is replaced by a polyline fine enough that every
//! emitted vertex lies within `sqrt(delta2)` of the projected arc.

use foundation::math::{EPSILON, RADIANS, Vec3, asin, cartesian};

use crate::raw::Projector;
use crate::stream::Stream;

const MAX_DEPTH: u32 = 16;

/// Endpoints further apart than 30° are always split.
fn cos_min_distance() -> f64 {
    (30.0 * RADIANS).cos()
}

/// A resampled vertex: where it landed on the plane and where it sits on the
/// sphere.
#[derive(Debug, Copy, Clone, PartialEq)]
struct Vertex {
    x: f64,
    y: f64,
    lambda: f64,
    p: Vec3,
}

impl Vertex {
    fn new<P: Projector + ?Sized>(project: &P, lambda: f64, phi: f64) -> Self {
        let [x, y] = project.project(lambda, phi);
        Self {
            x,
            y,
            lambda,
            p: cartesian(lambda, phi),
        }
    }
}

fn resample_line_to<P: Projector + ?Sized, S: Stream + ?Sized>(
    project: &P,
    delta2: f64,
    v0: &Vertex,
    v1: &Vertex,
    depth: u32,
    stream: &mut S,
) {
    let dx = v1.x - v0.x;
    let dy = v1.y - v0.y;
    let d2 = dx * dx + dy * dy;
    if !(d2 > 4.0 * delta2 && depth > 0) {
        return;
    }
    let depth = depth - 1;

    let sum = v0.p + v1.p;
    let m = sum.length();
    let c = sum.z / m;
    let phi2 = asin(c);
    let lambda2 = if ((c.abs() - 1.0).abs() < EPSILON) || (v0.lambda - v1.lambda).abs() < EPSILON {
        (v0.lambda + v1.lambda) / 2.0
    } else {
        sum.y.atan2(sum.x)
    };
    let [x2, y2] = project.project(lambda2, phi2);
    let dx2 = x2 - v0.x;
    let dy2 = y2 - v0.y;
    let dz = dy * dx2 - dx * dy2;

    let far_from_chord = dz * dz / d2 > delta2;
    let off_centre = ((dx * dx2 + dy * dy2) / d2 - 0.5).abs() > 0.3;
    let too_long = v0.p.dot(v1.p) < cos_min_distance();
    if far_from_chord || off_centre || too_long {
        let mid = Vertex {
            x: x2,
            y: y2,
            lambda: lambda2,
            p: Vec3::new(sum.x / m, sum.y / m, c),
        };
        resample_line_to(project, delta2, v0, &mid, depth, stream);
        stream.point(x2, y2, None);
        resample_line_to(project, delta2, &mid, v1, depth, stream);
    }
}

/// Pipeline stage projecting spherical input and subdividing lines.
///
/// `delta2 == 0` projects points one to one.
#[derive(Debug)]
pub struct Resample<P, S> {
    project: P,
    delta2: f64,
    sink: S,
    in_polygon: bool,
    in_line: bool,
    previous: Option<Vertex>,
    /// First vertex of the current ring, to close it.
    first: Option<Vertex>,
}

impl<P: Projector, S: Stream> Resample<P, S> {
    pub fn new(project: P, delta2: f64, sink: S) -> Self {
        Self {
            project,
            delta2,
            sink,
            in_polygon: false,
            in_line: false,
            previous: None,
            first: None,
        }
    }

    pub fn get_ref(&self) -> &S {
        &self.sink
    }

    pub fn into_inner(self) -> S {
        self.sink
    }

    fn line_point(&mut self, lambda: f64, phi: f64) {
        let v = Vertex::new(&self.project, lambda, phi);
        if let Some(v0) = self.previous {
            resample_line_to(&self.project, self.delta2, &v0, &v, MAX_DEPTH, &mut self.sink);
        }
        self.sink.point(v.x, v.y, None);
        self.previous = Some(v);
        if self.in_polygon && self.first.is_none() {
            self.first = Some(v);
        }
    }
}

impl<P: Projector, S: Stream> Stream for Resample<P, S> {
    fn point(&mut self, x: f64, y: f64, _z: Option<f64>) {
        if self.in_line && self.delta2 > 0.0 {
            self.line_point(x, y);
        } else {
            let [x, y] = self.project.project(x, y);
            self.sink.point(x, y, None);
        }
    }

    fn line_start(&mut self) {
        self.in_line = true;
        self.previous = None;
        self.first = None;
        self.sink.line_start();
    }

    fn line_end(&mut self) {
        if self.in_polygon && self.delta2 > 0.0 {
            if let (Some(v0), Some(v1)) = (self.previous, self.first) {
                resample_line_to(&self.project, self.delta2, &v0, &v1, MAX_DEPTH, &mut self.sink);
            }
        }
        self.in_line = false;
        self.previous = None;
        self.first = None;
        self.sink.line_end();
    }

    fn polygon_start(&mut self) {
        self.in_polygon = true;
        self.sink.polygon_start();
    }

    fn polygon_end(&mut self) {
        self.in_polygon = false;
        self.sink.polygon_end();
    }

    fn sphere(&mut self) {
        self.sink.sphere();
    }
}
