//! Clip strategies and the generic clip stream.
//!
//! Three closed variants share one capability set: `is_visible`, a per-line
//! filter (`line`), a `start` point used for polygon containment, and
//! `interpolate` along the clip boundary. [`ClipStream`] drives any of them:
//! points are filtered, lines are split, and polygon rings are buffered and
//! rejoined along the boundary.

pub mod antimeridian;
pub mod circle;
pub mod line;
pub mod rectangle;
mod rejoin;

use core::cmp::Ordering;
use core::f64::consts::PI;

use foundation::math::{EPSILON, HALF_PI, stable_total_cmp_f64};

use self::antimeridian::AntimeridianLine;
use self::circle::{CircleClip, CircleLine};
use self::rectangle::{RectangleClip, RectangleLine};
use crate::buffer::{Buffer, BufferPoint};
use crate::polygon_contains::polygon_contains;
use crate::stream::Stream;

/// Walking direction along a clip boundary.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    pub fn sign(self) -> f64 {
        match self {
            Direction::Forward => 1.0,
            Direction::Backward => -1.0,
        }
    }
}

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub enum Clip {
    /// Cut along λ = ±π; spherical input.
    #[default]
    Antimeridian,
    /// Small circle of the given angular radius around `(0, 0)`; spherical input.
    Circle(CircleClip),
    /// Axis-aligned rectangle; planar input.
    Rectangle(RectangleClip),
}

/// Boundary position of a spherical intersection: the antimeridian is walked
/// from the south pole up the western side, then down the eastern side.
fn sphere_key(p: [f64; 2]) -> f64 {
    if p[0] < 0.0 {
        p[1] - HALF_PI - EPSILON
    } else {
        HALF_PI - p[1]
    }
}

impl Clip {
    pub fn antimeridian() -> Self {
        Clip::Antimeridian
    }

    /// Cap of `radius` radians.
    pub fn circle(radius: f64) -> Self {
        Clip::Circle(CircleClip::new(radius))
    }

    pub fn rectangle(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Clip::Rectangle(RectangleClip::new(x0, y0, x1, y1))
    }

    pub fn is_visible(&self, x: f64, y: f64) -> bool {
        match self {
            Clip::Antimeridian => true,
            Clip::Circle(c) => c.is_visible(x, y),
            Clip::Rectangle(r) => r.is_visible(x, y),
        }
    }

    pub fn start(&self) -> [f64; 2] {
        match self {
            Clip::Antimeridian => [-PI, -HALF_PI],
            Clip::Circle(c) => c.start(),
            Clip::Rectangle(r) => r.start(),
        }
    }

    pub fn line(&self) -> ClipLine {
        match self {
            Clip::Antimeridian => ClipLine::Antimeridian(AntimeridianLine::default()),
            Clip::Circle(c) => ClipLine::Circle(c.line()),
            Clip::Rectangle(r) => ClipLine::Rectangle(r.line()),
        }
    }

    /// Walk the boundary from `from` to `to`, or all the way round when
    /// `from_to` is `None`.
    pub fn interpolate<S: Stream + ?Sized>(
        &self,
        from_to: Option<([f64; 2], [f64; 2])>,
        direction: Direction,
        stream: &mut S,
    ) {
        match self {
            Clip::Antimeridian => antimeridian::interpolate(from_to, direction, stream),
            Clip::Circle(c) => c.interpolate(from_to, direction, stream),
            Clip::Rectangle(r) => r.interpolate(from_to, direction, stream),
        }
    }

    /// Order of two boundary points along the forward boundary walk.
    pub fn compare_intersection(&self, a: [f64; 2], b: [f64; 2]) -> Ordering {
        match self {
            Clip::Antimeridian | Clip::Circle(_) => {
                stable_total_cmp_f64(sphere_key(a) - sphere_key(b), 0.0)
            }
            Clip::Rectangle(r) => r.compare_intersection(a, b),
        }
    }

    /// Whether [`Clip::start`] lies inside the unclipped rings.
    pub fn polygon_contains_start(&self, polygon: &[Vec<[f64; 2]>]) -> bool {
        match self {
            Clip::Antimeridian | Clip::Circle(_) => polygon_contains(polygon, self.start()),
            Clip::Rectangle(r) => r.polygon_winding(polygon) != 0,
        }
    }

    pub fn stream<S: Stream>(&self, sink: S) -> ClipStream<S> {
        ClipStream::new(*self, sink)
    }
}

/// Stateful per-line filter of a [`Clip`].
#[derive(Debug, Clone)]
pub enum ClipLine {
    Antimeridian(AntimeridianLine),
    Circle(CircleLine),
    Rectangle(RectangleLine),
}

impl ClipLine {
    pub fn line_start<S: Stream + ?Sized>(&mut self, stream: &mut S) {
        match self {
            ClipLine::Antimeridian(l) => l.line_start(stream),
            ClipLine::Circle(l) => l.line_start(stream),
            ClipLine::Rectangle(l) => l.line_start(stream),
        }
    }

    pub fn point<S: Stream + ?Sized>(&mut self, stream: &mut S, x: f64, y: f64) {
        match self {
            ClipLine::Antimeridian(l) => l.point(stream, x, y),
            ClipLine::Circle(l) => l.point(stream, x, y),
            ClipLine::Rectangle(l) => l.point(stream, x, y),
        }
    }

    pub fn line_end<S: Stream + ?Sized>(&mut self, stream: &mut S) {
        match self {
            ClipLine::Antimeridian(l) => l.line_end(stream),
            ClipLine::Circle(l) => l.line_end(stream),
            ClipLine::Rectangle(l) => l.line_end(stream),
        }
    }

    /// Bit 0: the line never touched the boundary. Bit 1: the first and
    /// last fragments connect and must be joined.
    pub fn clean(&self) -> u8 {
        match self {
            ClipLine::Antimeridian(l) => l.clean(),
            ClipLine::Circle(l) => l.clean(),
            ClipLine::Rectangle(l) => l.clean(),
        }
    }
}

/// Pipeline stage clipping every event against a [`Clip`].
#[derive(Debug)]
pub struct ClipStream<S> {
    clip: Clip,
    sink: S,
    line: ClipLine,
    ring_line: ClipLine,
    ring_buffer: Buffer,
    in_line: bool,
    in_polygon: bool,
    polygon_started: bool,
    ring: Vec<[f64; 2]>,
    polygon: Vec<Vec<[f64; 2]>>,
    segments: Vec<Vec<BufferPoint>>,
    /// Rings that never touched the boundary, written after the
    /// boundary-derived rings so ring 0 stays the exterior.
    untouched: Vec<Vec<[f64; 2]>>,
}

impl<S: Stream> ClipStream<S> {
    pub fn new(clip: Clip, sink: S) -> Self {
        Self {
            clip,
            sink,
            line: clip.line(),
            ring_line: clip.line(),
            ring_buffer: Buffer::new(),
            in_line: false,
            in_polygon: false,
            polygon_started: false,
            ring: Vec::new(),
            polygon: Vec::new(),
            segments: Vec::new(),
            untouched: Vec::new(),
        }
    }

    pub fn get_ref(&self) -> &S {
        &self.sink
    }

    pub fn into_inner(self) -> S {
        self.sink
    }

    fn begin_polygon(&mut self) {
        if !self.polygon_started {
            self.sink.polygon_start();
            self.polygon_started = true;
        }
    }

    fn ring_end(&mut self) {
        let Some(&[x, y]) = self.ring.first() else {
            self.ring_line.line_end(&mut self.ring_buffer);
            self.ring_buffer.take_lines();
            return;
        };
        self.ring_line.point(&mut self.ring_buffer, x, y);
        self.ring_line.line_end(&mut self.ring_buffer);

        let clean = self.ring_line.clean();
        if clean & 1 == 0 && clean & 2 != 0 {
            self.ring_buffer.rejoin();
        }
        let ring_segments = self.ring_buffer.take_lines();
        self.polygon.push(std::mem::take(&mut self.ring));

        if clean & 1 != 0 {
            // Kept whole unless it collapsed.
            if let Some(segment) = ring_segments.first() {
                let m = segment.len().saturating_sub(1);
                if m >= 3 {
                    self.untouched
                        .push(segment[..m].iter().map(BufferPoint::xy).collect());
                }
            }
            return;
        }
        self.segments
            .extend(ring_segments.into_iter().filter(|s| s.len() > 1));
    }
}

impl<S: Stream> Stream for ClipStream<S> {
    fn point(&mut self, x: f64, y: f64, _z: Option<f64>) {
        if self.in_polygon {
            self.ring.push([x, y]);
            self.ring_line.point(&mut self.ring_buffer, x, y);
        } else if self.in_line {
            self.line.point(&mut self.sink, x, y);
        } else if self.clip.is_visible(x, y) {
            self.sink.point(x, y, None);
        }
    }

    fn line_start(&mut self) {
        if self.in_polygon {
            self.ring.clear();
            self.ring_line.line_start(&mut self.ring_buffer);
        } else {
            self.in_line = true;
            self.line.line_start(&mut self.sink);
        }
    }

    fn line_end(&mut self) {
        if self.in_polygon {
            self.ring_end();
        } else {
            self.line.line_end(&mut self.sink);
            self.in_line = false;
        }
    }

    fn polygon_start(&mut self) {
        self.in_polygon = true;
        self.polygon.clear();
        self.segments.clear();
        self.untouched.clear();
    }

    fn polygon_end(&mut self) {
        self.in_polygon = false;
        let polygon = std::mem::take(&mut self.polygon);
        let segments = std::mem::take(&mut self.segments);
        let untouched = std::mem::take(&mut self.untouched);
        let start_inside = self.clip.polygon_contains_start(&polygon);

        if !segments.is_empty() {
            self.begin_polygon();
            rejoin::rejoin(&self.clip, segments, start_inside, &mut self.sink);
        } else if start_inside {
            self.begin_polygon();
            self.sink.line_start();
            self.clip.interpolate(None, Direction::Forward, &mut self.sink);
            self.sink.line_end();
        }
        if !untouched.is_empty() {
            self.begin_polygon();
            for ring in &untouched {
                self.sink.line_start();
                for &[x, y] in ring {
                    self.sink.point(x, y, None);
                }
                self.sink.line_end();
            }
        }
        if self.polygon_started {
            self.sink.polygon_end();
            self.polygon_started = false;
        }
    }

    fn sphere(&mut self) {
        self.sink.polygon_start();
        self.sink.line_start();
        self.clip.interpolate(None, Direction::Forward, &mut self.sink);
        self.sink.line_end();
        self.sink.polygon_end();
    }
}
