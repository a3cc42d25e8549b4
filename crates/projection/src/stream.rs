//! Push-based geometry event protocol.
//!
//! Producers emit events in the order
//! `[sphere] | (point* | (lineStart point* lineEnd)*) | (polygonStart (lineStart point* lineEnd)* polygonEnd)*`.
//! Every stage of the projection pipeline is a `Stream` that forwards
//! (possibly transformed or split) events to the sink it owns.

use foundation::math::RADIANS;

/// Receiver of geometry events.
///
/// Implementations must not assume buffering: a producer is free to stream a
/// ring point by point and never revisit it. The third coordinate `z` is
/// opaque to most stages; clip stages use it to tag boundary intersections.
pub trait Stream {
    fn point(&mut self, x: f64, y: f64, z: Option<f64>);
    fn line_start(&mut self) {}
    fn line_end(&mut self) {}
    fn polygon_start(&mut self) {}
    fn polygon_end(&mut self) {}
    fn sphere(&mut self) {}
}

impl<S: Stream + ?Sized> Stream for &mut S {
    fn point(&mut self, x: f64, y: f64, z: Option<f64>) {
        (**self).point(x, y, z);
    }

    fn line_start(&mut self) {
        (**self).line_start();
    }

    fn line_end(&mut self) {
        (**self).line_end();
    }

    fn polygon_start(&mut self) {
        (**self).polygon_start();
    }

    fn polygon_end(&mut self) {
        (**self).polygon_end();
    }

    fn sphere(&mut self) {
        (**self).sphere();
    }
}

/// One recorded event.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Point { x: f64, y: f64, z: Option<f64> },
    LineStart,
    LineEnd,
    PolygonStart,
    PolygonEnd,
    Sphere,
}

/// Terminal sink that keeps every event it receives.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Recorder {
    events: Vec<Event>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Points of every `lineStart .. lineEnd` run, in emission order.
    pub fn lines(&self) -> Vec<Vec<[f64; 2]>> {
        let mut lines = Vec::new();
        let mut current: Option<Vec<[f64; 2]>> = None;
        for event in &self.events {
            match event {
                Event::LineStart => current = Some(Vec::new()),
                Event::LineEnd => lines.extend(current.take()),
                Event::Point { x, y, .. } => {
                    if let Some(line) = current.as_mut() {
                        line.push([*x, *y]);
                    }
                }
                _ => {}
            }
        }
        lines
    }

    /// Points emitted outside of any line.
    pub fn points(&self) -> Vec<[f64; 2]> {
        let mut depth = 0usize;
        let mut points = Vec::new();
        for event in &self.events {
            match event {
                Event::LineStart => depth += 1,
                Event::LineEnd => depth = depth.saturating_sub(1),
                Event::Point { x, y, .. } if depth == 0 => points.push([*x, *y]),
                _ => {}
            }
        }
        points
    }

    /// Number of `polygonStart` events.
    pub fn polygon_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, Event::PolygonStart))
            .count()
    }

    /// Re-emit the recorded events into another sink.
    pub fn replay<S: Stream + ?Sized>(&self, sink: &mut S) {
        for event in &self.events {
            match *event {
                Event::Point { x, y, z } => sink.point(x, y, z),
                Event::LineStart => sink.line_start(),
                Event::LineEnd => sink.line_end(),
                Event::PolygonStart => sink.polygon_start(),
                Event::PolygonEnd => sink.polygon_end(),
                Event::Sphere => sink.sphere(),
            }
        }
    }
}

impl Stream for Recorder {
    fn point(&mut self, x: f64, y: f64, z: Option<f64>) {
        self.events.push(Event::Point { x, y, z });
    }

    fn line_start(&mut self) {
        self.events.push(Event::LineStart);
    }

    fn line_end(&mut self) {
        self.events.push(Event::LineEnd);
    }

    fn polygon_start(&mut self) {
        self.events.push(Event::PolygonStart);
    }

    fn polygon_end(&mut self) {
        self.events.push(Event::PolygonEnd);
    }

    fn sphere(&mut self) {
        self.events.push(Event::Sphere);
    }
}

/// Outermost pipeline stage: degrees in, radians out.
#[derive(Debug)]
pub struct DegreesToRadians<S> {
    sink: S,
}

impl<S: Stream> DegreesToRadians<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    pub fn get_ref(&self) -> &S {
        &self.sink
    }

    pub fn into_inner(self) -> S {
        self.sink
    }
}

impl<S: Stream> Stream for DegreesToRadians<S> {
    fn point(&mut self, x: f64, y: f64, z: Option<f64>) {
        self.sink.point(x * RADIANS, y * RADIANS, z);
    }

    fn line_start(&mut self) {
        self.sink.line_start();
    }

    fn line_end(&mut self) {
        self.sink.line_end();
    }

    fn polygon_start(&mut self) {
        self.sink.polygon_start();
    }

    fn polygon_end(&mut self) {
        self.sink.polygon_end();
    }

    fn sphere(&mut self) {
        self.sink.sphere();
    }
}
