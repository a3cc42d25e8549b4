//! Geographic geometry in degrees and its traversal into a [`Stream`].

use crate::stream::Stream;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GeoPoint {
    pub lon_deg: f64,
    pub lat_deg: f64,
}

impl GeoPoint {
    pub fn new(lon_deg: f64, lat_deg: f64) -> Self {
        Self { lon_deg, lat_deg }
    }
}

impl From<[f64; 2]> for GeoPoint {
    fn from(p: [f64; 2]) -> Self {
        Self::new(p[0], p[1])
    }
}

/// Polygon rings are closed: the last coordinate repeats the first.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(GeoPoint),
    MultiPoint(Vec<GeoPoint>),
    LineString(Vec<GeoPoint>),
    MultiLineString(Vec<Vec<GeoPoint>>),
    Polygon(Vec<Vec<GeoPoint>>),
    MultiPolygon(Vec<Vec<Vec<GeoPoint>>>),
    GeometryCollection(Vec<Geometry>),
    /// The whole globe.
    Sphere,
}

fn stream_line<S: Stream + ?Sized>(line: &[GeoPoint], closed: bool, stream: &mut S) {
    let n = if closed {
        line.len().saturating_sub(1)
    } else {
        line.len()
    };
    stream.line_start();
    for p in &line[..n] {
        stream.point(p.lon_deg, p.lat_deg, None);
    }
    stream.line_end();
}

fn stream_polygon<S: Stream + ?Sized>(rings: &[Vec<GeoPoint>], stream: &mut S) {
    stream.polygon_start();
    for ring in rings {
        stream_line(ring, true, stream);
    }
    stream.polygon_end();
}

impl Geometry {
    /// Emit this geometry's events, coordinates in degrees.
    pub fn stream<S: Stream + ?Sized>(&self, stream: &mut S) {
        match self {
            Geometry::Point(p) => stream.point(p.lon_deg, p.lat_deg, None),
            Geometry::MultiPoint(points) => {
                for p in points {
                    stream.point(p.lon_deg, p.lat_deg, None);
                }
            }
            Geometry::LineString(line) => stream_line(line, false, stream),
            Geometry::MultiLineString(lines) => {
                for line in lines {
                    stream_line(line, false, stream);
                }
            }
            Geometry::Polygon(rings) => stream_polygon(rings, stream),
            Geometry::MultiPolygon(polygons) => {
                for rings in polygons {
                    stream_polygon(rings, stream);
                }
            }
            Geometry::GeometryCollection(geometries) => {
                for g in geometries {
                    g.stream(stream);
                }
            }
            Geometry::Sphere => stream.sphere(),
        }
    }

    pub fn line_string(points: &[[f64; 2]]) -> Self {
        Geometry::LineString(points.iter().copied().map(GeoPoint::from).collect())
    }

    pub fn polygon(rings: &[&[[f64; 2]]]) -> Self {
        Geometry::Polygon(
            rings
                .iter()
                .map(|ring| ring.iter().copied().map(GeoPoint::from).collect())
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{GeoPoint, Geometry};
    use crate::stream::{Event, Recorder};
    use pretty_assertions::assert_eq;

    fn point(x: f64, y: f64) -> Event {
        Event::Point { x, y, z: None }
    }

    #[test]
    fn polygon_rings_drop_the_closing_point() {
        let g = Geometry::polygon(&[&[[0.0, 0.0], [0.0, 1.0], [1.0, 1.0], [0.0, 0.0]]]);
        let mut rec = Recorder::new();
        g.stream(&mut rec);
        assert_eq!(
            rec.events(),
            &[
                Event::PolygonStart,
                Event::LineStart,
                point(0.0, 0.0),
                point(0.0, 1.0),
                point(1.0, 1.0),
                Event::LineEnd,
                Event::PolygonEnd,
            ]
        );
    }

    #[test]
    fn line_strings_keep_every_point() {
        let g = Geometry::line_string(&[[0.0, 0.0], [5.0, 5.0], [0.0, 0.0]]);
        let mut rec = Recorder::new();
        g.stream(&mut rec);
        assert_eq!(rec.lines(), vec![vec![[0.0, 0.0], [5.0, 5.0], [0.0, 0.0]]]);
    }

    #[test]
    fn collection_and_sphere() {
        let g = Geometry::GeometryCollection(vec![
            Geometry::MultiPoint(vec![GeoPoint::new(1.0, 2.0), GeoPoint::new(3.0, 4.0)]),
            Geometry::Sphere,
        ]);
        let mut rec = Recorder::new();
        g.stream(&mut rec);
        assert_eq!(
            rec.events(),
            &[point(1.0, 2.0), point(3.0, 4.0), Event::Sphere]
        );
    }
}
