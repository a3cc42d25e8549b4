//! Clipping to an axis-aligned rectangle in the projected plane.

use core::cmp::Ordering;

use foundation::bounds::Aabb2;
use foundation::math::{EPSILON, stable_total_cmp_f64};

use super::Direction;
use super::line::clip_line;
use crate::stream::Stream;

/// Coordinates are clamped to this magnitude before segment clipping so
/// points projected to infinity still produce finite crossings.
const CLIP_MAX: f64 = 1e9;
const CLIP_MIN: f64 = -CLIP_MAX;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RectangleClip {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl RectangleClip {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn from_extent(extent: Aabb2) -> Self {
        Self::new(extent.min[0], extent.min[1], extent.max[0], extent.max[1])
    }

    pub fn extent(&self) -> Aabb2 {
        Aabb2::new([self.x0, self.y0], [self.x1, self.y1])
    }

    pub fn is_visible(&self, x: f64, y: f64) -> bool {
        self.extent().contains(x, y)
    }

    /// The `(x0, y1)` corner; polygon containment is decided for it.
    pub fn start(&self) -> [f64; 2] {
        [self.x0, self.y1]
    }

    pub fn line(&self) -> RectangleLine {
        RectangleLine {
            rect: *self,
            first: true,
            x_: f64::NAN,
            y_: f64::NAN,
            v_: false,
            v__: false,
            clean: true,
        }
    }

    /// Which edge a boundary point sits on, numbered 0..4 in walking order
    /// for `direction`.
    pub fn corner(&self, p: [f64; 2], direction: Direction) -> u8 {
        let forward = direction == Direction::Forward;
        if (p[0] - self.x0).abs() < EPSILON {
            if forward { 0 } else { 3 }
        } else if (p[0] - self.x1).abs() < EPSILON {
            if forward { 2 } else { 1 }
        } else if (p[1] - self.y0).abs() < EPSILON {
            if forward { 1 } else { 0 }
        } else if forward {
            3
        } else {
            2
        }
    }

    /// Signed position difference of two boundary points along the forward
    /// walk. Equal-corner ties compare along the shared edge.
    pub fn compare_point(&self, a: [f64; 2], b: [f64; 2]) -> f64 {
        let ca = self.corner(a, Direction::Forward);
        let cb = self.corner(b, Direction::Forward);
        if ca != cb {
            f64::from(ca) - f64::from(cb)
        } else {
            match ca {
                0 => b[1] - a[1],
                1 => a[0] - b[0],
                2 => a[1] - b[1],
                _ => b[0] - a[0],
            }
        }
    }

    pub fn compare_intersection(&self, a: [f64; 2], b: [f64; 2]) -> Ordering {
        stable_total_cmp_f64(self.compare_point(a, b), 0.0)
    }

    pub fn interpolate<S: Stream + ?Sized>(
        &self,
        from_to: Option<([f64; 2], [f64; 2])>,
        direction: Direction,
        stream: &mut S,
    ) {
        let (mut a, a1) = match from_to {
            None => (0, 0),
            Some((from, to)) => {
                let a = self.corner(from, direction);
                let a1 = self.corner(to, direction);
                let backwards = self.compare_point(from, to) < 0.0;
                if a == a1 && backwards == (direction == Direction::Forward) {
                    stream.point(to[0], to[1], None);
                    return;
                }
                (a, a1)
            }
        };
        let step = if direction == Direction::Forward { 1 } else { 3 };
        loop {
            let x = if a == 0 || a == 3 { self.x0 } else { self.x1 };
            let y = if a > 1 { self.y1 } else { self.y0 };
            stream.point(x, y, None);
            a = (a + step) % 4;
            if a == a1 {
                break;
            }
        }
    }

    /// Winding number of the rings around the `(x0, y1)` corner.
    pub fn polygon_winding(&self, polygon: &[Vec<[f64; 2]>]) -> i64 {
        let mut winding = 0;
        for ring in polygon {
            let n = ring.len();
            for j in 0..n {
                let [a0, a1] = ring[j];
                let [b0, b1] = ring[(j + 1) % n];
                if a1 <= self.y1 {
                    if b1 > self.y1 && (b0 - a0) * (self.y1 - a1) > (b1 - a1) * (self.x0 - a0) {
                        winding += 1;
                    }
                } else if b1 <= self.y1
                    && (b0 - a0) * (self.y1 - a1) < (b1 - a1) * (self.x0 - a0)
                {
                    winding -= 1;
                }
            }
        }
        winding
    }
}

/// Per-line filter for the rectangle.
#[derive(Debug, Clone)]
pub struct RectangleLine {
    rect: RectangleClip,
    first: bool,
    x_: f64,
    y_: f64,
    v_: bool,
    v__: bool,
    clean: bool,
}

impl RectangleLine {
    pub fn line_start<S: Stream + ?Sized>(&mut self, _stream: &mut S) {
        self.first = true;
        self.v_ = false;
        self.x_ = f64::NAN;
        self.y_ = f64::NAN;
        self.clean = true;
    }

    pub fn point<S: Stream + ?Sized>(&mut self, stream: &mut S, x: f64, y: f64) {
        let rect = self.rect;
        let v = rect.is_visible(x, y);
        let (mut x, mut y) = (x, y);
        if self.first {
            self.v__ = v;
            self.first = false;
            if v {
                stream.line_start();
                stream.point(x, y, None);
            }
        } else if v && self.v_ {
            stream.point(x, y, None);
        } else {
            self.x_ = self.x_.clamp(CLIP_MIN, CLIP_MAX);
            self.y_ = self.y_.clamp(CLIP_MIN, CLIP_MAX);
            x = x.clamp(CLIP_MIN, CLIP_MAX);
            y = y.clamp(CLIP_MIN, CLIP_MAX);
            match clip_line([self.x_, self.y_], [x, y], rect.x0, rect.y0, rect.x1, rect.y1) {
                Some((a, b)) => {
                    if !self.v_ {
                        stream.line_start();
                        stream.point(a[0], a[1], None);
                    }
                    stream.point(b[0], b[1], None);
                    if !v {
                        stream.line_end();
                    }
                    self.clean = false;
                }
                None if v => {
                    stream.line_start();
                    stream.point(x, y, None);
                    self.clean = false;
                }
                None => {}
            }
        }
        self.x_ = x;
        self.y_ = y;
        self.v_ = v;
    }

    pub fn line_end<S: Stream + ?Sized>(&mut self, stream: &mut S) {
        if self.v_ {
            stream.line_end();
        }
    }

    /// Same bit layout as the spherical filters.
    pub fn clean(&self) -> u8 {
        u8::from(self.clean) | (u8::from(self.v__ && self.v_) << 1)
    }
}

#[cfg(test)]
mod tests {
    use super::RectangleClip;
    use crate::clip::Direction;
    use crate::stream::Recorder;
    use pretty_assertions::assert_eq;

    fn rect() -> RectangleClip {
        RectangleClip::new(0.0, 0.0, 10.0, 10.0)
    }

    fn run(points: &[[f64; 2]]) -> (Vec<Vec<[f64; 2]>>, u8) {
        let r = rect();
        let mut rec = Recorder::new();
        let mut line = r.line();
        line.line_start(&mut rec);
        for p in points {
            line.point(&mut rec, p[0], p[1]);
        }
        line.line_end(&mut rec);
        (rec.lines(), line.clean())
    }

    #[test]
    fn corner_classification_golden() {
        let r = rect();
        let f = Direction::Forward;
        let b = Direction::Backward;
        assert_eq!(r.corner([0.0, 5.0], f), 0);
        assert_eq!(r.corner([5.0, 0.0], f), 1);
        assert_eq!(r.corner([10.0, 5.0], f), 2);
        assert_eq!(r.corner([5.0, 10.0], f), 3);
        assert_eq!(r.corner([0.0, 5.0], b), 3);
        assert_eq!(r.corner([5.0, 0.0], b), 0);
        assert_eq!(r.corner([10.0, 5.0], b), 1);
        assert_eq!(r.corner([5.0, 10.0], b), 2);
        // Corners resolve to the x edges first.
        assert_eq!(r.corner([0.0, 0.0], f), 0);
        assert_eq!(r.corner([10.0, 10.0], f), 2);
    }

    #[test]
    fn compare_point_golden() {
        let r = rect();
        // Along x0 the walk runs downward (y decreasing).
        assert!(r.compare_point([0.0, 8.0], [0.0, 2.0]) < 0.0);
        // Along y0 it runs rightward.
        assert!(r.compare_point([2.0, 0.0], [8.0, 0.0]) < 0.0);
        // Along x1 upward.
        assert!(r.compare_point([10.0, 2.0], [10.0, 8.0]) < 0.0);
        // Along y1 leftward.
        assert!(r.compare_point([8.0, 10.0], [2.0, 10.0]) < 0.0);
        assert_eq!(r.compare_point([0.0, 5.0], [10.0, 5.0]), -2.0);
    }

    #[test]
    fn full_boundary_walk() {
        let mut rec = Recorder::new();
        rect().interpolate(None, Direction::Forward, &mut rec);
        assert_eq!(
            rec.points(),
            vec![[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]]
        );
    }

    #[test]
    fn partial_walk_visits_corners_between() {
        let mut rec = Recorder::new();
        rect().interpolate(Some(([0.0, 5.0], [10.0, 5.0])), Direction::Forward, &mut rec);
        assert_eq!(rec.points(), vec![[0.0, 0.0], [10.0, 0.0]]);

        let mut rec = Recorder::new();
        rect().interpolate(Some(([10.0, 5.0], [0.0, 5.0])), Direction::Forward, &mut rec);
        assert_eq!(rec.points(), vec![[10.0, 10.0], [0.0, 10.0]]);
    }

    #[test]
    fn same_edge_walk_jumps_to_target() {
        let mut rec = Recorder::new();
        rect().interpolate(Some(([0.0, 8.0], [0.0, 2.0])), Direction::Forward, &mut rec);
        assert_eq!(rec.points(), vec![[0.0, 2.0]]);
    }

    #[test]
    fn line_through_rectangle_is_trimmed() {
        let (lines, clean) = run(&[[-5.0, 5.0], [15.0, 5.0]]);
        assert_eq!(lines, vec![vec![[0.0, 5.0], [10.0, 5.0]]]);
        assert_eq!(clean, 0);
    }

    #[test]
    fn inside_line_is_clean() {
        let (lines, clean) = run(&[[1.0, 1.0], [2.0, 2.0], [3.0, 1.0]]);
        assert_eq!(lines, vec![vec![[1.0, 1.0], [2.0, 2.0], [3.0, 1.0]]]);
        assert_eq!(clean, 3);
    }

    #[test]
    fn re_entering_line_splits() {
        let (lines, _) = run(&[[5.0, 5.0], [5.0, 15.0], [8.0, 5.0]]);
        assert_eq!(lines, vec![vec![[5.0, 5.0], [5.0, 10.0]], vec![[6.5, 10.0], [8.0, 5.0]]]);
    }

    #[test]
    fn winding_counts_enclosing_ring() {
        let r = rect();
        let enclosing = vec![vec![[-5.0, -5.0], [-5.0, 15.0], [15.0, 15.0], [15.0, -5.0]]];
        assert_ne!(r.polygon_winding(&enclosing), 0);
        let beside = vec![vec![[20.0, 0.0], [20.0, 5.0], [25.0, 5.0], [25.0, 0.0]]];
        assert_eq!(r.polygon_winding(&beside), 0);
    }
}
