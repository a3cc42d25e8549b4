//! Planar bounding box of projected output.

use foundation::bounds::Aabb2;

use crate::stream::Stream;

/// Terminal sink accumulating the bounding box of every point it sees.
#[derive(Debug, Clone, Copy)]
pub struct BoundsSink {
    bounds: Aabb2,
}

impl Default for BoundsSink {
    fn default() -> Self {
        Self {
            bounds: Aabb2::empty(),
        }
    }
}

impl BoundsSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` until a point has been seen.
    pub fn result(&self) -> Option<Aabb2> {
        (!self.bounds.is_empty()).then_some(self.bounds)
    }
}

impl Stream for BoundsSink {
    fn point(&mut self, x: f64, y: f64, _z: Option<f64>) {
        self.bounds.extend(x, y);
    }
}

#[cfg(test)]
mod tests {
    use super::BoundsSink;
    use crate::stream::Stream;

    #[test]
    fn empty_until_a_point_arrives() {
        let mut b = BoundsSink::new();
        assert_eq!(b.result(), None);
        b.line_start();
        b.point(3.0, -1.0, None);
        b.point(-2.0, 4.0, None);
        b.line_end();
        let r = b.result().unwrap();
        assert_eq!(r.min, [-2.0, -1.0]);
        assert_eq!(r.max, [3.0, 4.0]);
    }
}
