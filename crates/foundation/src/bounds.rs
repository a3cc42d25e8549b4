/// Axis-aligned planar box, `min` and `max` inclusive.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb2 {
    pub min: [f64; 2],
    pub max: [f64; 2],
}

impl Aabb2 {
    pub fn new(min: [f64; 2], max: [f64; 2]) -> Self {
        Aabb2 { min, max }
    }

    /// Inverted box that any `extend` call replaces.
    pub fn empty() -> Self {
        Aabb2 {
            min: [f64::INFINITY, f64::INFINITY],
            max: [f64::NEG_INFINITY, f64::NEG_INFINITY],
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.min[0] <= self.max[0] && self.min[1] <= self.max[1])
    }

    pub fn extend(&mut self, x: f64, y: f64) {
        if x < self.min[0] {
            self.min[0] = x;
        }
        if x > self.max[0] {
            self.max[0] = x;
        }
        if y < self.min[1] {
            self.min[1] = y;
        }
        if y > self.max[1] {
            self.max[1] = y;
        }
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.min[0] <= x && x <= self.max[0] && self.min[1] <= y && y <= self.max[1]
    }

    pub fn width(&self) -> f64 {
        self.max[0] - self.min[0]
    }

    pub fn height(&self) -> f64 {
        self.max[1] - self.min[1]
    }
}

#[cfg(test)]
mod tests {
    use super::Aabb2;

    #[test]
    fn extend_grows_from_empty() {
        let mut b = Aabb2::empty();
        assert!(b.is_empty());
        b.extend(1.0, -2.0);
        b.extend(-3.0, 4.0);
        assert_eq!(b, Aabb2::new([-3.0, -2.0], [1.0, 4.0]));
        assert_eq!(b.width(), 4.0);
        assert_eq!(b.height(), 6.0);
    }

    #[test]
    fn contains_is_inclusive() {
        let b = Aabb2::new([0.0, 0.0], [1.0, 1.0]);
        assert!(b.contains(0.0, 1.0));
        assert!(!b.contains(1.5, 0.5));
    }
}
