//! Planar affine step of the projection: reflect, scale, rotate, translate.
//!
//! The y axis is flipped so north points up on a y-down screen.

use crate::raw::Projector;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ScaleTranslateRotate {
    a: f64,
    b: f64,
    dx: f64,
    dy: f64,
    sx: f64,
    sy: f64,
    ai: f64,
    bi: f64,
    ci: f64,
    fi: f64,
}

impl ScaleTranslateRotate {
    /// `k` scale, `(dx, dy)` offset, `(sx, sy)` reflection signs (±1),
    /// `alpha` rotation in radians.
    pub fn new(k: f64, dx: f64, dy: f64, sx: f64, sy: f64, alpha: f64) -> Self {
        let (sin_alpha, cos_alpha) = if alpha == 0.0 { (0.0, 1.0) } else { alpha.sin_cos() };
        Self {
            a: cos_alpha * k,
            b: sin_alpha * k,
            dx,
            dy,
            sx,
            sy,
            ai: cos_alpha / k,
            bi: sin_alpha / k,
            ci: (sin_alpha * dy - cos_alpha * dx) / k,
            fi: (sin_alpha * dx + cos_alpha * dy) / k,
        }
    }

    pub fn apply(&self, x: f64, y: f64) -> [f64; 2] {
        let x = x * self.sx;
        let y = y * self.sy;
        [self.a * x - self.b * y + self.dx, self.dy - self.b * x - self.a * y]
    }

    pub fn invert(&self, x: f64, y: f64) -> [f64; 2] {
        [
            self.sx * (self.ai * x - self.bi * y + self.ci),
            self.sy * (self.fi - self.bi * x - self.ai * y),
        ]
    }
}

/// A raw projector followed by the affine transform; this is what the
/// resampler subdivides against, so its tolerance is in output units.
#[derive(Debug, Copy, Clone)]
pub struct ProjectTransform<P> {
    pub projector: P,
    pub transform: ScaleTranslateRotate,
}

impl<P: Projector> Projector for ProjectTransform<P> {
    fn project(&self, lambda: f64, phi: f64) -> [f64; 2] {
        let [x, y] = self.projector.project(lambda, phi);
        self.transform.apply(x, y)
    }

    fn invert(&self, x: f64, y: f64) -> Option<[f64; 2]> {
        let [x, y] = self.transform.invert(x, y);
        self.projector.invert(x, y)
    }

    fn default_scale(&self) -> f64 {
        self.projector.default_scale()
    }

    fn default_clip_angle(&self) -> Option<f64> {
        self.projector.default_clip_angle()
    }
}

#[cfg(test)]
mod tests {
    use super::ScaleTranslateRotate;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn scale_translate_flips_y() {
        let t = ScaleTranslateRotate::new(2.0, 10.0, 20.0, 1.0, 1.0, 0.0);
        assert_eq!(t.apply(1.0, 1.0), [12.0, 18.0]);
        assert_eq!(t.invert(12.0, 18.0), [1.0, 1.0]);
    }

    #[test]
    fn reflection_signs() {
        let t = ScaleTranslateRotate::new(1.0, 0.0, 0.0, -1.0, -1.0, 0.0);
        assert_eq!(t.apply(3.0, 4.0), [-3.0, 4.0]);
    }

    #[test]
    fn rotated_transform_inverts() {
        let t = ScaleTranslateRotate::new(150.0, 480.0, 250.0, 1.0, -1.0, 0.4);
        for p in [[0.1, 0.2], [-1.5, 0.7], [3.0, -2.0]] {
            let [x, y] = t.apply(p[0], p[1]);
            let q = t.invert(x, y);
            assert_close(q[0], p[0], 1e-12);
            assert_close(q[1], p[1], 1e-12);
        }
    }

    #[test]
    fn quarter_turn_rotates_axes() {
        let t = ScaleTranslateRotate::new(1.0, 0.0, 0.0, 1.0, 1.0, core::f64::consts::FRAC_PI_2);
        let [x, y] = t.apply(1.0, 0.0);
        assert_close(x, 0.0, 1e-15);
        assert_close(y, -1.0, 1e-15);
    }
}
