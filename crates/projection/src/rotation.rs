//! Composed spherical rotations.
//!
//! A rotation is a longitude shift `Δλ` followed by a tilt/roll `(Δφ, Δγ)`
//! about the x and y axes of the unit sphere. Both parts are invertible, so
//! the composition always is.

use core::f64::consts::TAU;

use foundation::math::{RADIANS, asin, wrap_longitude};

use crate::stream::Stream;

#[derive(Debug, Copy, Clone, PartialEq)]
struct PhiGamma {
    cos_delta_phi: f64,
    sin_delta_phi: f64,
    cos_delta_gamma: f64,
    sin_delta_gamma: f64,
}

impl PhiGamma {
    fn new(delta_phi: f64, delta_gamma: f64) -> Self {
        Self {
            cos_delta_phi: delta_phi.cos(),
            sin_delta_phi: delta_phi.sin(),
            cos_delta_gamma: delta_gamma.cos(),
            sin_delta_gamma: delta_gamma.sin(),
        }
    }

    fn forward(&self, lambda: f64, phi: f64) -> [f64; 2] {
        let cos_phi = phi.cos();
        let x = lambda.cos() * cos_phi;
        let y = lambda.sin() * cos_phi;
        let z = phi.sin();
        let k = z * self.cos_delta_phi + x * self.sin_delta_phi;
        [
            (y * self.cos_delta_gamma - k * self.sin_delta_gamma)
                .atan2(x * self.cos_delta_phi - z * self.sin_delta_phi),
            asin(k * self.cos_delta_gamma + y * self.sin_delta_gamma),
        ]
    }

    fn invert(&self, lambda: f64, phi: f64) -> [f64; 2] {
        let cos_phi = phi.cos();
        let x = lambda.cos() * cos_phi;
        let y = lambda.sin() * cos_phi;
        let z = phi.sin();
        let k = z * self.cos_delta_gamma - y * self.sin_delta_gamma;
        [
            (y * self.cos_delta_gamma + z * self.sin_delta_gamma)
                .atan2(x * self.cos_delta_phi + k * self.sin_delta_phi),
            asin(k * self.cos_delta_phi - x * self.sin_delta_phi),
        ]
    }
}

/// Invertible rotation of the sphere, angles in radians.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Rotator {
    delta_lambda: f64,
    phi_gamma: Option<PhiGamma>,
}

impl Default for Rotator {
    fn default() -> Self {
        Self::identity()
    }
}

impl Rotator {
    /// No rotation; still folds longitudes into `[-π, π]`.
    pub fn identity() -> Self {
        Self {
            delta_lambda: 0.0,
            phi_gamma: None,
        }
    }

    pub fn new(delta_lambda: f64, delta_phi: f64, delta_gamma: f64) -> Self {
        let delta_lambda = delta_lambda % TAU;
        let phi_gamma = if delta_phi != 0.0 || delta_gamma != 0.0 {
            Some(PhiGamma::new(delta_phi, delta_gamma))
        } else {
            None
        };
        Self {
            delta_lambda,
            phi_gamma,
        }
    }

    /// Rotation from `[yaw, pitch, roll]` in degrees.
    pub fn from_degrees(angles: [f64; 3]) -> Self {
        Self::new(
            angles[0] % 360.0 * RADIANS,
            angles[1] % 360.0 * RADIANS,
            angles[2] % 360.0 * RADIANS,
        )
    }

    pub fn is_identity(&self) -> bool {
        self.delta_lambda == 0.0 && self.phi_gamma.is_none()
    }

    pub fn rotate(&self, lambda: f64, phi: f64) -> [f64; 2] {
        let lambda = wrap_longitude(lambda + self.delta_lambda);
        match &self.phi_gamma {
            Some(pg) => pg.forward(lambda, phi),
            None => [lambda, phi],
        }
    }

    pub fn invert(&self, lambda: f64, phi: f64) -> [f64; 2] {
        let [lambda, phi] = match &self.phi_gamma {
            Some(pg) => pg.invert(lambda, phi),
            None => [lambda, phi],
        };
        [wrap_longitude(lambda - self.delta_lambda), phi]
    }
}

/// Pipeline stage applying a `Rotator` to every point.
#[derive(Debug)]
pub struct RotateStream<S> {
    rotator: Rotator,
    sink: S,
}

impl<S: Stream> RotateStream<S> {
    pub fn new(rotator: Rotator, sink: S) -> Self {
        Self { rotator, sink }
    }

    pub fn get_ref(&self) -> &S {
        &self.sink
    }

    pub fn into_inner(self) -> S {
        self.sink
    }
}

impl<S: Stream> Stream for RotateStream<S> {
    fn point(&mut self, x: f64, y: f64, _z: Option<f64>) {
        let [lambda, phi] = self.rotator.rotate(x, y);
        self.sink.point(lambda, phi, None);
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
