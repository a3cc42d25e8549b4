//! Cutting along the antimeridian (λ = ±π).

use core::f64::consts::PI;

use foundation::math::{EPSILON, HALF_PI};

use super::Direction;
use crate::stream::Stream;

/// Per-line filter splitting lines where they cross λ = ±π.
#[derive(Debug, Clone)]
pub struct AntimeridianLine {
    lambda0: f64,
    phi0: f64,
    sign0: f64,
    clean: bool,
}

impl Default for AntimeridianLine {
    fn default() -> Self {
        Self {
            lambda0: f64::NAN,
            phi0: f64::NAN,
            sign0: f64::NAN,
            clean: true,
        }
    }
}

impl AntimeridianLine {
    pub fn line_start<S: Stream + ?Sized>(&mut self, stream: &mut S) {
        stream.line_start();
        self.clean = true;
    }

    pub fn point<S: Stream + ?Sized>(&mut self, stream: &mut S, lambda1: f64, phi1: f64) {
        let mut lambda1 = lambda1;
        let sign1 = if lambda1 > 0.0 { PI } else { -PI };
        let delta = (lambda1 - self.lambda0).abs();

        if (delta - PI).abs() < EPSILON {
            // Half a turn apart: the great circle runs over a pole.
            self.phi0 = if (self.phi0 + phi1) / 2.0 > 0.0 {
                HALF_PI
            } else {
                -HALF_PI
            };
            stream.point(self.lambda0, self.phi0, None);
            stream.point(self.sign0, self.phi0, None);
            stream.line_end();
            stream.line_start();
            stream.point(sign1, self.phi0, None);
            stream.point(lambda1, self.phi0, None);
            self.clean = false;
        } else if self.sign0 != sign1 && delta >= PI {
            if (self.lambda0 - self.sign0).abs() < EPSILON {
                self.lambda0 -= self.sign0 * EPSILON;
            }
            if (lambda1 - sign1).abs() < EPSILON {
                lambda1 -= sign1 * EPSILON;
            }
            self.phi0 = intersect(self.lambda0, self.phi0, lambda1, phi1);
            stream.point(self.sign0, self.phi0, None);
            stream.line_end();
            stream.line_start();
            stream.point(sign1, self.phi0, None);
            self.clean = false;
        }
        self.lambda0 = lambda1;
        self.phi0 = phi1;
        stream.point(lambda1, phi1, None);
        self.sign0 = sign1;
    }

    pub fn line_end<S: Stream + ?Sized>(&mut self, stream: &mut S) {
        stream.line_end();
        self.lambda0 = f64::NAN;
        self.phi0 = f64::NAN;
    }

    /// 1 when the line never crossed, 2 when head and tail must be rejoined.
    pub fn clean(&self) -> u8 {
        if self.clean { 1 } else { 2 }
    }
}

/// Latitude at which the great circle through the two points meets the
/// antimeridian.
fn intersect(lambda0: f64, phi0: f64, lambda1: f64, phi1: f64) -> f64 {
    let sin_lambda0_lambda1 = (lambda0 - lambda1).sin();
    if sin_lambda0_lambda1.abs() > EPSILON {
        let cos_phi0 = phi0.cos();
        let cos_phi1 = phi1.cos();
        ((phi0.sin() * cos_phi1 * lambda1.sin() - phi1.sin() * cos_phi0 * lambda0.sin())
            / (cos_phi0 * cos_phi1 * sin_lambda0_lambda1))
            .atan()
    } else {
        (phi0 + phi1) / 2.0
    }
}

/// Walk the cut between two points on it, or the whole sphere outline.
pub fn interpolate<S: Stream + ?Sized>(
    from_to: Option<([f64; 2], [f64; 2])>,
    direction: Direction,
    stream: &mut S,
) {
    match from_to {
        None => {
            let phi = direction.sign() * HALF_PI;
            stream.point(-PI, phi, None);
            stream.point(0.0, phi, None);
            stream.point(PI, phi, None);
            stream.point(PI, 0.0, None);
            stream.point(PI, -phi, None);
            stream.point(0.0, -phi, None);
            stream.point(-PI, -phi, None);
            stream.point(-PI, 0.0, None);
            stream.point(-PI, phi, None);
        }
        Some((from, to)) if (from[0] - to[0]).abs() > EPSILON => {
            let lambda = if from[0] < to[0] { PI } else { -PI };
            let phi = direction.sign() * lambda / 2.0;
            stream.point(-lambda, phi, None);
            stream.point(0.0, phi, None);
            stream.point(lambda, phi, None);
        }
        Some((_, to)) => stream.point(to[0], to[1], None),
    }
}
