//! Raw projection formulas: unit-sphere `(λ, φ)` radians to the unscaled
//! plane, with optional inverses.

use core::f64::consts::TAU;

use foundation::math::{EPSILON, HALF_PI, acos, asin};
use serde::{Deserialize, Serialize};

/// A projection formula.
///
/// `invert` returns `None` when the formula has no inverse.
pub trait Projector {
    fn project(&self, lambda: f64, phi: f64) -> [f64; 2];

    fn invert(&self, _x: f64, _y: f64) -> Option<[f64; 2]> {
        None
    }

    /// Scale that fits the world into a 960×500 frame.
    fn default_scale(&self) -> f64 {
        150.0
    }

    /// Clip angle in degrees applied by default; `None` cuts along the
    /// antimeridian instead.
    fn default_clip_angle(&self) -> Option<f64> {
        None
    }
}

impl<P: Projector + ?Sized> Projector for &P {
    fn project(&self, lambda: f64, phi: f64) -> [f64; 2] {
        (**self).project(lambda, phi)
    }

    fn invert(&self, x: f64, y: f64) -> Option<[f64; 2]> {
        (**self).invert(x, y)
    }

    fn default_scale(&self) -> f64 {
        (**self).default_scale()
    }

    fn default_clip_angle(&self) -> Option<f64> {
        (**self).default_clip_angle()
    }
}

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Equirectangular;

impl Projector for Equirectangular {
    fn project(&self, lambda: f64, phi: f64) -> [f64; 2] {
        [lambda, phi]
    }

    fn invert(&self, x: f64, y: f64) -> Option<[f64; 2]> {
        Some([x, y])
    }

    fn default_scale(&self) -> f64 {
        152.63
    }
}

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Mercator;

impl Projector for Mercator {
    fn project(&self, lambda: f64, phi: f64) -> [f64; 2] {
        [lambda, ((HALF_PI + phi) / 2.0).tan().ln()]
    }

    fn invert(&self, x: f64, y: f64) -> Option<[f64; 2]> {
        Some([x, 2.0 * y.exp().atan() - HALF_PI])
    }

    fn default_scale(&self) -> f64 {
        961.0 / TAU
    }
}

/// Shared inverse of the azimuthal family; `angle` maps the planar radius
/// back to the angular distance from the centre.
fn azimuthal_invert(x: f64, y: f64, angle: impl Fn(f64) -> f64) -> [f64; 2] {
    let z = x.hypot(y);
    let c = angle(z);
    let sc = c.sin();
    let cc = c.cos();
    let phi = if z == 0.0 { 0.0 } else { asin(y * sc / z) };
    [(x * sc).atan2(z * cc), phi]
}

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Orthographic;

impl Projector for Orthographic {
    fn project(&self, lambda: f64, phi: f64) -> [f64; 2] {
        [phi.cos() * lambda.sin(), phi.sin()]
    }

    fn invert(&self, x: f64, y: f64) -> Option<[f64; 2]> {
        Some(azimuthal_invert(x, y, asin))
    }

    fn default_scale(&self) -> f64 {
        249.5
    }

    fn default_clip_angle(&self) -> Option<f64> {
        Some(90.0 + EPSILON)
    }
}

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Gnomonic;

impl Projector for Gnomonic {
    fn project(&self, lambda: f64, phi: f64) -> [f64; 2] {
        let cy = phi.cos();
        let k = lambda.cos() * cy;
        [cy * lambda.sin() / k, phi.sin() / k]
    }

    fn invert(&self, x: f64, y: f64) -> Option<[f64; 2]> {
        Some(azimuthal_invert(x, y, f64::atan))
    }

    fn default_scale(&self) -> f64 {
        144.049
    }

    fn default_clip_angle(&self) -> Option<f64> {
        Some(60.0)
    }
}

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct AzimuthalEquidistant;

impl Projector for AzimuthalEquidistant {
    fn project(&self, lambda: f64, phi: f64) -> [f64; 2] {
        let cx = lambda.cos();
        let cy = phi.cos();
        let c = acos(cx * cy);
        let k = if c == 0.0 { 0.0 } else { c / c.sin() };
        if k.is_infinite() {
            return [2.0, 0.0];
        }
        [k * cy * lambda.sin(), k * phi.sin()]
    }

    fn invert(&self, x: f64, y: f64) -> Option<[f64; 2]> {
        Some(azimuthal_invert(x, y, |z| z))
    }

    fn default_scale(&self) -> f64 {
        79.4188
    }

    fn default_clip_angle(&self) -> Option<f64> {
        Some(180.0 - 1e-3)
    }
}

/// Projector chosen at runtime, e.g. from configuration.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RawProjector {
    #[default]
    Equirectangular,
    Mercator,
    Orthographic,
    Gnomonic,
    AzimuthalEquidistant,
}

impl RawProjector {
    fn as_dyn(&self) -> &'static dyn Projector {
        match self {
            RawProjector::Equirectangular => &Equirectangular,
            RawProjector::Mercator => &Mercator,
            RawProjector::Orthographic => &Orthographic,
            RawProjector::Gnomonic => &Gnomonic,
            RawProjector::AzimuthalEquidistant => &AzimuthalEquidistant,
        }
    }
}

impl Projector for RawProjector {
    fn project(&self, lambda: f64, phi: f64) -> [f64; 2] {
        self.as_dyn().project(lambda, phi)
    }

    fn invert(&self, x: f64, y: f64) -> Option<[f64; 2]> {
        self.as_dyn().invert(x, y)
    }

    fn default_scale(&self) -> f64 {
        self.as_dyn().default_scale()
    }

    fn default_clip_angle(&self) -> Option<f64> {
        self.as_dyn().default_clip_angle()
    }
}
