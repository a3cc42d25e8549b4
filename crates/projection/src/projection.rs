//! Configured projection: rotation, clipping, resampling and the planar
//! transform composed into one streaming pipeline.

use std::sync::Arc;

use foundation::bounds::Aabb2;
use foundation::math::{DEGREES, RADIANS};
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::bounds::BoundsSink;
use crate::clip::rectangle::RectangleClip;
use crate::clip::{Clip, ClipStream};
use crate::error::ProjectionError;
use crate::geometry::Geometry;
use crate::raw::Projector;
use crate::resample::Resample;
use crate::rotation::{RotateStream, Rotator};
use crate::stream::{DegreesToRadians, Stream};
use crate::transform::{ProjectTransform, ScaleTranslateRotate};

pub const DEFAULT_TRANSLATE: [f64; 2] = [480.0, 250.0];
pub const DEFAULT_PRECISION: f64 = core::f64::consts::FRAC_1_SQRT_2;

/// Scale used while measuring geometry for the fit operations.
const FIT_SCALE: f64 = 150.0;

/// Everything a stream needs, derived from the projection's parameters.
#[derive(Debug, Copy, Clone, PartialEq)]
struct Compiled {
    rotator: Rotator,
    preclip: Clip,
    postclip: Option<Clip>,
    transform: ScaleTranslateRotate,
    delta2: f64,
}

/// Post-clip stage: the clip extent if one is set, otherwise pass-through.
#[derive(Debug)]
pub enum PostClip<S> {
    Identity(S),
    Extent(ClipStream<S>),
}

impl<S: Stream> PostClip<S> {
    pub fn into_inner(self) -> S {
        match self {
            PostClip::Identity(s) => s,
            PostClip::Extent(c) => c.into_inner(),
        }
    }
}

impl<S: Stream> Stream for PostClip<S> {
    fn point(&mut self, x: f64, y: f64, z: Option<f64>) {
        match self {
            PostClip::Identity(s) => s.point(x, y, z),
            PostClip::Extent(c) => c.point(x, y, z),
        }
    }

    fn line_start(&mut self) {
        match self {
            PostClip::Identity(s) => s.line_start(),
            PostClip::Extent(c) => c.line_start(),
        }
    }

    fn line_end(&mut self) {
        match self {
            PostClip::Identity(s) => s.line_end(),
            PostClip::Extent(c) => c.line_end(),
        }
    }

    fn polygon_start(&mut self) {
        match self {
            PostClip::Identity(s) => s.polygon_start(),
            PostClip::Extent(c) => c.polygon_start(),
        }
    }

    fn polygon_end(&mut self) {
        match self {
            PostClip::Identity(s) => s.polygon_end(),
            PostClip::Extent(c) => c.polygon_end(),
        }
    }

    fn sphere(&mut self) {
        match self {
            PostClip::Identity(s) => s.sphere(),
            PostClip::Extent(c) => c.sphere(),
        }
    }
}

type Chain<'a, P, S> =
    DegreesToRadians<RotateStream<ClipStream<Resample<ProjectTransform<&'a P>, PostClip<S>>>>>;

/// Input end of a projection pipeline; accepts `[lon, lat]` in degrees.
#[derive(Debug)]
pub struct ProjectionStream<'a, P, S> {
    chain: Chain<'a, P, S>,
}

impl<P: Projector, S: Stream> ProjectionStream<'_, P, S> {
    /// Tear down the pipeline and hand back the terminal sink.
    pub fn into_inner(self) -> S {
        self.chain
            .into_inner()
            .into_inner()
            .into_inner()
            .into_inner()
            .into_inner()
    }
}

impl<P: Projector, S: Stream> Stream for ProjectionStream<'_, P, S> {
    fn point(&mut self, x: f64, y: f64, z: Option<f64>) {
        self.chain.point(x, y, z);
    }

    fn line_start(&mut self) {
        self.chain.line_start();
    }

    fn line_end(&mut self) {
        self.chain.line_end();
    }

    fn polygon_start(&mut self) {
        self.chain.polygon_start();
    }

    fn polygon_end(&mut self) {
        self.chain.polygon_end();
    }

    fn sphere(&mut self) {
        self.chain.sphere();
    }
}

/// A projector plus its view parameters.
///
/// Every setter recomputes the derived planar offset and invalidates the
/// compiled pipeline; the next [`Projection::stream`] call rebuilds it.
#[derive(Debug)]
pub struct Projection<P> {
    projector: P,
    k: f64,
    x: f64,
    y: f64,
    lambda: f64,
    phi: f64,
    delta_lambda: f64,
    delta_phi: f64,
    delta_gamma: f64,
    alpha: f64,
    sx: f64,
    sy: f64,
    theta: Option<f64>,
    extent: Option<Aabb2>,
    delta2: f64,
    // Derived by `recenter`.
    rotator: Rotator,
    transform: ScaleTranslateRotate,
    generation: u64,
    compiled: Mutex<Option<(u64, Arc<Compiled>)>>,
}

impl<P: Projector + Clone> Clone for Projection<P> {
    fn clone(&self) -> Self {
        Self {
            projector: self.projector.clone(),
            k: self.k,
            x: self.x,
            y: self.y,
            lambda: self.lambda,
            phi: self.phi,
            delta_lambda: self.delta_lambda,
            delta_phi: self.delta_phi,
            delta_gamma: self.delta_gamma,
            alpha: self.alpha,
            sx: self.sx,
            sy: self.sy,
            theta: self.theta,
            extent: self.extent,
            delta2: self.delta2,
            rotator: self.rotator,
            transform: self.transform,
            generation: 0,
            compiled: Mutex::new(None),
        }
    }
}

fn validate_scale(k: f64) -> Result<f64, ProjectionError> {
    if k.is_finite() && k > 0.0 {
        Ok(k)
    } else {
        Err(ProjectionError::InvalidScale(k))
    }
}

fn validate_precision(p: f64) -> Result<f64, ProjectionError> {
    if p.is_finite() && p >= 0.0 {
        Ok(p)
    } else {
        Err(ProjectionError::InvalidPrecision(p))
    }
}

fn validate_extent(extent: Aabb2) -> Result<Aabb2, ProjectionError> {
    let [x0, y0] = extent.min;
    let [x1, y1] = extent.max;
    let finite = [x0, y0, x1, y1].iter().all(|v| v.is_finite());
    if finite && x0 <= x1 && y0 <= y1 {
        Ok(extent)
    } else {
        Err(ProjectionError::InvalidExtent { x0, y0, x1, y1 })
    }
}

/// Clip angle in degrees to the cap radius; zero, negative and NaN disable it.
fn clip_radius(angle: Option<f64>) -> Option<f64> {
    angle.filter(|a| *a > 0.0).map(|a| a * RADIANS)
}

impl<P: Projector> Projection<P> {
    /// Projection with the projector's default scale and clip angle,
    /// centred on `DEFAULT_TRANSLATE`.
    pub fn new(projector: P) -> Self {
        let k = projector.default_scale();
        let theta = clip_radius(projector.default_clip_angle());
        let mut projection = Self {
            projector,
            k,
            x: DEFAULT_TRANSLATE[0],
            y: DEFAULT_TRANSLATE[1],
            lambda: 0.0,
            phi: 0.0,
            delta_lambda: 0.0,
            delta_phi: 0.0,
            delta_gamma: 0.0,
            alpha: 0.0,
            sx: 1.0,
            sy: 1.0,
            theta,
            extent: None,
            delta2: DEFAULT_PRECISION * DEFAULT_PRECISION,
            rotator: Rotator::identity(),
            transform: ScaleTranslateRotate::new(k, 0.0, 0.0, 1.0, 1.0, 0.0),
            generation: 0,
            compiled: Mutex::new(None),
        };
        projection.recenter();
        projection
    }

    pub fn builder(projector: P) -> ProjectionBuilder<P> {
        ProjectionBuilder::new(projector)
    }

    pub fn projector(&self) -> &P {
        &self.projector
    }

    /// Recompute the planar offset that puts `center` at `translate`, and the
    /// rotation.
    fn recenter(&mut self) {
        let [px, py] = self.projector.project(self.lambda, self.phi);
        let center =
            ScaleTranslateRotate::new(self.k, 0.0, 0.0, self.sx, self.sy, self.alpha).apply(px, py);
        self.transform = ScaleTranslateRotate::new(
            self.k,
            self.x - center[0],
            self.y - center[1],
            self.sx,
            self.sy,
            self.alpha,
        );
        self.rotator = Rotator::new(self.delta_lambda, self.delta_phi, self.delta_gamma);
        self.invalidate();
    }

    fn invalidate(&mut self) {
        self.generation += 1;
        if self.compiled.get_mut().take().is_some() {
            debug!("projection changed, dropped compiled pipeline (generation {})", self.generation);
        }
    }

    fn compiled(&self) -> Arc<Compiled> {
        let mut slot = self.compiled.lock();
        if let Some((generation, compiled)) = slot.as_ref() {
            if *generation == self.generation {
                return Arc::clone(compiled);
            }
        }
        let compiled = Arc::new(Compiled {
            rotator: self.rotator,
            preclip: self.theta.map_or(Clip::Antimeridian, Clip::circle),
            postclip: self
                .extent
                .map(|e| Clip::Rectangle(RectangleClip::from_extent(e))),
            transform: self.transform,
            delta2: self.delta2,
        });
        debug!(
            "compiled projection pipeline (generation {}): preclip={:?} postclip={:?}",
            self.generation, compiled.preclip, compiled.postclip
        );
        *slot = Some((self.generation, Arc::clone(&compiled)));
        compiled
    }

    /// Build the pipeline feeding `sink`. Input is `[lon, lat]` in degrees.
    pub fn stream<S: Stream>(&self, sink: S) -> ProjectionStream<'_, P, S> {
        let c = self.compiled();
        let postclip = match c.postclip {
            Some(clip) => PostClip::Extent(clip.stream(sink)),
            None => PostClip::Identity(sink),
        };
        let project = ProjectTransform {
            projector: &self.projector,
            transform: c.transform,
        };
        let resample = Resample::new(project, c.delta2, postclip);
        ProjectionStream {
            chain: DegreesToRadians::new(RotateStream::new(c.rotator, c.preclip.stream(resample))),
        }
    }

    /// Stream `geometry` through the pipeline and return the sink.
    pub fn stream_geometry<S: Stream>(&self, geometry: &Geometry, sink: S) -> S {
        let mut stream = self.stream(sink);
        geometry.stream(&mut stream);
        stream.into_inner()
    }

    /// Project one `[lon, lat]` point in degrees. No clipping is applied.
    pub fn project(&self, point: [f64; 2]) -> [f64; 2] {
        let [lambda, phi] = self.rotator.rotate(point[0] * RADIANS, point[1] * RADIANS);
        let [x, y] = self.projector.project(lambda, phi);
        self.transform.apply(x, y)
    }

    /// Map a planar point back to `[lon, lat]` degrees.
    pub fn invert(&self, point: [f64; 2]) -> Result<[f64; 2], ProjectionError> {
        let [x, y] = self.transform.invert(point[0], point[1]);
        let [lambda, phi] = self
            .projector
            .invert(x, y)
            .ok_or(ProjectionError::NotInvertible)?;
        let [lambda, phi] = self.rotator.invert(lambda, phi);
        Ok([lambda * DEGREES, phi * DEGREES])
    }

    pub fn scale(&self) -> f64 {
        self.k
    }

    pub fn set_scale(&mut self, k: f64) -> Result<&mut Self, ProjectionError> {
        self.k = validate_scale(k)?;
        self.recenter();
        Ok(self)
    }

    pub fn translate(&self) -> [f64; 2] {
        [self.x, self.y]
    }

    pub fn set_translate(&mut self, translate: [f64; 2]) -> &mut Self {
        [self.x, self.y] = translate;
        self.recenter();
        self
    }

    /// `[lon, lat]` in degrees.
    pub fn center(&self) -> [f64; 2] {
        [self.lambda * DEGREES, self.phi * DEGREES]
    }

    pub fn set_center(&mut self, center: [f64; 2]) -> &mut Self {
        self.lambda = center[0] % 360.0 * RADIANS;
        self.phi = center[1] % 360.0 * RADIANS;
        self.recenter();
        self
    }

    /// `[yaw, pitch, roll]` in degrees.
    pub fn rotate(&self) -> [f64; 3] {
        [
            self.delta_lambda * DEGREES,
            self.delta_phi * DEGREES,
            self.delta_gamma * DEGREES,
        ]
    }

    pub fn set_rotate(&mut self, angles: [f64; 3]) -> &mut Self {
        self.delta_lambda = angles[0] % 360.0 * RADIANS;
        self.delta_phi = angles[1] % 360.0 * RADIANS;
        self.delta_gamma = angles[2] % 360.0 * RADIANS;
        self.recenter();
        self
    }

    /// Rotation of the plane after projection, in degrees.
    pub fn angle(&self) -> f64 {
        self.alpha * DEGREES
    }

    pub fn set_angle(&mut self, angle: f64) -> &mut Self {
        self.alpha = angle % 360.0 * RADIANS;
        self.recenter();
        self
    }

    pub fn reflect_x(&self) -> bool {
        self.sx < 0.0
    }

    pub fn set_reflect_x(&mut self, reflect: bool) -> &mut Self {
        self.sx = if reflect { -1.0 } else { 1.0 };
        self.recenter();
        self
    }

    pub fn reflect_y(&self) -> bool {
        self.sy < 0.0
    }

    pub fn set_reflect_y(&mut self, reflect: bool) -> &mut Self {
        self.sy = if reflect { -1.0 } else { 1.0 };
        self.recenter();
        self
    }

    /// Resampling tolerance in output units; zero disables resampling.
    pub fn precision(&self) -> f64 {
        self.delta2.sqrt()
    }

    pub fn set_precision(&mut self, precision: f64) -> Result<&mut Self, ProjectionError> {
        let p = validate_precision(precision)?;
        self.delta2 = p * p;
        self.invalidate();
        Ok(self)
    }

    /// Radius of the clip cap in degrees; `None` when cutting along the
    /// antimeridian.
    pub fn clip_angle(&self) -> Option<f64> {
        self.theta.map(|t| t * DEGREES)
    }

    pub fn set_clip_angle(&mut self, angle: Option<f64>) -> &mut Self {
        self.theta = clip_radius(angle);
        self.invalidate();
        self
    }

    pub fn clip_extent(&self) -> Option<Aabb2> {
        self.extent
    }

    pub fn set_clip_extent(&mut self, extent: Option<Aabb2>) -> Result<&mut Self, ProjectionError> {
        self.extent = extent.map(validate_extent).transpose()?;
        self.invalidate();
        Ok(self)
    }

    /// Measure `geometry` at a reference scale with no clip extent, then let
    /// `fit_bounds` pick the final scale and translate.
    fn fit(
        &mut self,
        geometry: &Geometry,
        fit_bounds: impl FnOnce(&mut Self, Aabb2) -> Result<(), ProjectionError>,
    ) -> Result<&mut Self, ProjectionError> {
        let saved = (self.k, self.x, self.y);
        let extent = self.extent.take();
        self.k = FIT_SCALE;
        [self.x, self.y] = [0.0, 0.0];
        self.recenter();

        let bounds = self.stream_geometry(geometry, BoundsSink::new()).result();
        let fitted = match bounds {
            Some(b) => fit_bounds(self, b),
            None => Err(ProjectionError::EmptyGeometry),
        };
        if fitted.is_err() {
            (self.k, self.x, self.y) = saved;
        }
        self.extent = extent;
        self.recenter();
        fitted.map(|()| self)
    }

    fn apply_fit(&mut self, k: f64, translate: [f64; 2]) -> Result<(), ProjectionError> {
        self.k = validate_scale(FIT_SCALE * k)?;
        [self.x, self.y] = translate;
        Ok(())
    }

    /// Scale and translate so `geometry` fills `extent` and is centred in it.
    pub fn fit_extent(
        &mut self,
        extent: Aabb2,
        geometry: &Geometry,
    ) -> Result<&mut Self, ProjectionError> {
        let extent = validate_extent(extent)?;
        self.fit(geometry, |p, b| {
            let w = extent.width();
            let h = extent.height();
            let k = (w / b.width()).min(h / b.height());
            let x = extent.min[0] + (w - k * (b.max[0] + b.min[0])) / 2.0;
            let y = extent.min[1] + (h - k * (b.max[1] + b.min[1])) / 2.0;
            p.apply_fit(k, [x, y])
        })
    }

    pub fn fit_size(&mut self, size: [f64; 2], geometry: &Geometry) -> Result<&mut Self, ProjectionError> {
        self.fit_extent(Aabb2::new([0.0, 0.0], size), geometry)
    }

    /// Fit the width; the top of the geometry lands on `y = 0`.
    pub fn fit_width(&mut self, width: f64, geometry: &Geometry) -> Result<&mut Self, ProjectionError> {
        self.fit(geometry, |p, b| {
            let k = width / b.width();
            let x = (width - k * (b.max[0] + b.min[0])) / 2.0;
            let y = -k * b.min[1];
            p.apply_fit(k, [x, y])
        })
    }

    /// Fit the height; the left of the geometry lands on `x = 0`.
    pub fn fit_height(&mut self, height: f64, geometry: &Geometry) -> Result<&mut Self, ProjectionError> {
        self.fit(geometry, |p, b| {
            let k = height / b.height();
            let x = -k * b.min[0];
            let y = (height - k * (b.max[1] + b.min[1])) / 2.0;
            p.apply_fit(k, [x, y])
        })
    }
}

/// Sets every parameter first and derives the planar offset once.
#[derive(Debug, Clone)]
pub struct ProjectionBuilder<P> {
    projector: P,
    scale: Option<f64>,
    translate: [f64; 2],
    center: [f64; 2],
    rotate: [f64; 3],
    angle: f64,
    reflect_x: bool,
    reflect_y: bool,
    precision: f64,
    clip_angle: Option<f64>,
    clip_extent: Option<Aabb2>,
}

impl<P: Projector> ProjectionBuilder<P> {
    pub fn new(projector: P) -> Self {
        let clip_angle = projector.default_clip_angle();
        Self {
            projector,
            scale: None,
            translate: DEFAULT_TRANSLATE,
            center: [0.0, 0.0],
            rotate: [0.0, 0.0, 0.0],
            angle: 0.0,
            reflect_x: false,
            reflect_y: false,
            precision: DEFAULT_PRECISION,
            clip_angle,
            clip_extent: None,
        }
    }

    pub fn scale(mut self, k: f64) -> Self {
        self.scale = Some(k);
        self
    }

    pub fn translate(mut self, translate: [f64; 2]) -> Self {
        self.translate = translate;
        self
    }

    pub fn center(mut self, center: [f64; 2]) -> Self {
        self.center = center;
        self
    }

    pub fn rotate(mut self, angles: [f64; 3]) -> Self {
        self.rotate = angles;
        self
    }

    pub fn angle(mut self, angle: f64) -> Self {
        self.angle = angle;
        self
    }

    pub fn reflect_x(mut self, reflect: bool) -> Self {
        self.reflect_x = reflect;
        self
    }

    pub fn reflect_y(mut self, reflect: bool) -> Self {
        self.reflect_y = reflect;
        self
    }

    pub fn precision(mut self, precision: f64) -> Self {
        self.precision = precision;
        self
    }

    /// `None`, zero or a negative angle selects the antimeridian cut.
    pub fn clip_angle(mut self, angle: Option<f64>) -> Self {
        self.clip_angle = angle;
        self
    }

    pub fn clip_extent(mut self, extent: Option<Aabb2>) -> Self {
        self.clip_extent = extent;
        self
    }

    fn validate(&self) -> Result<(f64, f64, Option<Aabb2>), ProjectionError> {
        let k = validate_scale(self.scale.unwrap_or_else(|| self.projector.default_scale()))?;
        let precision = validate_precision(self.precision)?;
        let extent = self.clip_extent.map(validate_extent).transpose()?;
        Ok((k, precision, extent))
    }

    pub fn build(self) -> Result<Projection<P>, ProjectionError> {
        let (k, precision, extent) = self.validate().inspect_err(|err| {
            warn!("rejected projection parameters: {err}");
        })?;
        let mut p = Projection::new(self.projector);
        p.k = k;
        [p.x, p.y] = self.translate;
        p.lambda = self.center[0] % 360.0 * RADIANS;
        p.phi = self.center[1] % 360.0 * RADIANS;
        p.delta_lambda = self.rotate[0] % 360.0 * RADIANS;
        p.delta_phi = self.rotate[1] % 360.0 * RADIANS;
        p.delta_gamma = self.rotate[2] % 360.0 * RADIANS;
        p.alpha = self.angle % 360.0 * RADIANS;
        p.sx = if self.reflect_x { -1.0 } else { 1.0 };
        p.sy = if self.reflect_y { -1.0 } else { 1.0 };
        p.delta2 = precision * precision;
        p.theta = clip_radius(self.clip_angle);
        p.extent = extent;
        p.recenter();
        Ok(p)
    }
}

#[cfg(test)]
mod tests {
    use super::{Projection, ProjectionError};
    use crate::geometry::Geometry;
    use crate::raw::{Equirectangular, Orthographic, Projector};
    use crate::stream::{Recorder, Stream};
    use core::f64::consts::PI;
    use foundation::bounds::Aabb2;
    use pretty_assertions::assert_eq;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[derive(Debug)]
    struct ForwardOnly;

    impl Projector for ForwardOnly {
        fn project(&self, lambda: f64, phi: f64) -> [f64; 2] {
            [lambda, phi.sin()]
        }
    }

    #[test]
    fn origin_lands_on_translate() {
        let p = Projection::new(Equirectangular);
        let [x, y] = p.project([0.0, 0.0]);
        assert_close(x, 480.0, 1e-9);
        assert_close(y, 250.0, 1e-9);
        // North is up.
        assert!(p.project([0.0, 10.0])[1] < 250.0);
    }

    #[test]
    fn center_moves_to_translate() {
        let mut p = Projection::new(Equirectangular);
        p.set_center([10.0, 20.0]);
        let [x, y] = p.project([10.0, 20.0]);
        assert_close(x, 480.0, 1e-9);
        assert_close(y, 250.0, 1e-9);
    }

    #[test]
    fn round_trip_through_every_stage() {
        let p = Projection::builder(Orthographic)
            .scale(300.0)
            .translate([100.0, 50.0])
            .rotate([20.0, -30.0, 10.0])
            .center([2.0, 3.0])
            .angle(15.0)
            .reflect_x(true)
            .build()
            .unwrap();
        for q in [[-10.0, 25.0], [30.0, -40.0], [-5.0, -5.0]] {
            let xy = p.project(q);
            let back = p.invert(xy).unwrap();
            assert_close(back[0], q[0], 1e-6);
            assert_close(back[1], q[1], 1e-6);
        }
    }

    #[test]
    fn invert_without_inverse_fails() {
        let p = Projection::new(ForwardOnly);
        assert!(matches!(p.invert([0.0, 0.0]), Err(ProjectionError::NotInvertible)));
    }

    #[test]
    fn setters_validate_their_input() {
        let mut p = Projection::new(Equirectangular);
        assert!(matches!(p.set_scale(0.0), Err(ProjectionError::InvalidScale(_))));
        assert!(matches!(p.set_precision(-1.0), Err(ProjectionError::InvalidPrecision(_))));
        let inverted = Aabb2::new([10.0, 0.0], [0.0, 10.0]);
        assert!(matches!(
            p.set_clip_extent(Some(inverted)),
            Err(ProjectionError::InvalidExtent { .. })
        ));
        assert_eq!(p.clip_extent(), None);
        assert!(Projection::builder(Equirectangular).scale(f64::NAN).build().is_err());
    }

    #[test]
    fn compiled_pipeline_is_cached_until_a_setter_runs() {
        let mut p = Projection::new(Equirectangular);
        let _ = p.stream(Recorder::new());
        let generation = p.generation;
        assert!(p.compiled.lock().as_ref().is_some_and(|(g, _)| *g == generation));
        let _ = p.stream(Recorder::new());
        assert_eq!(p.generation, generation);

        p.set_precision(0.0).unwrap();
        assert!(p.generation > generation);
        assert!(p.compiled.lock().is_none());
        let _ = p.stream(Recorder::new());
        assert!(p.compiled.lock().as_ref().is_some_and(|(g, c)| *g == p.generation && c.delta2 == 0.0));
    }

    #[test]
    fn antimeridian_line_is_split() {
        let mut p = Projection::new(Equirectangular);
        p.set_precision(0.0).unwrap();
        let k = p.scale();
        let rec = p.stream_geometry(
            &Geometry::line_string(&[[179.0, 0.0], [-179.0, 0.0]]),
            Recorder::new(),
        );
        let lines = rec.lines();
        assert_eq!(lines.len(), 2);
        assert_close(lines[0][1][0], 480.0 + k * PI, 1e-6);
        assert_close(lines[0][1][1], 250.0, 1e-6);
        assert_close(lines[1][0][0], 480.0 - k * PI, 1e-6);
        assert_close(lines[1][0][1], 250.0, 1e-6);
    }

    #[test]
    fn far_side_points_are_clipped_on_the_globe() {
        let p = Projection::new(Orthographic);
        assert!(p.clip_angle().is_some());
        let rec = p.stream_geometry(
            &Geometry::MultiPoint(vec![[0.0, 0.0].into(), [180.0, 0.0].into()]),
            Recorder::new(),
        );
        assert_eq!(rec.points(), vec![[480.0, 250.0]]);
    }

    #[test]
    fn extent_inside_the_sphere_is_filled() {
        let mut p = Projection::new(Equirectangular);
        p.set_clip_extent(Some(Aabb2::new([100.0, 100.0], [200.0, 200.0])))
            .unwrap();
        let rec = p.stream_geometry(&Geometry::Sphere, Recorder::new());
        assert_eq!(
            rec.lines(),
            vec![vec![[100.0, 100.0], [200.0, 100.0], [200.0, 200.0], [100.0, 200.0]]]
        );
    }

    #[test]
    fn fit_size_centres_the_geometry() {
        let square = Geometry::polygon(&[&[
            [-10.0, -10.0],
            [-10.0, 10.0],
            [10.0, 10.0],
            [10.0, -10.0],
            [-10.0, -10.0],
        ]]);
        let extent = Aabb2::new([1.0, 2.0], [3.0, 4.0]);
        let mut p = Projection::new(Equirectangular);
        p.set_clip_extent(Some(extent)).unwrap();
        p.fit_size([960.0, 500.0], &square).unwrap();

        let [x, y] = p.project([0.0, 0.0]);
        assert_close(x, 480.0, 1e-6);
        assert_close(y, 250.0, 1e-6);
        for corner in [[-10.0, -10.0], [10.0, 10.0]] {
            let [x, y] = p.project(corner);
            assert!((-1e-6..=960.0 + 1e-6).contains(&x));
            assert!((-1e-6..=500.0 + 1e-6).contains(&y));
        }
        assert_eq!(p.clip_extent(), Some(extent));
    }

    #[test]
    fn fit_width_pins_the_top_edge() {
        let line = Geometry::line_string(&[[0.0, 0.0], [0.0, 20.0]]);
        let mut p = Projection::new(Equirectangular);
        p.set_precision(0.0).unwrap();
        // A vertical line has no width to fit.
        assert!(p.fit_width(100.0, &line).is_err());

        let line = Geometry::line_string(&[[0.0, 0.0], [20.0, 10.0]]);
        p.fit_width(100.0, &line).unwrap();
        assert_close(p.project([0.0, 0.0])[0], 0.0, 1e-6);
        assert_close(p.project([20.0, 10.0])[0], 100.0, 1e-6);
        assert_close(p.project([20.0, 10.0])[1], 0.0, 1e-6);
    }

    #[test]
    fn fitting_nothing_is_an_error() {
        let mut p = Projection::new(Equirectangular);
        let before = (p.scale(), p.translate());
        let err = p.fit_size([10.0, 10.0], &Geometry::MultiPoint(Vec::new()));
        assert!(matches!(err, Err(ProjectionError::EmptyGeometry)));
        assert_eq!((p.scale(), p.translate()), before);
    }

    #[test]
    fn streaming_by_hand_matches_project() {
        let p = Projection::new(Equirectangular);
        let mut rec = Recorder::new();
        {
            let mut s = p.stream(&mut rec);
            s.point(12.0, -7.0, None);
        }
        assert_eq!(rec.points(), vec![p.project([12.0, -7.0])]);
    }
}
