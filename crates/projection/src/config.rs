//! Serializable projection parameters.

use foundation::bounds::Aabb2;
use serde::{Deserialize, Serialize};

use crate::error::ProjectionError;
use crate::projection::{DEFAULT_PRECISION, DEFAULT_TRANSLATE, Projection};
use crate::raw::{Projector, RawProjector};

/// All view parameters of a [`Projection`], angles in degrees.
///
/// `scale` and `clip_angle` fall back to the projector's defaults when
/// absent; a `clip_angle` of zero selects the antimeridian cut.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectionConfig {
    pub projector: RawProjector,
    pub scale: Option<f64>,
    pub translate: [f64; 2],
    pub center: [f64; 2],
    pub rotate: [f64; 3],
    pub angle: f64,
    pub reflect_x: bool,
    pub reflect_y: bool,
    pub precision: f64,
    pub clip_angle: Option<f64>,
    /// `[[x0, y0], [x1, y1]]`.
    pub clip_extent: Option<[[f64; 2]; 2]>,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            projector: RawProjector::default(),
            scale: None,
            translate: DEFAULT_TRANSLATE,
            center: [0.0, 0.0],
            rotate: [0.0, 0.0, 0.0],
            angle: 0.0,
            reflect_x: false,
            reflect_y: false,
            precision: DEFAULT_PRECISION,
            clip_angle: None,
            clip_extent: None,
        }
    }
}

impl ProjectionConfig {
    pub fn from_json(json: &str) -> Result<Self, ProjectionError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ProjectionError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn build(&self) -> Result<Projection<RawProjector>, ProjectionError> {
        let clip_angle = self
            .clip_angle
            .or_else(|| self.projector.default_clip_angle());
        let mut builder = Projection::builder(self.projector)
            .translate(self.translate)
            .center(self.center)
            .rotate(self.rotate)
            .angle(self.angle)
            .reflect_x(self.reflect_x)
            .reflect_y(self.reflect_y)
            .precision(self.precision)
            .clip_angle(clip_angle)
            .clip_extent(self.clip_extent.map(|[min, max]| Aabb2::new(min, max)));
        if let Some(k) = self.scale {
            builder = builder.scale(k);
        }
        builder.build()
    }
}

impl Projection<RawProjector> {
    /// Snapshot of the current parameters.
    pub fn to_config(&self) -> ProjectionConfig {
        ProjectionConfig {
            projector: *self.projector(),
            scale: Some(self.scale()),
            translate: self.translate(),
            center: self.center(),
            rotate: self.rotate(),
            angle: self.angle(),
            reflect_x: self.reflect_x(),
            reflect_y: self.reflect_y(),
            precision: self.precision(),
            clip_angle: Some(self.clip_angle().unwrap_or(0.0)),
            clip_extent: self.clip_extent().map(|e| [e.min, e.max]),
        }
    }
}
