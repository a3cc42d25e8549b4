//! Streaming spherical projection pipeline.
//!
//! Geometry flows as push events through
//! degrees→radians → rotation → sphere clip → adaptive resampling →
//! extent clip → caller's sink. Every stage implements [`Stream`].

pub mod bounds;
pub mod buffer;
pub mod clip;
pub mod config;
pub mod error;
pub mod geometry;
pub mod polygon_contains;
pub mod projection;
pub mod raw;
pub mod resample;
pub mod rotation;
pub mod stream;
pub mod transform;

pub use bounds::BoundsSink;
pub use clip::{Clip, ClipStream, Direction};
pub use config::ProjectionConfig;
pub use error::ProjectionError;
pub use geometry::{GeoPoint, Geometry};
pub use projection::{Projection, ProjectionBuilder, ProjectionStream};
pub use raw::{
    AzimuthalEquidistant, Equirectangular, Gnomonic, Mercator, Orthographic, Projector,
    RawProjector,
};
pub use rotation::Rotator;
pub use stream::{Recorder, Stream};
