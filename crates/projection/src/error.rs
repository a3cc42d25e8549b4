use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProjectionError {
    #[error("projection is not invertible")]
    NotInvertible,
    #[error("invalid scale {0}: must be finite and positive")]
    InvalidScale(f64),
    #[error("invalid precision {0}: must be finite and non-negative")]
    InvalidPrecision(f64),
    #[error("invalid extent [{x0}, {y0}, {x1}, {y1}]")]
    InvalidExtent { x0: f64, y0: f64, x1: f64, y1: f64 },
    #[error("geometry has no projected extent to fit")]
    EmptyGeometry,
    #[error("invalid projection config: {0}")]
    Config(#[from] serde_json::Error),
}
