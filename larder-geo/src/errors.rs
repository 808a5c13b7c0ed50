use larder::errors::{ErrorKind, LarderError};
use thiserror::Error;

/// Errors raised by distance filters.
#[derive(Error, Debug)]
pub enum GeoError {
    #[error("Distance must be a non-negative number of kilometers, got {0}")]
    NegativeDistance(f64),

    #[error("Tolerance must be a non-negative number of kilometers, got {0}")]
    NegativeTolerance(f64),

    #[error("Missing {0} coordinate")]
    MissingCoordinate(&'static str),

    #[error(transparent)]
    Larder(#[from] LarderError),
}

impl GeoError {
    /// The [ErrorKind] this error surfaces as.
    pub fn kind(&self) -> ErrorKind {
        match self {
            GeoError::NegativeDistance(_) | GeoError::NegativeTolerance(_) => ErrorKind::InvalidValue,
            GeoError::MissingCoordinate(_) => ErrorKind::NullArgument,
            GeoError::Larder(err) => err.kind().clone(),
        }
    }
}

impl From<GeoError> for LarderError {
    fn from(err: GeoError) -> Self {
        match err {
            GeoError::Larder(inner) => inner,
            other => LarderError::new(&other.to_string(), other.kind()),
        }
    }
}

/// Result type for distance filter operations
pub type GeoResult<T> = Result<T, GeoError>;
