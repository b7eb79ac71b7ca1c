//! Request-level error taxonomy.

use raster::ProjectError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FingerprintError {
    /// Precondition failure; checked before any other work.
    #[error("buffer length of {len} is too small. minimum length is {min}")]
    BufferTooSmall { len: usize, min: usize },
    /// The buffer needs a larger curve than the service loaded.
    #[error(transparent)]
    Projection(#[from] ProjectError),
}
