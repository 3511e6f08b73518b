//! Error type shared by filter construction, cube collapsing, rendering and file IO.

use thiserror::Error;

/// Errors that can occur while building filters or collapsing cubes.
///
/// `InvalidArgument` and `EmptyResult` are raised by the numerical core; the
/// remaining variants wrap failures of the file and image collaborators.
#[derive(Error, Debug)]
pub enum CocoError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("array empty after thresholding")]
    EmptyResult,
    #[error("shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed reading npy file: {0}")]
    ReadNpy(#[from] ndarray_npy::ReadNpyError),
    #[error("failed writing npy file: {0}")]
    WriteNpy(#[from] ndarray_npy::WriteNpyError),
    #[error("invalid configuration: {0}")]
    Json(#[from] serde_json::Error),
}

impl CocoError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        CocoError::InvalidArgument(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, CocoError>;
