//! Error types for spaceq.

use thiserror::Error;

use crate::model::{ItemFailure, ProgressState, RemoteError};

#[derive(Debug, Error)]
pub enum Error {
    /// Bad input shape, detected before any remote call.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A queue job was rejected by a terminal item failure.
    #[error(transparent)]
    Job(Box<JobFailure>),

    /// A remote call made outside a queue job failed.
    #[error("remote error: {0}")]
    Remote(#[from] RemoteError),

    #[error("config error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Other(String),
}

/// The representative failure of a rejected job.
#[derive(Debug, Error)]
#[error("item {index} failed after {progress} settled: {failure}")]
pub struct JobFailure {
    /// Input position of the item that failed.
    pub index: usize,
    pub failure: ItemFailure,
    /// Progress at the moment the job was rejected.
    pub progress: ProgressState,
}

impl From<JobFailure> for Error {
    fn from(failure: JobFailure) -> Self {
        Error::Job(Box::new(failure))
    }
}

impl From<ItemFailure> for Error {
    fn from(failure: ItemFailure) -> Self {
        match failure {
            ItemFailure::Raw(err) => Error::Remote(err),
            ItemFailure::Classified(err) => {
                Error::Remote(RemoteError::new(err.kind.clone(), err.to_message()))
            }
        }
    }
}

impl Error {
    /// The item failure behind a rejected job, if this is one.
    pub fn item_failure(&self) -> Option<&ItemFailure> {
        match self {
            Error::Job(job) => Some(&job.failure),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
