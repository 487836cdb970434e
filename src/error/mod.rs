mod from;

use std::{fmt::Display, path::PathBuf};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, PartialEq)]
pub enum Error {
    #[error("{0}")]
    Config(String),

    #[error("can't read key file `{path}`: {message}")]
    KeyFile { path: PathBuf, message: String },

    #[error("no keys specified for restoration")]
    NoKeys,

    #[error("no object found for key `{0}`")]
    ObjectNotFound(String),

    #[error("key `{0}` is invalid")]
    InvalidKey(String),

    #[error("webhook responded with {status}: {body}")]
    WebhookStatus { status: u16, body: String },

    #[error(transparent)]
    Other(AnyError),
}

/// Failure attached to a single key. Recorded as that key's `error` status
/// (or, for refreshes, retried) instead of aborting the run.
#[derive(Error, Debug, PartialEq)]
pub enum KeyError {
    #[error("metadata lookup failed: {0}")]
    Metadata(Error),

    #[error("restore request failed: {0}")]
    Initiation(Error),

    #[error("status refresh failed: {0}")]
    Refresh(Error),
}

#[derive(Error, Debug)]
pub struct AnyError(anyhow::Error);

impl Display for AnyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl PartialEq for AnyError {
    fn eq(&self, _other: &Self) -> bool {
        false
    }
}

impl Error {
    pub fn other<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Other(AnyError(error.into()))
    }
}

impl From<anyhow::Error> for Error {
    fn from(error: anyhow::Error) -> Self {
        Error::Other(AnyError(error))
    }
}
