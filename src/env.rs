use std::{io, path::Path};

use crate::error::Result;

/// Loads `KEY=VALUE` lines from `path` into the process environment without
/// overriding variables that are already set. Returns false if the file
/// doesn't exist.
pub fn load_file(path: &Path) -> Result<bool> {
    match dotenvy::from_path(path) {
        Ok(()) => Ok(true),
        Err(dotenvy::Error::Io(err)) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err.into()),
    }
}
