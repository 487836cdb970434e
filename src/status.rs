use std::fmt;

use crate::object::{ObjectMetadata, RestoreMarker};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RestoreStatus {
    NotGlacier,
    NotStarted,
    InProgress,
    Restored,
    Error,
}

impl RestoreStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, RestoreStatus::Restored | RestoreStatus::Error)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RestoreStatus::NotGlacier => "not_glacier",
            RestoreStatus::NotStarted => "not_started",
            RestoreStatus::InProgress => "in_progress",
            RestoreStatus::Restored => "restored",
            RestoreStatus::Error => "error",
        }
    }
}

impl fmt::Display for RestoreStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Initial classification of an object. `NotStarted` means a restore
/// request still has to be issued.
pub fn classify(metadata: &ObjectMetadata) -> RestoreStatus {
    if !metadata.storage_class.is_cold() {
        return RestoreStatus::NotGlacier;
    }

    match metadata.restore {
        None => RestoreStatus::NotStarted,
        Some(RestoreMarker::Ongoing) => RestoreStatus::InProgress,
        Some(RestoreMarker::Completed) => RestoreStatus::Restored,
    }
}

/// Status of an object whose restore was already requested. A vanished
/// marker is an error since requests are never re-issued.
pub fn reclassify(metadata: &ObjectMetadata) -> RestoreStatus {
    match metadata.restore {
        Some(RestoreMarker::Ongoing) => RestoreStatus::InProgress,
        Some(RestoreMarker::Completed) => RestoreStatus::Restored,
        None => RestoreStatus::Error,
    }
}
