use std::collections::BTreeMap;

use crate::{
    error::{Error, KeyError},
    status::{reclassify, RestoreStatus},
    storage::DynStore,
};

/// Current status of every key in the run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StatusTracker {
    snapshot: BTreeMap<String, RestoreStatus>,
}

impl StatusTracker {
    pub fn new() -> Self {
        StatusTracker::default()
    }

    pub fn record_initial(&mut self, key: String, status: RestoreStatus) {
        debug_assert_ne!(status, RestoreStatus::NotStarted);
        self.snapshot.insert(key, status);
    }

    pub fn record_outcome(
        &mut self,
        key: String,
        outcome: &Result<RestoreStatus, KeyError>,
    ) -> RestoreStatus {
        let status = match outcome {
            Ok(status) => *status,
            Err(_) => RestoreStatus::Error,
        };
        self.record_initial(key, status);
        status
    }

    /// Re-reads the restore marker of `key`. Terminal keys are left alone and
    /// a failed lookup leaves the previous status in place.
    pub async fn refresh(
        &mut self,
        store: &DynStore,
        key: &str,
    ) -> Result<RestoreStatus, KeyError> {
        let current = self
            .status(key)
            .ok_or_else(|| KeyError::Refresh(Error::InvalidKey(key.to_owned())))?;
        if current.is_terminal() {
            return Ok(current);
        }

        let metadata = store.head(key).await.map_err(KeyError::Refresh)?;
        let status = reclassify(&metadata);
        self.snapshot.insert(key.to_owned(), status);
        Ok(status)
    }

    pub fn status(&self, key: &str) -> Option<RestoreStatus> {
        self.snapshot.get(key).copied()
    }

    pub fn keys_with(&self, status: RestoreStatus) -> Vec<&str> {
        self.snapshot
            .iter()
            .filter(|&(_, &s)| s == status)
            .map(|(key, _)| key.as_str())
            .collect()
    }

    pub fn pending(&self) -> Vec<String> {
        self.keys_with(RestoreStatus::InProgress)
            .into_iter()
            .map(ToOwned::to_owned)
            .collect()
    }

    pub fn count(&self, status: RestoreStatus) -> usize {
        self.snapshot.values().filter(|&&s| s == status).count()
    }

    pub fn len(&self) -> usize {
        self.snapshot.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, RestoreStatus)> {
        self.snapshot.iter().map(|(key, &status)| (key.as_str(), status))
    }
}
