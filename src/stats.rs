use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::{ops::Materialized, storage::StorageStats};

#[derive(Debug)]
pub struct RunStats {
    pub start_time: DateTime<Utc>,
    pub poll_ticks: u32,
    /// Keys still in progress when the wait ended.
    pub unresolved: usize,
    pub materialized: Materialized,
}

impl RunStats {
    pub fn new() -> Self {
        RunStats {
            start_time: Utc::now(),
            poll_ticks: 0,
            unresolved: 0,
            materialized: Materialized::default(),
        }
    }

    pub fn finalize(self, storage: StorageStats) -> FinalizedStats {
        let end_time = Utc::now();
        let elapsed_time = (end_time - self.start_time).to_std().unwrap_or_default();
        FinalizedStats {
            run: self,
            storage,
            elapsed_time,
        }
    }
}

#[derive(Debug)]
pub struct FinalizedStats {
    pub run: RunStats,
    pub storage: StorageStats,
    elapsed_time: Duration,
}

impl FinalizedStats {
    pub fn elapsed_time(&self) -> Duration {
        self.elapsed_time
    }
}
