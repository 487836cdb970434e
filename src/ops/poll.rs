use std::time::Duration;

use chrono::Local;
use log::{error, info, warn};
use tokio::time::{sleep, Instant};

use crate::{status::RestoreStatus, storage::DynStore, tracker::StatusTracker};

use super::short_key;

const KEY_WIDTH: usize = 60;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PollSettings {
    pub interval: Duration,
    pub timeout: Duration,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PollSummary {
    pub ticks: u32,
    pub unresolved: usize,
}

/// Re-checks in-progress keys every `interval` until none are left or the
/// timeout passes. Keys still pending at the deadline stay `in_progress`.
pub async fn wait_for_restores(
    store: &DynStore,
    tracker: &mut StatusTracker,
    settings: PollSettings,
) -> PollSummary {
    let mut pending = tracker.pending();
    let mut summary = PollSummary::default();
    if pending.is_empty() {
        return summary;
    }

    info!("Waiting for restoration of {} objects...", pending.len());
    let deadline = Instant::now() + settings.timeout;

    while !pending.is_empty() {
        let now = Instant::now();
        if now >= deadline {
            break;
        }

        sleep(settings.interval.min(deadline - now)).await;
        summary.ticks += 1;
        info!("Check at {}", Local::now().format("%H:%M:%S"));

        for key in &pending {
            let short = short_key(key, KEY_WIDTH);
            match tracker.refresh(store, key).await {
                Ok(RestoreStatus::Restored) => info!("  {short} - RESTORED"),
                Ok(RestoreStatus::InProgress) => info!("  {short} - In progress..."),
                Ok(status) => error!("  {short} - {status}"),
                Err(err) => error!("  {short} - Error: {err}"),
            }
        }

        pending.retain(|key| tracker.status(key) == Some(RestoreStatus::InProgress));
    }

    if !pending.is_empty() {
        warn!("Timeout reached with {} objects unrestored", pending.len());
    }

    summary.unresolved = pending.len();
    summary
}
