use std::collections::BTreeSet;

use log::{error, info};

use crate::{
    error::KeyError,
    object::{RestoreTier, StorageClass},
    status::{classify, RestoreStatus},
    storage::DynStore,
    tracker::StatusTracker,
};

use super::{short_key, KEY_WIDTH};

/// Classifies every key once, issuing restore requests where needed.
/// Failures are isolated to their key.
pub async fn prepare_all(store: &DynStore, keys: &BTreeSet<String>, days: i32) -> StatusTracker {
    let mut tracker = StatusTracker::new();

    info!("{:<50} {:<20} {:<15}", "Key", "Storage Class", "Status");
    info!("{}", "-".repeat(90));

    for key in keys {
        let outcome = prepare_key(store, key, days).await;
        if let Err(err) = &outcome {
            let message = short_key(&err.to_string(), 30);
            error!("{:<50} {:<20} {message:<15}", short_key(key, KEY_WIDTH), "ERROR");
        }
        tracker.record_outcome(key.clone(), &outcome);
    }

    info!(
        "{} in progress, {} restored, {} skipped, {} failed",
        tracker.count(RestoreStatus::InProgress),
        tracker.count(RestoreStatus::Restored),
        tracker.count(RestoreStatus::NotGlacier),
        tracker.count(RestoreStatus::Error)
    );
    tracker
}

pub async fn prepare_key(
    store: &DynStore,
    key: &str,
    days: i32,
) -> Result<RestoreStatus, KeyError> {
    let metadata = store.head(key).await.map_err(KeyError::Metadata)?;
    let storage_class = metadata.storage_class.as_str();
    let short = short_key(key, KEY_WIDTH);

    let status = match classify(&metadata) {
        RestoreStatus::NotStarted => {
            let tier = initiate_restore(store, key, &metadata.storage_class, days).await?;
            info!("{short:<50} {storage_class:<20} {:<15} (Tier: {tier})", "Restore started");
            RestoreStatus::InProgress
        }
        RestoreStatus::NotGlacier => {
            info!("{short:<50} {storage_class:<20} {:<15}", "Skipped (non-glacier)");
            RestoreStatus::NotGlacier
        }
        status => {
            let label = status.as_str().replace('_', " ");
            info!("{short:<50} {storage_class:<20} {label:<15}");
            status
        }
    };

    Ok(status)
}

pub async fn initiate_restore(
    store: &DynStore,
    key: &str,
    storage_class: &StorageClass,
    days: i32,
) -> Result<RestoreTier, KeyError> {
    let tier = RestoreTier::for_class(storage_class);
    store
        .restore(key, tier, days)
        .await
        .map_err(KeyError::Initiation)?;
    Ok(tier)
}
