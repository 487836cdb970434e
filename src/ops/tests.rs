use std::{collections::BTreeSet, time::Duration};

use tokio::time::Instant;

use crate::{
    error::Error,
    object::{ObjectMetadata, RestoreMarker, RestoreTier, StorageClass},
    status::RestoreStatus,
    storage::MemoryStore,
    tracker::StatusTracker,
};

use super::{
    materialize, materialize::local_path, prepare_all, wait_for_restores, PollSettings,
};

const HOUR: Duration = Duration::from_secs(60 * 60);

fn standard() -> ObjectMetadata {
    ObjectMetadata::new(StorageClass::Standard, None, 100)
}

fn glacier(restore: Option<RestoreMarker>) -> ObjectMetadata {
    ObjectMetadata::new(StorageClass::Glacier, restore, 100)
}

fn key_set(keys: &[&str]) -> BTreeSet<String> {
    keys.iter().map(ToString::to_string).collect()
}

fn settings(interval: Duration, timeout: Duration) -> PollSettings {
    PollSettings { interval, timeout }
}

#[tokio::test]
async fn prepare_mixed_classes() {
    let store = MemoryStore::new("bucket")
        .with_object("a.txt", standard())
        .with_object("b.txt", glacier(None));

    let tracker = prepare_all(&store, &key_set(&["a.txt", "b.txt"]), 7).await;

    assert_eq!(tracker.status("a.txt"), Some(RestoreStatus::NotGlacier));
    assert_eq!(tracker.status("b.txt"), Some(RestoreStatus::InProgress));
    assert_eq!(
        store.restores(),
        vec![("b.txt".to_owned(), RestoreTier::Standard, 7)]
    );
    assert_eq!(tracker.pending(), vec!["b.txt".to_owned()]);
}

#[tokio::test]
async fn prepare_deep_archive_uses_bulk() {
    let store = MemoryStore::new("bucket").with_object(
        "deep",
        ObjectMetadata::new(StorageClass::DeepArchive, None, 1),
    );

    prepare_all(&store, &key_set(&["deep"]), 3).await;
    assert_eq!(store.restores(), vec![("deep".to_owned(), RestoreTier::Bulk, 3)]);
}

#[tokio::test]
async fn prepare_existing_markers_skip_initiation() {
    let store = MemoryStore::new("bucket")
        .with_object("ongoing", glacier(Some(RestoreMarker::Ongoing)))
        .with_object("done", glacier(Some(RestoreMarker::Completed)));

    let tracker = prepare_all(&store, &key_set(&["ongoing", "done"]), 7).await;

    assert_eq!(tracker.status("ongoing"), Some(RestoreStatus::InProgress));
    assert_eq!(tracker.status("done"), Some(RestoreStatus::Restored));
    assert!(store.restores().is_empty());
}

#[tokio::test]
async fn prepare_isolates_failures() {
    let store = MemoryStore::new("bucket")
        .with_sequence("broken", vec![None])
        .with_object("refused", glacier(None))
        .with_object("fine", glacier(None))
        .failing_restore("refused");

    let keys = key_set(&["broken", "fine", "missing", "refused"]);
    let tracker = prepare_all(&store, &keys, 7).await;

    assert_eq!(tracker.status("broken"), Some(RestoreStatus::Error));
    assert_eq!(tracker.status("missing"), Some(RestoreStatus::Error));
    assert_eq!(tracker.status("refused"), Some(RestoreStatus::Error));
    assert_eq!(tracker.status("fine"), Some(RestoreStatus::InProgress));
    assert_eq!(tracker.len(), 4);
}

#[tokio::test(start_paused = true)]
async fn poll_exits_early_when_settled() {
    let store = MemoryStore::new("bucket").with_sequence(
        "a",
        vec![
            Some(glacier(Some(RestoreMarker::Ongoing))),
            Some(glacier(Some(RestoreMarker::Completed))),
        ],
    );
    let mut tracker = StatusTracker::new();
    tracker.record_initial("a".into(), RestoreStatus::InProgress);

    let start = Instant::now();
    let summary = wait_for_restores(&store, &mut tracker, settings(HOUR, 24 * HOUR)).await;

    assert_eq!(summary.ticks, 2);
    assert_eq!(summary.unresolved, 0);
    assert!(start.elapsed() >= 2 * HOUR && start.elapsed() < 3 * HOUR);
    assert_eq!(tracker.status("a"), Some(RestoreStatus::Restored));
}

#[tokio::test(start_paused = true)]
async fn poll_is_bounded_by_timeout() {
    let store = MemoryStore::new("bucket").with_object("a", glacier(Some(RestoreMarker::Ongoing)));
    let mut tracker = StatusTracker::new();
    tracker.record_initial("a".into(), RestoreStatus::InProgress);

    let start = Instant::now();
    let summary = wait_for_restores(&store, &mut tracker, settings(HOUR, 90 * HOUR / 60)).await;

    assert_eq!(summary.ticks, 2);
    assert_eq!(summary.unresolved, 1);
    assert!(start.elapsed() >= 90 * HOUR / 60 && start.elapsed() < 2 * HOUR);
    assert_eq!(tracker.status("a"), Some(RestoreStatus::InProgress));
}

#[tokio::test(start_paused = true)]
async fn poll_retries_failed_refresh() {
    let store = MemoryStore::new("bucket").with_sequence(
        "a",
        vec![None, Some(glacier(Some(RestoreMarker::Completed)))],
    );
    let mut tracker = StatusTracker::new();
    tracker.record_initial("a".into(), RestoreStatus::InProgress);

    let summary = wait_for_restores(&store, &mut tracker, settings(HOUR, 24 * HOUR)).await;

    assert_eq!(summary.ticks, 2);
    assert_eq!(tracker.status("a"), Some(RestoreStatus::Restored));
}

#[tokio::test(start_paused = true)]
async fn poll_stops_visiting_terminal_keys() {
    let store = MemoryStore::new("bucket")
        .with_object("lost", glacier(None))
        .with_sequence(
            "slow",
            vec![
                Some(glacier(Some(RestoreMarker::Ongoing))),
                Some(glacier(Some(RestoreMarker::Ongoing))),
                Some(glacier(Some(RestoreMarker::Completed))),
            ],
        );
    let mut tracker = StatusTracker::new();
    tracker.record_initial("lost".into(), RestoreStatus::InProgress);
    tracker.record_initial("slow".into(), RestoreStatus::InProgress);

    let summary = wait_for_restores(&store, &mut tracker, settings(HOUR, 24 * HOUR)).await;

    assert_eq!(summary.ticks, 3);
    assert_eq!(store.head_count("lost"), 1);
    assert_eq!(tracker.status("lost"), Some(RestoreStatus::Error));
    assert_eq!(tracker.status("slow"), Some(RestoreStatus::Restored));
}

#[tokio::test(start_paused = true)]
async fn poll_without_pending_returns_immediately() {
    let store = MemoryStore::new("bucket");
    let mut tracker = StatusTracker::new();
    tracker.record_initial("a".into(), RestoreStatus::NotGlacier);

    let start = Instant::now();
    let summary = wait_for_restores(&store, &mut tracker, settings(HOUR, HOUR)).await;

    assert_eq!(summary.ticks, 0);
    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[test]
fn local_path_rejects_escapes() {
    let root = std::path::Path::new("/restore");
    assert_eq!(
        local_path(root, "a/b.txt").unwrap(),
        root.join("a").join("b.txt")
    );
    assert_eq!(
        local_path(root, "../etc/passwd"),
        Err(Error::InvalidKey("../etc/passwd".to_owned()))
    );
    assert!(local_path(root, "/abs").is_err());
    assert!(local_path(root, "folder/").is_err());
    assert!(local_path(root, "").is_err());
}

#[tokio::test]
async fn materialize_downloads_and_copies() {
    let download_dir = tempfile::tempdir().unwrap();
    let share = tempfile::tempdir().unwrap();
    let store = MemoryStore::new("bucket")
        .with_body("dir/a.txt", b"hello")
        .with_body("b.txt", b"world!");

    let result = materialize(
        &store,
        &["dir/a.txt", "b.txt", "missing.txt", "../escape"],
        download_dir.path(),
        Some(share.path()),
    )
    .await;

    assert_eq!(result.files_downloaded, 2);
    assert_eq!(result.files_copied, 2);
    assert_eq!(result.bytes_downloaded, 11);
    assert_eq!(result.failures, 2);

    let copied = std::fs::read(share.path().join("dir").join("a.txt")).unwrap();
    assert_eq!(copied, b"hello");
    assert!(download_dir.path().join("b.txt").exists());
}
