use std::{fmt, path::PathBuf};

use chrono::{DateTime, Local};
use log::debug;

use crate::{
    format::{format_megabytes, format_time},
    status::RestoreStatus,
    storage::DynStore,
    tracker::StatusTracker,
};

const SAMPLE_LIMIT: usize = 5;

/// Run parameters echoed in the report.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunParams {
    pub bucket: String,
    pub prefix: Option<String>,
    pub download_dir: Option<PathBuf>,
    pub destination: Option<PathBuf>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Report {
    pub completed_at: DateTime<Local>,
    pub params: RunParams,
    pub restored: Vec<String>,
    pub pending: Vec<String>,
    pub errors: Vec<String>,
    pub skipped: Vec<String>,
    pub restored_bytes: u64,
}

impl Report {
    pub async fn generate(store: &DynStore, tracker: &StatusTracker, params: &RunParams) -> Self {
        let restored = tracker.keys_with(RestoreStatus::Restored);
        let restored_bytes = restored_size(store, &restored).await;
        Report::new(tracker, params, restored_bytes, Local::now())
    }

    pub fn new(
        tracker: &StatusTracker,
        params: &RunParams,
        restored_bytes: u64,
        completed_at: DateTime<Local>,
    ) -> Self {
        let mut report = Report {
            completed_at,
            params: params.clone(),
            restored: vec![],
            pending: vec![],
            errors: vec![],
            skipped: vec![],
            restored_bytes,
        };

        for (key, status) in tracker.iter() {
            let bucket = match status {
                RestoreStatus::Restored => &mut report.restored,
                RestoreStatus::InProgress | RestoreStatus::NotStarted => &mut report.pending,
                RestoreStatus::Error => &mut report.errors,
                RestoreStatus::NotGlacier => &mut report.skipped,
            };
            bucket.push(key.to_owned());
        }

        debug_assert_eq!(report.total(), tracker.len());
        report
    }

    pub fn total(&self) -> usize {
        self.restored.len() + self.pending.len() + self.errors.len() + self.skipped.len()
    }

    /// No errors and nothing left in progress. Skipped keys don't count.
    pub fn is_success(&self) -> bool {
        self.errors.is_empty() && self.pending.is_empty()
    }
}

/// Total content length of `keys`. Lookups that fail count as zero.
pub async fn restored_size(store: &DynStore, keys: &[&str]) -> u64 {
    let mut total = 0;
    for &key in keys {
        match store.head(key).await {
            Ok(metadata) => total += metadata.content_length,
            Err(err) => debug!("no size for `{key}`: {err}"),
        }
    }
    total
}

fn sample_lines(lines: &mut Vec<String>, title: &str, keys: &[String]) {
    if keys.is_empty() {
        return;
    }

    lines.push(String::new());
    lines.push(title.to_owned());
    lines.push("-".repeat(title.len()));
    lines.extend(keys.iter().take(SAMPLE_LIMIT).cloned());
    if keys.len() > SAMPLE_LIMIT {
        lines.push(format!("... and {} more", keys.len() - SAMPLE_LIMIT));
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params = &self.params;
        let mut lines = vec![
            "GLACIER RESTORE REPORT".to_owned(),
            "======================".to_owned(),
            format!("Completed at: {}", format_time(&self.completed_at)),
            format!("Bucket: {}", params.bucket),
            format!("Prefix: {}", params.prefix.as_deref().unwrap_or("All keys")),
            format!(
                "Restored: {} files ({})",
                self.restored.len(),
                format_megabytes(self.restored_bytes)
            ),
            format!("Pending: {} files", self.pending.len()),
            format!("Errors: {} files", self.errors.len()),
            format!("Skipped (non-glacier): {} files", self.skipped.len()),
            String::new(),
        ];

        if let Some(download_dir) = &params.download_dir {
            lines.push(format!("Local download directory: {}", download_dir.display()));
        }
        if let Some(destination) = &params.destination {
            lines.push(format!("Network share destination: {}", destination.display()));
        }

        sample_lines(&mut lines, "PENDING FILES:", &self.pending);
        sample_lines(&mut lines, "ERROR FILES:", &self.errors);

        f.write_str(&lines.join("\n"))
    }
}
