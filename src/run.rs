use std::path::PathBuf;

use log::info;

use crate::{
    error::{Error, Result},
    keys::{collect_keys, KeySources},
    notify::Dispatcher,
    ops::{materialize, prepare_all, wait_for_restores, PollSettings},
    report::{Report, RunParams},
    stats::RunStats,
    status::RestoreStatus,
    storage::DynStore,
    tracker::StatusTracker,
};

pub const DEFAULT_RESTORE_DAYS: i32 = 7;

/// Everything a restore run needs besides its collaborators.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunPlan {
    pub keys: Vec<String>,
    pub key_file: Option<PathBuf>,
    pub prefix: Option<String>,
    pub download_dir: Option<PathBuf>,
    pub destination: Option<PathBuf>,
    pub restore_days: i32,
    /// Poll until settled; `None` returns right after the first pass.
    pub wait: Option<PollSettings>,
}

impl Default for RunPlan {
    fn default() -> Self {
        RunPlan {
            keys: vec![],
            key_file: None,
            prefix: None,
            download_dir: None,
            destination: None,
            restore_days: DEFAULT_RESTORE_DAYS,
            wait: None,
        }
    }
}

impl RunPlan {
    pub fn validate(&self) -> Result<()> {
        if self.destination.is_some() && self.download_dir.is_none() {
            return Err(Error::Config(
                "--download-dir is required when using --network-share".to_owned(),
            ));
        }
        Ok(())
    }

    fn report_params(&self, bucket: &str) -> RunParams {
        RunParams {
            bucket: bucket.to_owned(),
            prefix: self.prefix.clone(),
            download_dir: self.download_dir.clone(),
            destination: self.destination.clone(),
        }
    }
}

#[derive(Debug)]
pub struct RunOutcome {
    pub tracker: StatusTracker,
    pub report: Report,
    pub stats: RunStats,
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        self.report.is_success()
    }
}

/// Runs the whole restore lifecycle against `store`. Only an invalid plan or
/// an empty key set fails the run; everything else degrades the outcome.
pub async fn run(store: &DynStore, plan: &RunPlan, dispatcher: &Dispatcher) -> Result<RunOutcome> {
    plan.validate()?;
    let mut stats = RunStats::new();

    let sources = KeySources {
        explicit: &plan.keys,
        key_file: plan.key_file.as_deref(),
        prefix: plan.prefix.as_deref(),
    };
    let keys = collect_keys(store, &sources).await?;
    info!("Starting restoration for {} objects", keys.len());

    let mut tracker = prepare_all(store, &keys, plan.restore_days).await;

    if let Some(settings) = plan.wait {
        let summary = wait_for_restores(store, &mut tracker, settings).await;
        stats.poll_ticks = summary.ticks;
        stats.unresolved = summary.unresolved;
    }

    let report = Report::generate(store, &tracker, &plan.report_params(store.bucket())).await;
    info!("\n{report}");

    if let Some(download_dir) = &plan.download_dir {
        let restored = tracker.keys_with(RestoreStatus::Restored);
        stats.materialized =
            materialize(store, &restored, download_dir, plan.destination.as_deref()).await;
    }

    dispatcher
        .dispatch(&report.to_string(), report.is_success())
        .await;

    Ok(RunOutcome {
        tracker,
        report,
        stats,
    })
}
