use std::time::Duration;

use humantime::format_duration;
use log::{error, info};

use crate::{
    error::{Error, Result},
    format::format_size,
    notify::{Dispatcher, NotifyConfig},
    ops::PollSettings,
    run::{run, RunPlan},
    storage::{ObjectStore, S3Storage},
};

use super::{print_stat, Cli};

const SECONDS_PER_MINUTE: u64 = 60;
const SECONDS_PER_HOUR: u64 = 60 * 60;

pub async fn main(cli: &Cli) -> Result<bool> {
    let bucket = cli.bucket.clone().ok_or_else(|| {
        Error::Config("Bucket name is required for restoration. Use --bucket".to_owned())
    })?;

    let plan = plan_from_args(cli);
    plan.validate()?;

    let store = S3Storage::new(bucket, cli.profile.as_deref(), cli.region.clone()).await;
    let dispatcher = Dispatcher::from_config(&NotifyConfig::from_env());
    let outcome = run(&store, &plan, &dispatcher).await?;
    let success = outcome.is_success();

    if cli.stats {
        print_stat("objects", outcome.tracker.len());
        let full_stats = outcome.stats.finalize(store.stats());
        print_stat("head requests", full_stats.storage.head_requests);
        print_stat("restore requests", full_stats.storage.restore_requests);
        print_stat("list requests", full_stats.storage.list_requests);
        print_stat("get requests", full_stats.storage.get_requests);
        print_stat(
            "bytes downloaded",
            format_size(full_stats.storage.bytes_downloaded),
        );
        print_stat("files downloaded", full_stats.run.materialized.files_downloaded);
        print_stat("files copied", full_stats.run.materialized.files_copied);
        print_stat("transfer failures", full_stats.run.materialized.failures);
        print_stat("status checks", full_stats.run.poll_ticks);
        print_stat("unresolved after wait", full_stats.run.unresolved);
        print_stat("elapsed time", format_duration(full_stats.elapsed_time()));
    }

    if success {
        info!("Glacier restore completed successfully");
    } else {
        error!("Glacier restore completed with issues");
    }
    Ok(success)
}

fn plan_from_args(cli: &Cli) -> RunPlan {
    let wait = cli.wait.then(|| PollSettings {
        interval: Duration::from_secs(cli.check_interval * SECONDS_PER_MINUTE),
        timeout: Duration::from_secs(cli.timeout * SECONDS_PER_HOUR),
    });

    RunPlan {
        keys: cli.keys.clone(),
        key_file: cli.key_file.clone(),
        prefix: cli.prefix.clone(),
        download_dir: cli.download_dir.clone(),
        destination: cli.network_share.clone(),
        restore_days: cli.restore_days,
        wait,
    }
}
