mod parse;
mod restore;
mod selftest;

use std::{fmt::Display, ops::RangeInclusive, path::PathBuf, process::ExitCode};

use clap::{
    builder::{styling::AnsiColor, Styles},
    error::ErrorKind,
    ArgAction, Parser,
};
use log::{error, info, warn};

use crate::{env, logger, run::DEFAULT_RESTORE_DAYS};

use self::parse::parse_range_inclusive;

const DEFAULT_CHECK_INTERVAL_MINUTES: u64 = 60;
const DEFAULT_TIMEOUT_HOURS: u64 = 24;
const DEFAULT_LOG_FILE: &str = "glacier_restore.log";
const DEFAULT_ENV_FILE: &str = ".env";

const RESTORE_DAYS_RANGE: RangeInclusive<i32> = 1..=36_500;
const CHECK_INTERVAL_RANGE: RangeInclusive<u64> = 1..=7 * 24 * 60;
const TIMEOUT_RANGE: RangeInclusive<u64> = 1..=24 * 365;

fn parse_restore_days(s: &str) -> Result<i32, String> {
    parse_range_inclusive(s, RESTORE_DAYS_RANGE)
}

fn parse_check_interval(s: &str) -> Result<u64, String> {
    parse_range_inclusive(s, CHECK_INTERVAL_RANGE)
}

fn parse_timeout(s: &str) -> Result<u64, String> {
    parse_range_inclusive(s, TIMEOUT_RANGE)
}

/// Restore objects from S3 Glacier storage classes
#[derive(Parser, Debug)]
#[command(version, about, long_about = None, styles = cli_styles())]
pub struct Cli {
    /// S3 bucket name
    #[arg(short, long)]
    pub bucket: Option<String>,

    /// Object keys to restore
    #[arg(short, long, value_name = "KEY", num_args = 1..)]
    pub keys: Vec<String>,

    /// File with one object key per line
    #[arg(short = 'f', long, value_name = "PATH")]
    pub key_file: Option<PathBuf>,

    /// Restore every object under this prefix
    #[arg(short, long)]
    pub prefix: Option<String>,

    /// Download restored objects into this directory
    #[arg(short, long, value_name = "PATH")]
    pub download_dir: Option<PathBuf>,

    /// Copy downloaded objects to this path as well (requires --download-dir)
    #[arg(short = 'n', long, value_name = "PATH")]
    pub network_share: Option<PathBuf>,

    /// Days to keep restored copies available
    #[arg(
        long,
        value_name = "DAYS",
        default_value_t = DEFAULT_RESTORE_DAYS,
        value_parser = parse_restore_days,
    )]
    pub restore_days: i32,

    /// Wait until every restoration finishes or the timeout expires
    #[arg(short, long, default_value_t = false)]
    pub wait: bool,

    /// Minutes between status checks while waiting
    #[arg(
        long,
        value_name = "MINUTES",
        default_value_t = DEFAULT_CHECK_INTERVAL_MINUTES,
        value_parser = parse_check_interval,
    )]
    pub check_interval: u64,

    /// Maximum time to wait, in hours
    #[arg(
        short,
        long,
        value_name = "HOURS",
        default_value_t = DEFAULT_TIMEOUT_HOURS,
        value_parser = parse_timeout,
    )]
    pub timeout: u64,

    /// AWS profile name
    #[arg(long)]
    pub profile: Option<String>,

    /// AWS region, overriding the profile's
    #[arg(long)]
    pub region: Option<String>,

    /// Send a test email and exit
    #[arg(long, default_value_t = false)]
    pub test_email: bool,

    /// Send a test Teams message and exit
    #[arg(long, default_value_t = false)]
    pub test_teams: bool,

    /// Load environment variables from this file if it exists
    #[arg(long, value_name = "PATH", default_value = DEFAULT_ENV_FILE)]
    pub env_file: PathBuf,

    /// Append log output to this file
    #[arg(long, value_name = "PATH", default_value = DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,

    /// Log to stderr only
    #[arg(long, default_value_t = false)]
    pub no_log_file: bool,

    /// Print request and transfer statistics when finished
    #[arg(long, default_value_t = false)]
    pub stats: bool,

    #[arg(short, long, action = ArgAction::Count, group = "verbosity")]
    pub verbose: u8,

    #[arg(short, long, action = ArgAction::Count, group = "verbosity")]
    pub quiet: u8,
}

pub async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            };
        }
    };

    init_logger(&cli);
    load_env(&cli);

    let success = if cli.test_email || cli.test_teams {
        selftest::main(&cli).await
    } else {
        match restore::main(&cli).await {
            Ok(success) => success,
            Err(err) => {
                error!("{err}");
                false
            }
        }
    };

    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn init_logger(cli: &Cli) {
    let level = logger::level_from_args(cli.verbose, cli.quiet);
    let log_file = (!cli.no_log_file).then_some(cli.log_file.as_path());
    logger::init(level, log_file);
}

fn load_env(cli: &Cli) {
    let path = &cli.env_file;
    match env::load_file(path) {
        Ok(true) => info!("Loaded environment variables from {}", path.display()),
        Ok(false) => warn!("Env file not found: {}", path.display()),
        Err(err) => warn!("can't load env file `{}`: {err}", path.display()),
    }
}

fn print_stat<T: Display>(name: &str, value: T) {
    info!("{name}: {value}");
}

fn cli_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::BrightMagenta.on_default())
        .usage(AnsiColor::BrightMagenta.on_default())
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightCyan.on_default())
}
