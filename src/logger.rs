use std::{
    fs::{File, OpenOptions},
    io::{self, Write},
    path::Path,
    sync::Mutex,
};

use chrono::Local;
use env_logger::{fmt::Formatter, Logger};
use log::{warn, Level, LevelFilter, Log, Metadata, Record};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Logs to stderr and, when `log_file` can be opened, appends plain lines to
/// it too.
pub fn init(level: LevelFilter, log_file: Option<&Path>) {
    let mut builder = env_logger::Builder::new();
    builder.format(format).filter_level(level);
    let stderr = builder.build();

    let mut open_error = None;
    let file = log_file.and_then(|path| {
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => Some(Mutex::new(file)),
            Err(err) => {
                open_error = Some((path, err));
                None
            }
        }
    });

    log::set_max_level(stderr.filter());
    if log::set_boxed_logger(Box::new(Duplex { stderr, file })).is_err() {
        return;
    }

    if let Some((path, err)) = open_error {
        warn!("can't open log file `{}`: {err}", path.display());
    }
}

pub fn level_from_args(verbose: u8, quiet: u8) -> LevelFilter {
    let verbosity = i16::from(verbose) - i16::from(quiet);
    match verbosity {
        i16::MIN..=-2 => LevelFilter::Error,
        -1 => LevelFilter::Warn,
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn format(f: &mut Formatter, record: &Record) -> io::Result<()> {
    let time = Local::now().format(TIME_FORMAT);
    let args = record.args();
    let level = record.level();
    if let Some(prefix) = level_prefix(level) {
        let style = f.default_level_style(level);
        writeln!(f, "{time} {style}{prefix}{style:#}{args}")
    } else {
        writeln!(f, "{time} {args}")
    }
}

/// Same layout as `format`, without colour.
fn plain_line(record: &Record) -> String {
    let time = Local::now().format(TIME_FORMAT);
    let prefix = level_prefix(record.level()).unwrap_or_default();
    format!("{time} {prefix}{}\n", record.args())
}

fn level_prefix(level: Level) -> Option<&'static str> {
    match level {
        Level::Debug | Level::Trace | Level::Info => None,
        Level::Warn => Some("warning: "),
        Level::Error => Some("error: "),
    }
}

/// Coloured stderr through env_logger plus an optional plain-text file.
struct Duplex {
    stderr: Logger,
    file: Option<Mutex<File>>,
}

impl Log for Duplex {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.stderr.enabled(metadata)
    }

    fn log(&self, record: &Record) {
        if !self.stderr.matches(record) {
            return;
        }

        self.stderr.log(record);
        if let Some(file) = &self.file {
            if let Ok(mut file) = file.lock() {
                let _ = file.write_all(plain_line(record).as_bytes());
            }
        }
    }

    fn flush(&self) {
        self.stderr.flush();
        if let Some(file) = &self.file {
            if let Ok(mut file) = file.lock() {
                let _ = file.flush();
            }
        }
    }
}
