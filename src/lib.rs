#![deny(unsafe_code)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]

pub mod cli;

mod env;
mod error;
mod format;
mod keys;
mod logger;
mod notify;
mod object;
mod ops;
mod report;
mod run;
mod stats;
mod status;
mod storage;
mod tracker;
