mod initial;
mod materialize;
mod poll;
#[cfg(test)]
mod tests;

pub use {
    initial::prepare_all,
    materialize::{materialize, Materialized},
    poll::{wait_for_restores, PollSettings},
};

const KEY_WIDTH: usize = 48;

fn short_key(key: &str, width: usize) -> String {
    key.chars().take(width).collect()
}
