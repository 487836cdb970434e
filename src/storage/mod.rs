#[cfg(test)]
mod memory;
mod s3;
mod stats;

use std::{fmt::Debug, path::Path, pin::Pin};

use async_trait::async_trait;
use tokio_stream::Stream;

use crate::{
    error::Result,
    object::{ObjectMetadata, RestoreTier},
};

#[cfg(test)]
pub use memory::MemoryStore;
pub use {s3::S3Storage, stats::StorageStats};

pub type DynStore = dyn ObjectStore + Send + Sync + 'static;

pub type KeyStream<'a> = Pin<Box<dyn Stream<Item = Result<String>> + Send + 'a>>;

/// A single bucket in an object store.
#[async_trait]
pub trait ObjectStore: Debug {
    fn bucket(&self) -> &str;

    async fn head(&self, key: &str) -> Result<ObjectMetadata>;

    async fn restore(&self, key: &str, tier: RestoreTier, days: i32) -> Result<()>;

    /// Lists every key under `prefix`, one page at a time. The stream is
    /// finite and can't be restarted.
    fn keys<'a>(&'a self, prefix: &'a str) -> KeyStream<'a>;

    /// Writes the object body to `path` and returns the number of bytes written.
    async fn download(&self, key: &str, path: &Path) -> Result<u64>;

    fn stats(&self) -> StorageStats;
}
