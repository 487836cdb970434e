use std::{
    collections::{HashMap, HashSet, VecDeque},
    path::Path,
    sync::Mutex,
};

use anyhow::anyhow;
use async_trait::async_trait;

use crate::{
    error::{Error, Result},
    object::{ObjectMetadata, RestoreTier},
};

use super::{KeyStream, ObjectStore, StorageStats};

/// Scripted store for tests. Each key holds a queue of metadata responses
/// (`None` is a failed lookup); the last entry repeats once the queue drains.
#[derive(Debug, Default)]
pub struct MemoryStore {
    bucket: String,
    objects: Mutex<HashMap<String, VecDeque<Option<ObjectMetadata>>>>,
    bodies: HashMap<String, Vec<u8>>,
    listing: Vec<String>,
    fail_listing: bool,
    fail_restore: HashSet<String>,
    restores: Mutex<Vec<(String, RestoreTier, i32)>>,
    heads: Mutex<HashMap<String, u64>>,
    stats: Mutex<StorageStats>,
}

impl MemoryStore {
    pub fn new(bucket: &str) -> Self {
        MemoryStore {
            bucket: bucket.to_owned(),
            ..MemoryStore::default()
        }
    }

    pub fn with_object(self, key: &str, metadata: ObjectMetadata) -> Self {
        self.with_sequence(key, vec![Some(metadata)])
    }

    pub fn with_sequence(self, key: &str, responses: Vec<Option<ObjectMetadata>>) -> Self {
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_owned(), responses.into());
        self
    }

    pub fn with_body(mut self, key: &str, body: &[u8]) -> Self {
        self.bodies.insert(key.to_owned(), body.to_vec());
        self
    }

    pub fn with_listing(mut self, keys: &[&str]) -> Self {
        self.listing = keys.iter().map(ToString::to_string).collect();
        self
    }

    pub fn failing_listing(mut self) -> Self {
        self.fail_listing = true;
        self
    }

    pub fn failing_restore(mut self, key: &str) -> Self {
        self.fail_restore.insert(key.to_owned());
        self
    }

    pub fn restores(&self) -> Vec<(String, RestoreTier, i32)> {
        self.restores.lock().unwrap().clone()
    }

    pub fn head_count(&self, key: &str) -> u64 {
        self.heads.lock().unwrap().get(key).copied().unwrap_or(0)
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn head(&self, key: &str) -> Result<ObjectMetadata> {
        *self.heads.lock().unwrap().entry(key.to_owned()).or_default() += 1;
        self.stats.lock().unwrap().add_head();

        let mut objects = self.objects.lock().unwrap();
        let responses = objects
            .get_mut(key)
            .ok_or_else(|| Error::ObjectNotFound(key.to_owned()))?;
        let response = if responses.len() > 1 {
            responses.pop_front().flatten()
        } else {
            responses.front().cloned().flatten()
        };

        response.ok_or_else(|| anyhow!("simulated lookup failure for `{key}`").into())
    }

    async fn restore(&self, key: &str, tier: RestoreTier, days: i32) -> Result<()> {
        if self.fail_restore.contains(key) {
            return Err(anyhow!("simulated restore failure for `{key}`").into());
        }

        self.stats.lock().unwrap().add_restore();
        self.restores
            .lock()
            .unwrap()
            .push((key.to_owned(), tier, days));
        Ok(())
    }

    fn keys<'a>(&'a self, prefix: &'a str) -> KeyStream<'a> {
        self.stats.lock().unwrap().add_list();

        let mut items = self
            .listing
            .iter()
            .filter(|key| key.starts_with(prefix))
            .cloned()
            .map(Ok)
            .collect::<Vec<_>>();
        if self.fail_listing {
            items.push(Err(anyhow!("simulated listing failure").into()));
        }

        Box::pin(tokio_stream::iter(items))
    }

    async fn download(&self, key: &str, path: &Path) -> Result<u64> {
        let body = self
            .bodies
            .get(key)
            .ok_or_else(|| Error::ObjectNotFound(key.to_owned()))?;
        tokio::fs::write(path, body).await?;

        let size = body.len() as u64;
        self.stats.lock().unwrap().add_get(size);
        Ok(size)
    }

    fn stats(&self) -> StorageStats {
        self.stats.lock().unwrap().clone()
    }
}
