use std::{path::Path, sync::Mutex};

use async_stream::try_stream;
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::{
    config::Region,
    operation::{get_object::GetObjectError, head_object::HeadObjectError},
    types::{GlacierJobParameters, RestoreRequest, Tier},
    Client,
};
use tokio::{fs::File, io::AsyncWriteExt};
use tokio_stream::Stream;

use crate::{
    error::{Error, Result},
    object::{ObjectMetadata, RestoreMarker, RestoreTier, StorageClass},
};

use super::{KeyStream, ObjectStore, StorageStats};

#[derive(Debug)]
pub struct S3Storage {
    client: Client,
    bucket: String,
    stats: Mutex<StorageStats>,
}

impl S3Storage {
    pub async fn new(bucket: String, profile: Option<&str>, region: Option<String>) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(profile) = profile {
            loader = loader.profile_name(profile);
        }
        if let Some(region) = region {
            loader = loader.region(Region::new(region));
        }

        let s3_config = loader.load().await;
        let client = Client::new(&s3_config);
        let stats = Mutex::new(StorageStats::new());

        S3Storage {
            client,
            bucket,
            stats,
        }
    }

    fn record<F: FnOnce(&mut StorageStats)>(&self, update: F) {
        if let Ok(mut stats) = self.stats.lock() {
            update(&mut stats);
        }
    }

    fn list<'a>(&'a self, prefix: &'a str) -> impl Stream<Item = Result<String>> + Send + 'a {
        try_stream! {
            let mut pages = self
                .client
                .list_objects_v2()
                .bucket(&self.bucket)
                .prefix(prefix)
                .into_paginator()
                .send();

            while let Some(page) = pages.try_next().await? {
                self.record(StorageStats::add_list);
                for object in page.contents() {
                    let key = object.key().ok_or_else(|| Error::InvalidKey(String::new()))?;
                    yield key.to_owned();
                }
            }
        }
    }
}

fn tier(tier: RestoreTier) -> Tier {
    match tier {
        RestoreTier::Standard => Tier::Standard,
        RestoreTier::Bulk => Tier::Bulk,
    }
}

#[async_trait]
impl ObjectStore for S3Storage {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn head(&self, key: &str) -> Result<ObjectMetadata> {
        let response = self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|err| match err.into_service_error() {
                HeadObjectError::NotFound(_) => Error::ObjectNotFound(key.to_owned()),
                err => Error::other(err),
            })?;

        self.record(StorageStats::add_head);

        let storage_class = StorageClass::parse(
            response
                .storage_class()
                .map(aws_sdk_s3::types::StorageClass::as_str),
        );
        let restore = RestoreMarker::parse(response.restore());
        let content_length = response
            .content_length()
            .and_then(|length| u64::try_from(length).ok())
            .unwrap_or(0);

        Ok(ObjectMetadata::new(storage_class, restore, content_length))
    }

    async fn restore(&self, key: &str, restore_tier: RestoreTier, days: i32) -> Result<()> {
        let job_parameters = GlacierJobParameters::builder()
            .tier(tier(restore_tier))
            .build()?;
        let request = RestoreRequest::builder()
            .days(days)
            .glacier_job_parameters(job_parameters)
            .build();

        self.client
            .restore_object()
            .bucket(&self.bucket)
            .key(key)
            .restore_request(request)
            .send()
            .await?;

        self.record(StorageStats::add_restore);
        Ok(())
    }

    fn keys<'a>(&'a self, prefix: &'a str) -> KeyStream<'a> {
        Box::pin(self.list(prefix))
    }

    async fn download(&self, key: &str, path: &Path) -> Result<u64> {
        let response = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|err| match err.into_service_error() {
                GetObjectError::NoSuchKey(_) => Error::ObjectNotFound(key.to_owned()),
                err => Error::other(err),
            })?;

        let body = response.body.into_async_read();
        tokio::pin!(body);
        let mut file = File::create(path).await?;
        let size = tokio::io::copy(&mut body, &mut file).await?;
        file.flush().await?;

        self.record(|stats| stats.add_get(size));
        Ok(size)
    }

    fn stats(&self) -> StorageStats {
        self.stats
            .lock()
            .map(|stats| stats.clone())
            .unwrap_or_default()
    }
}
