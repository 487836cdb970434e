use std::path::{Component, Path, PathBuf};

use log::{error, info};
use tokio::fs;

use crate::{
    error::{Error, Result},
    format::{format_path, format_size},
    storage::DynStore,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Materialized {
    pub files_downloaded: u64,
    pub files_copied: u64,
    pub bytes_downloaded: u64,
    pub failures: u64,
}

/// Downloads each key below `download_dir`, then mirrors it below
/// `destination` if one is set. A failing key never stops the others.
pub async fn materialize(
    store: &DynStore,
    keys: &[&str],
    download_dir: &Path,
    destination: Option<&Path>,
) -> Materialized {
    let mut result = Materialized::default();
    info!("Downloading {} restored files...", keys.len());

    for &key in keys {
        let (path, size) = match download(store, key, download_dir).await {
            Ok(downloaded) => downloaded,
            Err(err) => {
                error!("  Download failed for {key}: {err}");
                result.failures += 1;
                continue;
            }
        };

        info!("  Downloaded: {key} -> {}", format_path(&path));
        result.files_downloaded += 1;
        result.bytes_downloaded += size;

        if let Some(destination) = destination {
            match copy_to_destination(&path, download_dir, destination).await {
                Ok(dest_path) => {
                    info!("  Copied to network share: {}", format_path(&dest_path));
                    result.files_copied += 1;
                }
                Err(err) => {
                    error!("  Network copy error for {key}: {err}");
                    result.failures += 1;
                }
            }
        }
    }

    info!(
        "Downloaded {} files ({}), {} failed",
        result.files_downloaded,
        format_size(result.bytes_downloaded),
        result.failures
    );
    result
}

/// Path of `key` below `root`. Keys that would escape `root` or that name a
/// directory are rejected.
pub fn local_path(root: &Path, key: &str) -> Result<PathBuf> {
    let relative = Path::new(key);
    let is_plain = relative
        .components()
        .all(|component| matches!(component, Component::Normal(_)));

    if key.is_empty() || key.ends_with('/') || !is_plain {
        return Err(Error::InvalidKey(key.to_owned()));
    }

    Ok(root.join(relative))
}

async fn download(store: &DynStore, key: &str, root: &Path) -> Result<(PathBuf, u64)> {
    let path = local_path(root, key)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let size = store.download(key, &path).await?;
    Ok((path, size))
}

pub async fn copy_to_destination(
    path: &Path,
    download_dir: &Path,
    destination: &Path,
) -> Result<PathBuf> {
    let relative = path.strip_prefix(download_dir)?;
    let dest_path = destination.join(relative);
    if let Some(parent) = dest_path.parent() {
        fs::create_dir_all(parent).await?;
    }

    fs::copy(path, &dest_path).await?;
    Ok(dest_path)
}
