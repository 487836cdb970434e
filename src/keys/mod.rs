
use std::{collections::BTreeSet, path::Path};

use log::{error, info};
use tokio_stream::StreamExt;

use crate::{
    error::{Error, Result},
    storage::DynStore,
};

/// Where the keys of a run come from. Every source is optional.
#[derive(Debug, Default)]
pub struct KeySources<'a> {
    pub explicit: &'a [String],
    pub key_file: Option<&'a Path>,
    pub prefix: Option<&'a str>,
}

/// Merges all sources into one set. An unreadable key file or a failed
/// listing is logged and contributes nothing; an empty result is `NoKeys`.
pub async fn collect_keys(
    store: &DynStore,
    sources: &KeySources<'_>,
) -> Result<BTreeSet<String>> {
    let mut keys = sources.explicit.iter().cloned().collect::<BTreeSet<_>>();

    if let Some(path) = sources.key_file {
        match read_key_file(path).await {
            Ok(file_keys) => keys.extend(file_keys),
            Err(err) => error!("{err}"),
        }
    }

    if let Some(prefix) = sources.prefix {
        match list_prefix(store, prefix).await {
            Ok(listed_keys) => {
                info!("found {} objects under prefix `{prefix}`", listed_keys.len());
                keys.extend(listed_keys);
            }
            Err(err) => error!("can't list objects under `{prefix}`: {err}"),
        }
    }

    if keys.is_empty() {
        return Err(Error::NoKeys);
    }

    Ok(keys)
}

pub async fn read_key_file(path: &Path) -> Result<Vec<String>> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|err| Error::KeyFile {
            path: path.to_owned(),
            message: err.to_string(),
        })?;
    Ok(parse_key_lines(&contents).collect())
}

pub fn parse_key_lines(contents: &str) -> impl Iterator<Item = String> + '_ {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToOwned::to_owned)
}

async fn list_prefix(store: &DynStore, prefix: &str) -> Result<Vec<String>> {
    store.keys(prefix).collect().await
}
