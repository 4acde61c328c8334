//! # File fallback cache
//!
//! The last and least reliable tier: one JSON [`ScheduleBlob`] per owner,
//! stored as `<dir>/<owner>.json`. Files written by older clients may use
//! the Spanish day labels as keys; both spellings are accepted on read.

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use eyre::{eyre, Result, WrapErr};
use priosync_core::models::{
    record::OwnerId,
    schedule::{ScheduleBlob, WeeklySchedule},
};
use tracing::debug;

use crate::store::FallbackCache;

const EXTENSION: &str = "json";

#[derive(Debug, Clone)]
pub struct FileFallbackCache {
    dir: PathBuf,
}

impl FileFallbackCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Owner ids are file stems, so only `[A-Za-z0-9_-]` is allowed.
    fn path_for(&self, owner_id: &OwnerId) -> Result<PathBuf> {
        let id = owner_id.as_str();
        let safe = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !safe {
            return Err(eyre!("Owner id {:?} cannot be used as a cache file name", id));
        }
        Ok(self.dir.join(format!("{id}.{EXTENSION}")))
    }

    /// Owners that currently have a cache file.
    pub async fn owner_ids(&self) -> Result<Vec<OwnerId>> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => {
                return Err(err)
                    .wrap_err_with(|| format!("Failed to list {}", self.dir.display()));
            }
        };

        let mut owners = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                owners.push(OwnerId::new(stem));
            }
        }
        owners.sort();
        Ok(owners)
    }
}

#[async_trait]
impl FallbackCache for FileFallbackCache {
    fn name(&self) -> &'static str {
        "file"
    }

    async fn read(&self, owner_id: &OwnerId) -> Result<Option<WeeklySchedule>> {
        let path = self.path_for(owner_id)?;
        let contents = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("No cached schedule at {}", path.display());
                return Ok(None);
            }
            Err(err) => {
                return Err(err).wrap_err_with(|| format!("Failed to read {}", path.display()));
            }
        };

        let blob: ScheduleBlob = serde_json::from_str(&contents)
            .wrap_err_with(|| format!("Malformed schedule cache {}", path.display()))?;
        let schedule = WeeklySchedule::try_from(blob)
            .wrap_err_with(|| format!("Invalid schedule in {}", path.display()))?;
        Ok(Some(schedule))
    }

    async fn write(&self, owner_id: &OwnerId, schedule: &WeeklySchedule) -> Result<()> {
        let path = self.path_for(owner_id)?;
        tokio::fs::create_dir_all(&self.dir)
            .await
            .wrap_err_with(|| format!("Failed to create {}", self.dir.display()))?;

        let json = serde_json::to_string_pretty(&ScheduleBlob::from(schedule))?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json)
            .await
            .wrap_err_with(|| format!("Failed to write {}", tmp.display()))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .wrap_err_with(|| format!("Failed to replace {}", path.display()))?;

        debug!("Cached schedule for {} at {}", owner_id, path.display());
        Ok(())
    }
}
