//! File-backed fallback store
//!
//! One pretty-printed JSON array per collection. Every call re-reads the file;
//! writes go through a temp file and a rename so a crash never leaves a
//! half-written collection behind. The read-modify-write cycle of each write
//! runs under a per-store mutex.
//!
//! Next to each array sits a hidden `.<file stem>.seq` holding the largest id
//! ever issued, so deleting the newest entry never frees its id for reuse.

use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use tokio::{fs, sync::Mutex};
use tracing::{debug, warn};
use uuid::Uuid;

use super::{ContentStore, StoreError, StoreResult};
use crate::identity::next_id;
use crate::kind::ContentKind;
use crate::model::ListQuery;

pub struct FallbackStore<K: ContentKind> {
    path: PathBuf,
    seq_path: PathBuf,
    write_lock: Mutex<()>,
    _kind: PhantomData<fn() -> K>,
}

impl<K: ContentKind> FallbackStore<K> {
    /// Store for `K` under `data_dir`, using the kind's fallback file name.
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        let path = data_dir.as_ref().join(K::FALLBACK_FILE);
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| K::COLLECTION.to_string());

        Self {
            seq_path: path.with_file_name(format!(".{}.seq", stem)),
            path,
            write_lock: Mutex::new(()),
            _kind: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the high-water mark file.
    pub fn seq_path(&self) -> &Path {
        &self.seq_path
    }

    /// Read the whole collection.
    ///
    /// A missing file is an empty collection. A file that is not a JSON array
    /// of rows with ids is reported as corrupt rather than discarded.
    pub async fn load(&self) -> StoreResult<Vec<K::Entry>> {
        let raw = match fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(anyhow::Error::new(e)
                    .context(format!("failed to read {}", self.path.display()))
                    .into());
            }
        };

        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }

        let parsed: Value = serde_json::from_str(&raw)
            .with_context(|| format!("corrupt fallback file {}", self.path.display()))?;
        let Value::Array(rows) = parsed else {
            return Err(StoreError::Other(anyhow!(
                "corrupt fallback file {}: expected a JSON array",
                self.path.display()
            )));
        };

        rows.iter()
            .enumerate()
            .map(|(index, row)| {
                K::from_row(row).ok_or_else(|| {
                    StoreError::Other(anyhow!(
                        "corrupt fallback file {}: row {} has no valid id",
                        self.path.display(),
                        index
                    ))
                })
            })
            .collect()
    }

    /// Atomically replace the collection on disk.
    async fn save(&self, entries: &[K::Entry]) -> StoreResult<()> {
        let content = serde_json::to_string_pretty(entries).context("failed to serialize entries")?;
        self.replace(&self.path, content).await?;

        debug!(path = %self.path.display(), count = entries.len(), "Saved fallback collection");
        Ok(())
    }

    /// Largest id ever issued. A missing or unreadable mark counts as zero,
    /// leaving the ids in the collection as the only floor.
    async fn high_water(&self) -> i64 {
        let raw = match fs::read_to_string(&self.seq_path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return 0,
            Err(e) => {
                warn!(path = %self.seq_path.display(), error = %e, "Failed to read id high-water mark");
                return 0;
            }
        };

        raw.trim().parse::<i64>().unwrap_or_else(|_| {
            warn!(path = %self.seq_path.display(), "Ignoring malformed id high-water mark");
            0
        })
    }

    async fn save_high_water(&self, high_water: i64) -> StoreResult<()> {
        self.replace(&self.seq_path, high_water.to_string()).await
    }

    /// Write `content` to a temp file beside `target`, then rename it over `target`.
    async fn replace(&self, target: &Path, content: String) -> StoreResult<()> {
        let dir = target
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        fs::create_dir_all(dir)
            .await
            .with_context(|| format!("failed to create {}", dir.display()))?;

        let tmp_path = dir.join(format!(".{}-{}.tmp", K::COLLECTION, Uuid::new_v4()));

        fs::write(&tmp_path, content)
            .await
            .with_context(|| format!("failed to write {}", tmp_path.display()))?;
        if let Err(e) = fs::rename(&tmp_path, target).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(anyhow::Error::new(e)
                .context(format!("failed to replace {}", target.display()))
                .into());
        }

        Ok(())
    }
}

#[async_trait]
impl<K: ContentKind> ContentStore<K> for FallbackStore<K> {
    fn name(&self) -> &'static str {
        "fallback"
    }

    async fn list(&self, query: &ListQuery) -> StoreResult<Vec<K::Entry>> {
        let mut entries: Vec<K::Entry> = self
            .load()
            .await?
            .into_iter()
            .filter(|entry| K::matches(entry, query))
            .collect();

        entries.sort_by(K::compare);
        entries.truncate(query.limit);
        Ok(entries)
    }

    async fn insert(&self, draft: &K::Draft) -> StoreResult<K::Entry> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.load().await?;

        let id = next_id(self.high_water().await, entries.iter().map(K::id));
        let created = K::new_entry(draft, id, Utc::now());
        if entries.iter().any(|existing| K::conflicts(existing, &created)) {
            return Err(StoreError::DuplicateKey(K::CONFLICT.to_string()));
        }

        // mark first: a failed array write then only skips an id
        self.save_high_water(id).await?;
        entries.push(created.clone());
        self.save(&entries).await?;
        Ok(created)
    }

    async fn update(&self, id: i64, patch: &K::Patch) -> StoreResult<K::Entry> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.load().await?;

        let index = entries
            .iter()
            .position(|entry| K::id(entry) == id)
            .ok_or(StoreError::NotFound)?;
        let updated = K::apply_patch(&entries[index], patch, Utc::now());

        let duplicate = entries
            .iter()
            .any(|other| K::id(other) != id && K::conflicts(other, &updated));
        if duplicate {
            return Err(StoreError::DuplicateKey(K::CONFLICT.to_string()));
        }

        entries[index] = updated.clone();
        self.save(&entries).await?;
        Ok(updated)
    }

    async fn delete(&self, id: i64) -> StoreResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.load().await?;

        let index = entries
            .iter()
            .position(|entry| K::id(entry) == id)
            .ok_or(StoreError::NotFound)?;

        let recorded = self.high_water().await;
        let issued = entries.iter().map(K::id).fold(recorded, i64::max);
        if issued > recorded {
            self.save_high_water(issued).await?;
        }

        entries.remove(index);
        self.save(&entries).await
    }
}
