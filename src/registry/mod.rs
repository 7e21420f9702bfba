//! Persisted model registry
//!
//! Stores the id → `{active}` mapping as a JSON document on local disk.
//! Every load-modify-save sequence runs under one in-process lock so
//! concurrent requests cannot lose each other's updates.

pub mod table;

pub use table::{ModelEntry, ModelRecord, ModelTable};

use crate::error::{AppError, AppResult};
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// File-backed model registry
///
/// Constructed once at startup and shared through `AppState`.
#[derive(Debug)]
pub struct ModelRegistry {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl ModelRegistry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Path of the backing JSON document
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the current table
    ///
    /// A missing or blank file is an empty table.
    pub async fn load(&self) -> AppResult<ModelTable> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(
                    path = %self.path.display(),
                    "Registry file not found, returning empty table"
                );
                return Ok(ModelTable::new());
            }
            Err(source) => {
                return Err(AppError::RegistryRead {
                    path: self.path.display().to_string(),
                    source,
                });
            }
        };

        if content.trim().is_empty() {
            return Ok(ModelTable::new());
        }

        let table: ModelTable =
            serde_json::from_str(&content).map_err(|source| AppError::RegistryParse {
                path: self.path.display().to_string(),
                source,
            })?;

        tracing::debug!(
            path = %self.path.display(),
            models = table.len(),
            "Loaded model registry"
        );
        Ok(table)
    }

    /// Overwrite the file with `table`
    pub async fn save(&self, table: &ModelTable) -> AppResult<()> {
        let _guard = self.write_lock.lock().await;
        self.write(table).await
    }

    /// Set the flag for `id`, creating it when absent
    ///
    /// The id is trimmed; an empty id changes nothing and returns `false`.
    pub async fn upsert(&self, id: &str, active: bool) -> AppResult<bool> {
        let id = id.trim();
        if id.is_empty() {
            tracing::debug!("Ignoring upsert with empty model id");
            return Ok(false);
        }

        self.mutate(|table| {
            table.upsert(id, active);
            (true, true)
        })
        .await
    }

    /// Flip the flag for `id`; `None` when the id is not registered
    pub async fn toggle(&self, id: &str) -> AppResult<Option<bool>> {
        self.mutate(|table| {
            let toggled = table.toggle(id);
            (toggled, toggled.is_some())
        })
        .await
    }

    /// Remove `id`; returns whether it was registered
    pub async fn delete(&self, id: &str) -> AppResult<bool> {
        self.mutate(|table| {
            let removed = table.remove(id);
            (removed, removed)
        })
        .await
    }

    /// All entries, sorted by id
    pub async fn list_all(&self) -> AppResult<Vec<ModelRecord>> {
        Ok(self.load().await?.records())
    }

    /// Ids of active entries, sorted
    pub async fn list_active(&self) -> AppResult<Vec<String>> {
        Ok(self.load().await?.active_ids())
    }

    pub async fn is_active(&self, id: &str) -> AppResult<bool> {
        Ok(self.load().await?.is_active(id))
    }

    /// Run `apply` against the freshly loaded table under the write lock
    ///
    /// `apply` returns its result and whether the table changed; the file is
    /// only rewritten when it did.
    async fn mutate<T, F>(&self, apply: F) -> AppResult<T>
    where
        F: FnOnce(&mut ModelTable) -> (T, bool),
    {
        let _guard = self.write_lock.lock().await;
        let mut table = self.load().await?;
        let (result, changed) = apply(&mut table);
        if changed {
            self.write(&table).await?;
        }
        Ok(result)
    }

    /// Write through a sibling temp file and rename it over the target.
    /// Callers must hold `write_lock`.
    async fn write(&self, table: &ModelTable) -> AppResult<()> {
        let write_err = |source| AppError::RegistryWrite {
            path: self.path.display().to_string(),
            source,
        };

        let json = serde_json::to_string_pretty(table)
            .map_err(|e| AppError::Internal(format!("Failed to serialize registry: {}", e)))?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
        }

        let tmp_path = temp_path(&self.path);
        tokio::fs::write(&tmp_path, json).await.map_err(write_err)?;
        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .map_err(write_err)?;

        tracing::info!(
            path = %self.path.display(),
            models = table.len(),
            "Saved model registry"
        );
        Ok(())
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}
