//! Item store backed by a single JSON document
//!
//! Every read parses the whole file and every write replaces it. Writes are not
//! atomic, and only creations within this process are serialized against each other.

use crate::error::CoreError;
use crate::id;
use crate::models::{Item, NewItem};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Identity of the store file's current contents, as far as metadata can tell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreFingerprint {
    pub modified: SystemTime,
    pub len: u64,
}

/// Accessor for the JSON item collection
#[derive(Debug)]
pub struct ItemStore {
    path: PathBuf,

    /// Serializes read-modify-write cycles issued through this handle
    write_lock: Mutex<()>,
}

impl ItemStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create an empty collection if the file does not exist yet.
    ///
    /// Returns true when a new file was written.
    pub async fn ensure_exists(&self) -> Result<bool, CoreError> {
        if tokio::fs::try_exists(&self.path)
            .await
            .map_err(|e| self.read_error(e))?
        {
            return Ok(false);
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.write_error(e))?;
        }

        self.write_all(&[]).await?;
        info!(path = %self.path.display(), "Created empty item store");
        Ok(true)
    }

    /// Load and parse the whole collection
    pub async fn read_all(&self) -> Result<Vec<Item>, CoreError> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| self.read_error(e))?;

        let items: Vec<Item> =
            serde_json::from_str(&content).map_err(|e| CoreError::StorageParse {
                path: self.path.clone(),
                message: e.to_string(),
                source: e,
            })?;

        debug!(count = items.len(), "Item store read");
        Ok(items)
    }

    /// Replace the persisted collection with `items`
    pub async fn write_all(&self, items: &[Item]) -> Result<(), CoreError> {
        let content = serde_json::to_string_pretty(items).map_err(CoreError::Serialize)?;

        tokio::fs::write(&self.path, content)
            .await
            .map_err(|e| self.write_error(e))?;

        debug!(count = items.len(), "Item store written");
        Ok(())
    }

    /// Look up a single item by id
    pub async fn find(&self, id: u64) -> Result<Item, CoreError> {
        self.read_all()
            .await?
            .into_iter()
            .find(|item| item.id == id)
            .ok_or_else(|| CoreError::not_found(id))
    }

    /// Assign an id, append, and persist. Returns the stored item.
    pub async fn create(&self, new_item: NewItem) -> Result<Item, CoreError> {
        let _guard = self.write_lock.lock().await;

        let mut items = self.read_all().await?;
        let item = new_item.with_id(id::next_id(&items));
        items.push(item.clone());
        self.write_all(&items).await?;

        info!(id = item.id, name = %item.name, "Item created");
        Ok(item)
    }

    /// Current modification time and size of the backing file
    pub async fn fingerprint(&self) -> Result<StoreFingerprint, CoreError> {
        let metadata = tokio::fs::metadata(&self.path)
            .await
            .map_err(|e| self.read_error(e))?;
        let modified = metadata.modified().map_err(|e| self.read_error(e))?;

        Ok(StoreFingerprint {
            modified,
            len: metadata.len(),
        })
    }

    fn read_error(&self, source: std::io::Error) -> CoreError {
        CoreError::StorageRead {
            path: self.path.clone(),
            source,
        }
    }

    fn write_error(&self, source: std::io::Error) -> CoreError {
        CoreError::StorageWrite {
            path: self.path.clone(),
            source,
        }
    }
}
