//! Durable slot for the address awaiting verification

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use mw_core::client::PendingIdentityStore;

use crate::InfrastructureError;

/// Key-value store persisted as a JSON object in a single file
///
/// Missing files read as empty. Writes replace the whole file through a
/// temporary sibling.
#[derive(Debug)]
pub struct FilePendingIdentityStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FilePendingIdentityStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<HashMap<String, String>, InfrastructureError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.is_empty() => Ok(HashMap::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn persist(&self, values: &HashMap<String, String>) -> Result<(), InfrastructureError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, serde_json::to_vec_pretty(values)?).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        debug!(path = %self.path.display(), entries = values.len(), "Pending store written");
        Ok(())
    }

    async fn update<F>(&self, change: F) -> Result<(), String>
    where
        F: FnOnce(&mut HashMap<String, String>) + Send,
    {
        let _guard = self.write_lock.lock().await;
        let mut values = self.load().await.map_err(|e| e.to_string())?;
        change(&mut values);
        self.persist(&values).await.map_err(|e| e.to_string())
    }
}

#[async_trait]
impl PendingIdentityStore for FilePendingIdentityStore {
    async fn get(&self, key: &str) -> Result<Option<String>, String> {
        let values = self.load().await.map_err(|e| e.to_string())?;
        Ok(values.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), String> {
        let (key, value) = (key.to_string(), value.to_string());
        self.update(move |values| {
            values.insert(key, value);
        })
        .await
    }

    async fn clear(&self, key: &str) -> Result<(), String> {
        let key = key.to_string();
        self.update(move |values| {
            values.remove(&key);
        })
        .await
    }
}

/// Process-local pending store
#[derive(Debug, Default)]
pub struct MemoryPendingIdentityStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryPendingIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PendingIdentityStore for MemoryPendingIdentityStore {
    async fn get(&self, key: &str) -> Result<Option<String>, String> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), String> {
        self.values
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn clear(&self, key: &str) -> Result<(), String> {
        self.values.write().await.remove(key);
        Ok(())
    }
}
