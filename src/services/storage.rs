use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::{Mutex, RwLock};

use crate::error::{MonitorError, Result};

pub const STOCKS_KEY: &str = "stocks";
pub const POLL_CONFIG_KEY: &str = "poll_config";

/// Key/value storage. Last write wins; reads see this process's own writes.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Value>>;
    async fn set(&self, key: &str, value: Value) -> Result<()>;
}

#[derive(Default)]
pub struct MemoryStorage {
    items: RwLock<HashMap<String, Value>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.items.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        self.items.write().await.insert(key.to_string(), value);
        Ok(())
    }
}

/// Whole store kept as one JSON object on disk.
pub struct FileStorage {
    path: PathBuf,
    cache: Mutex<Option<serde_json::Map<String, Value>>>,
}

impl FileStorage {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            cache: Mutex::new(None),
        }
    }

    async fn read_file(&self) -> Result<serde_json::Map<String, Value>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.is_empty() => Ok(serde_json::Map::new()),
            Ok(bytes) => match serde_json::from_slice::<Value>(&bytes)? {
                Value::Object(map) => Ok(map),
                _ => Err(MonitorError::Storage(format!(
                    "{} does not contain a JSON object",
                    self.path.display()
                ))),
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(serde_json::Map::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_file(&self, map: &serde_json::Map<String, Value>) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                tokio::fs::create_dir_all(dir).await?;
            }
        }

        let tmp = self.path.with_extension("json.tmp");
        let bytes = serde_json::to_vec_pretty(map)?;
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        let mut cache = self.cache.lock().await;
        if cache.is_none() {
            *cache = Some(self.read_file().await?);
        }
        Ok(cache.as_ref().and_then(|m| m.get(key).cloned()))
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        let mut cache = self.cache.lock().await;
        let mut map = match cache.take() {
            Some(m) => m,
            None => self.read_file().await?,
        };
        map.insert(key.to_string(), value);

        let res = self.write_file(&map).await;
        *cache = Some(map);
        res
    }
}
