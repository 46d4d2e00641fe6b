//! Persistent key/value config store
//!
//! The installer calls [`ConfigStore::set`] once per whitelisted key and
//! then [`ConfigStore::flush`] once. Passing `None` clears the key, which is
//! how "the installer did not supply this option" is written.

use std::collections::BTreeMap;

use serde_json::Value;

use agentver_fs::{DocumentStore, NormalizedPath};

use crate::error::{Error, Result};

/// Write-only view of a key/value config store.
pub trait ConfigStore {
    /// Set `key` to `value`, or clear it when `value` is `None`.
    fn set(&mut self, key: &str, value: Option<Value>) -> Result<()>;

    /// Persist every pending `set`. Stores without a backing file have nothing to do.
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Config store persisted as a flat document (JSON, TOML or YAML by extension).
///
/// The file is read on the first `set`. Changes are staged in memory and
/// written atomically by [`ConfigStore::flush`], so a failed merge never
/// leaves half of its keys on disk. A JSON `null` is stored as an absent key.
///
/// The host store is `config.json`: JSON holds every value an options file
/// can carry, including nested nulls and integers above `i64::MAX`.
#[derive(Debug)]
pub struct FileConfigStore {
    path: NormalizedPath,
    documents: DocumentStore,
    values: Option<BTreeMap<String, Value>>,
    dirty: bool,
}

impl FileConfigStore {
    pub fn new(path: impl Into<NormalizedPath>) -> Self {
        Self {
            path: path.into(),
            documents: DocumentStore::new(),
            values: None,
            dirty: false,
        }
    }

    pub fn path(&self) -> &NormalizedPath {
        &self.path
    }

    /// Current value of `key`, including staged changes.
    pub fn get(&mut self, key: &str) -> Result<Option<&Value>> {
        Ok(self.values()?.get(key))
    }

    fn values(&mut self) -> Result<&mut BTreeMap<String, Value>> {
        if self.values.is_none() {
            let loaded = self
                .documents
                .load_if_exists::<BTreeMap<String, Value>>(&self.path)
                .map_err(|e| Error::config_store(self.path.clone(), e))?;
            self.values = Some(loaded.unwrap_or_default());
        }
        Ok(self.values.get_or_insert_with(BTreeMap::new))
    }
}

impl ConfigStore for FileConfigStore {
    fn set(&mut self, key: &str, value: Option<Value>) -> Result<()> {
        let values = self.values()?;
        match value {
            Some(Value::Null) | None => {
                values.remove(key);
            }
            Some(value) => {
                values.insert(key.to_string(), value);
            }
        }
        self.dirty = true;
        tracing::trace!(key, "Config value staged");
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }
        let Some(values) = &self.values else {
            return Ok(());
        };

        self.documents
            .save(&self.path, values)
            .map_err(|e| Error::config_store(self.path.clone(), e))?;
        self.dirty = false;
        tracing::debug!(path = %self.path, keys = values.len(), "Config store written");
        Ok(())
    }
}

/// In-memory config store that also records every `set` call in order.
#[derive(Debug, Default, Clone)]
pub struct MemoryConfigStore {
    values: BTreeMap<String, Value>,
    writes: Vec<(String, Option<Value>)>,
    flushes: usize,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Every `set` call received, in order.
    pub fn writes(&self) -> &[(String, Option<Value>)] {
        &self.writes
    }

    /// Number of `flush` calls received.
    pub fn flushes(&self) -> usize {
        self.flushes
    }
}

impl ConfigStore for MemoryConfigStore {
    fn set(&mut self, key: &str, value: Option<Value>) -> Result<()> {
        self.writes.push((key.to_string(), value.clone()));
        match value {
            Some(Value::Null) | None => {
                self.values.remove(key);
            }
            Some(value) => {
                self.values.insert(key.to_string(), value);
            }
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.flushes += 1;
        Ok(())
    }
}
