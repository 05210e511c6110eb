// src/storage.rs
//! Долговременное key-value хранилище (аналог localStorage браузера).

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub trait KeyValueStorage {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: &str) -> Result<()>;
    fn remove_item(&self, key: &str) -> Result<()>;
}

// ==================== MEMORY ====================

#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RefCell<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.items.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

// ==================== FILE ====================

/// JSON-объект на диске; каждая запись сразу сбрасывается в файл
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    items: RefCell<BTreeMap<String, String>>,
}

impl FileStorage {
    /// Открывает файл; отсутствующий файл - пустое хранилище
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let items = if path.exists() {
            let raw = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read storage file: {}", path.display()))?;
            if raw.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&raw)
                    .with_context(|| format!("Failed to parse storage file: {}", path.display()))?
            }
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            path,
            items: RefCell::new(items),
        })
    }

    fn flush(&self) -> Result<()> {
        let raw = serde_json::to_string_pretty(&*self.items.borrow())?;
        fs::write(&self.path, raw)
            .with_context(|| format!("Failed to write storage file: {}", self.path.display()))
    }
}

impl KeyValueStorage for FileStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.items.borrow_mut().insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.items.borrow_mut().remove(key);
        self.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get_item("theme"), None);
        storage.set_item("theme", "dark").unwrap();
        assert_eq!(storage.get_item("theme"), Some("dark".to_string()));
        storage.remove_item("theme").unwrap();
        assert_eq!(storage.get_item("theme"), None);
    }

    #[test]
    fn test_file_storage_survives_reopen() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("state.json");

        let storage = FileStorage::open(&path)?;
        assert_eq!(storage.get_item("theme"), None);
        storage.set_item("theme", "dark")?;

        let reopened = FileStorage::open(&path)?;
        assert_eq!(reopened.get_item("theme"), Some("dark".to_string()));
        Ok(())
    }

    #[test]
    fn test_file_storage_rejects_garbage() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("state.json");
        fs::write(&path, "not json")?;

        assert!(FileStorage::open(&path).is_err());
        Ok(())
    }
}
