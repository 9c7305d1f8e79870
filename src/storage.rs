//! Durable client-local storage.
//!
//! A small key/value store standing in for the browser's `localStorage`:
//! - file-based under the platform data directory on native targets
//! - in-memory on wasm (and in tests)

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

#[cfg(not(target_arch = "wasm32"))]
use std::fs;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to create storage directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to delete {path}: {source}")]
    Delete {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Clone, Debug)]
pub enum Storage {
    Disk { root: PathBuf },
    Memory(Arc<Mutex<HashMap<String, String>>>),
}

impl Storage {
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Storage::Disk { root: root.into() }
    }

    pub fn in_memory() -> Self {
        Storage::Memory(Arc::default())
    }

    /// Platform default: `<data_local_dir>/capafront/storage`, in-memory on wasm.
    pub fn platform_default() -> Self {
        #[cfg(not(target_arch = "wasm32"))]
        {
            Storage::at(default_storage_dir())
        }
        #[cfg(target_arch = "wasm32")]
        {
            Storage::in_memory()
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match self {
            Storage::Disk { root } => read_file(&key_path(root, key)),
            Storage::Memory(map) => map
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .get(&sanitize_key(key))
                .cloned(),
        }
    }

    pub fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        match self {
            Storage::Disk { root } => write_file(root, &key_path(root, key), value),
            Storage::Memory(map) => {
                map.lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .insert(sanitize_key(key), value.to_string());
                Ok(())
            }
        }
    }

    pub fn remove(&self, key: &str) -> Result<(), StorageError> {
        match self {
            Storage::Disk { root } => remove_file(&key_path(root, key)),
            Storage::Memory(map) => {
                map.lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .remove(&sanitize_key(key));
                Ok(())
            }
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn default_storage_dir() -> PathBuf {
    if let Some(data_dir) = dirs::data_local_dir() {
        return data_dir.join("capafront").join("storage");
    }

    PathBuf::from("cache").join("storage")
}

fn key_path(root: &Path, key: &str) -> PathBuf {
    root.join(format!("{}.json", sanitize_key(key)))
}

#[cfg(not(target_arch = "wasm32"))]
fn read_file(path: &Path) -> Option<String> {
    fs::read_to_string(path).ok()
}

#[cfg(not(target_arch = "wasm32"))]
fn write_file(root: &Path, path: &Path, value: &str) -> Result<(), StorageError> {
    fs::create_dir_all(root).map_err(|source| StorageError::CreateDir {
        path: root.to_path_buf(),
        source,
    })?;
    fs::write(path, value).map_err(|source| StorageError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(not(target_arch = "wasm32"))]
fn remove_file(path: &Path) -> Result<(), StorageError> {
    if path.exists() {
        fs::remove_file(path).map_err(|source| StorageError::Delete {
            path: path.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

// No filesystem on wasm; a Disk storage there behaves as empty and read-only.
#[cfg(target_arch = "wasm32")]
fn read_file(_path: &Path) -> Option<String> {
    None
}

#[cfg(target_arch = "wasm32")]
fn write_file(_root: &Path, path: &Path, _value: &str) -> Result<(), StorageError> {
    Err(StorageError::Write {
        path: path.to_path_buf(),
        source: std::io::Error::new(std::io::ErrorKind::Unsupported, "no filesystem"),
    })
}

#[cfg(target_arch = "wasm32")]
fn remove_file(_path: &Path) -> Result<(), StorageError> {
    Ok(())
}

/// Sanitize storage key for filesystem use
fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .take(64)
        .collect()
}
