//! Persistence port for the cart mirror.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use thiserror::Error;

use super::CartLine;

/// Errors raised by a [`CartStore`].
#[derive(Debug, Error)]
pub enum CartStoreError {
    /// Reading or writing the underlying medium failed.
    #[error("cart store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Saved content exists but is not a cart.
    #[error("saved cart is malformed: {0}")]
    Malformed(#[source] serde_json::Error),

    /// The cart could not be serialized.
    #[error("cart serialization error: {0}")]
    Serialization(#[source] serde_json::Error),
}

/// Where the cart is mirrored between sessions.
///
/// One entry holds the whole cart as a JSON array of lines.
pub trait CartStore: Send + Sync {
    /// Read the saved cart. `Ok(None)` when nothing has been saved.
    ///
    /// # Errors
    ///
    /// Returns `Malformed` if saved content does not decode, or `Io` if it
    /// cannot be read.
    fn load(&self) -> Result<Option<Vec<CartLine>>, CartStoreError>;

    /// Overwrite the saved cart.
    ///
    /// # Errors
    ///
    /// Returns error if the cart cannot be serialized or written.
    fn save(&self, lines: &[CartLine]) -> Result<(), CartStoreError>;

    /// Remove the saved entry entirely. Erasing a missing entry is not an error.
    ///
    /// # Errors
    ///
    /// Returns error if an existing entry cannot be removed.
    fn erase(&self) -> Result<(), CartStoreError>;
}

impl<T: CartStore + ?Sized> CartStore for Box<T> {
    fn load(&self) -> Result<Option<Vec<CartLine>>, CartStoreError> {
        (**self).load()
    }

    fn save(&self, lines: &[CartLine]) -> Result<(), CartStoreError> {
        (**self).save(lines)
    }

    fn erase(&self) -> Result<(), CartStoreError> {
        (**self).erase()
    }
}

impl<T: CartStore + ?Sized> CartStore for &T {
    fn load(&self) -> Result<Option<Vec<CartLine>>, CartStoreError> {
        (**self).load()
    }

    fn save(&self, lines: &[CartLine]) -> Result<(), CartStoreError> {
        (**self).save(lines)
    }

    fn erase(&self) -> Result<(), CartStoreError> {
        (**self).erase()
    }
}

fn decode(content: &str) -> Result<Vec<CartLine>, CartStoreError> {
    serde_json::from_str(content).map_err(CartStoreError::Malformed)
}

fn encode(lines: &[CartLine]) -> Result<String, CartStoreError> {
    serde_json::to_string(lines).map_err(CartStoreError::Serialization)
}

// =============================================================================
// FileCartStore
// =============================================================================

/// Stores the cart as a JSON file, replaced atomically on every save.
#[derive(Debug, Clone)]
pub struct FileCartStore {
    path: PathBuf,
}

impl FileCartStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .map_or_else(|| "cart".into(), |name| name.to_string_lossy());
        self.path.with_file_name(format!(
            ".{file_name}.{}.tmp",
            uuid::Uuid::new_v4().simple()
        ))
    }
}

impl CartStore for FileCartStore {
    fn load(&self) -> Result<Option<Vec<CartLine>>, CartStoreError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        decode(&content).map(Some)
    }

    fn save(&self, lines: &[CartLine]) -> Result<(), CartStoreError> {
        let content = encode(lines)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let tmp_path = self.temp_path();
        let write_result = (|| {
            let mut file = std::fs::File::create(&tmp_path)?;
            file.write_all(content.as_bytes())?;
            file.sync_all()?;
            drop(file);
            std::fs::rename(&tmp_path, &self.path)
        })();

        if let Err(e) = write_result {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(e.into());
        }
        Ok(())
    }

    fn erase(&self) -> Result<(), CartStoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// =============================================================================
// MemoryCartStore
// =============================================================================

/// Keeps the serialized cart in memory. Used by tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryCartStore {
    entry: Mutex<Option<String>>,
}

impl MemoryCartStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with raw saved content, which need not be valid.
    #[must_use]
    pub fn with_raw(content: impl Into<String>) -> Self {
        Self {
            entry: Mutex::new(Some(content.into())),
        }
    }

    /// The raw saved entry, if any.
    #[must_use]
    pub fn raw(&self) -> Option<String> {
        self.entry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl CartStore for MemoryCartStore {
    fn load(&self) -> Result<Option<Vec<CartLine>>, CartStoreError> {
        self.raw().as_deref().map(decode).transpose()
    }

    fn save(&self, lines: &[CartLine]) -> Result<(), CartStoreError> {
        let content = encode(lines)?;
        *self.entry.lock().unwrap_or_else(PoisonError::into_inner) = Some(content);
        Ok(())
    }

    fn erase(&self) -> Result<(), CartStoreError> {
        *self.entry.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}
