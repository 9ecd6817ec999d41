//! File system key/value store

use ft_core::error::{FiscalError, Result};
use ft_core::session::KeyValueStore;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// File system based key/value store: one file per key
pub struct FileSystemStore {
    /// Base directory for storage
    base_dir: PathBuf,
    /// Key files subdirectory
    values_dir: PathBuf,
}

impl FileSystemStore {
    /// Create a new file system store
    pub fn new(base_dir: impl Into<PathBuf>) -> Result<Self> {
        let base_dir = base_dir.into();
        let values_dir = base_dir.join("local-storage");

        let store = Self {
            base_dir,
            values_dir,
        };

        store.ensure_dirs()?;
        Ok(store)
    }

    /// Create store with default directory (platform data dir, or
    /// ~/.fiscal-tracker)
    pub fn default_location() -> Result<Self> {
        Self::new(default_base_dir())
    }

    /// Ensure required directories exist
    fn ensure_dirs(&self) -> Result<()> {
        if !self.values_dir.exists() {
            fs::create_dir_all(&self.values_dir).map_err(|e| {
                FiscalError::Io(std::io::Error::new(
                    e.kind(),
                    format!("Failed to create storage directory: {}", e),
                ))
            })?;
            debug!("Created storage directory: {:?}", self.values_dir);
        }
        Ok(())
    }

    /// Get the path for a key
    fn value_path(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.values_dir.join(key))
    }

    /// Get a temporary path for atomic writes
    fn temp_path(&self, key: &str) -> PathBuf {
        self.values_dir.join(format!(".{}.tmp", key))
    }

    /// Write value atomically (write to temp, then rename)
    fn atomic_write(&self, key: &str, value: &str) -> Result<()> {
        let final_path = self.value_path(key)?;
        let temp_path = self.temp_path(key);

        let temp_file = fs::File::create(&temp_path).map_err(|e| {
            FiscalError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to create temp file: {}", e),
            ))
        })?;
        let mut writer = BufWriter::new(temp_file);
        let written = writer
            .write_all(value.as_bytes())
            .and_then(|_| writer.flush());
        if let Err(e) = written {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }

        // Rename to final path (atomic on most filesystems)
        fs::rename(&temp_path, &final_path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            FiscalError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to rename temp file: {}", e),
            ))
        })?;

        debug!("Stored key '{}' in {:?}", key, final_path);
        Ok(())
    }

    /// Get the base directory
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Get the directory holding key files
    pub fn values_dir(&self) -> &Path {
        &self.values_dir
    }
}

/// Platform data directory for fiscal-tracker
pub fn default_base_dir() -> PathBuf {
    directories::ProjectDirs::from("br", "semdec", "fiscal-tracker")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".fiscal-tracker")
        })
}

/// Keys become file names, so keep them to a safe alphabet
fn validate_key(key: &str) -> Result<()> {
    let ok = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if ok {
        Ok(())
    } else {
        Err(FiscalError::Validation(format!("Invalid storage key: {:?}", key)))
    }
}

impl KeyValueStore for FileSystemStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.value_path(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(FiscalError::Io(e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.atomic_write(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.value_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!("Removed key '{}' from {:?}", key, path);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(FiscalError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to delete key file: {}", e),
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ft_core::session::{Session, Usuario, TOKEN_KEY, USER_KEY};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn create_test_store() -> (FileSystemStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSystemStore::new(temp_dir.path()).unwrap();
        (store, temp_dir)
    }

    fn usuario() -> Usuario {
        Usuario {
            id: 1,
            username: "admin".to_string(),
            nome_completo: "Administrador SEMDEC".to_string(),
            email: None,
            cargo: None,
            departamento: Some("SEMDEC".to_string()),
        }
    }

    #[test]
    fn test_store_creation() {
        let (store, _temp) = create_test_store();
        assert!(store.values_dir().exists());
    }

    #[test]
    fn test_set_and_get() {
        let (store, _temp) = create_test_store();
        store.set("token", "valid_token_1").unwrap();
        assert_eq!(store.get("token").unwrap().as_deref(), Some("valid_token_1"));
        assert!(store.contains("token"));
    }

    #[test]
    fn test_get_missing_is_none() {
        let (store, _temp) = create_test_store();
        assert_eq!(store.get("user").unwrap(), None);
    }

    #[test]
    fn test_remove() {
        let (store, _temp) = create_test_store();
        store.set("token", "x").unwrap();
        store.remove("token").unwrap();
        assert!(!store.contains("token"));
        // Second remove is a no-op
        store.remove("token").unwrap();
    }

    #[test]
    fn test_invalid_keys_rejected() {
        let (store, _temp) = create_test_store();
        assert!(store.set("../escape", "x").is_err());
        assert!(store.set("", "x").is_err());
        assert!(store.get("a/b").is_err());
    }

    #[test]
    fn test_no_temp_files_left() {
        let (store, _temp) = create_test_store();
        store.set("token", "a").unwrap();
        store.set("token", "b").unwrap();

        let names: Vec<_> = fs::read_dir(store.values_dir())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["token"]);
    }

    #[test]
    fn test_values_survive_reopen() {
        let temp = TempDir::new().unwrap();
        {
            let store = FileSystemStore::new(temp.path()).unwrap();
            store.set("token", "persisted").unwrap();
        }
        let store = FileSystemStore::new(temp.path()).unwrap();
        assert_eq!(store.get("token").unwrap().as_deref(), Some("persisted"));
    }

    #[test]
    fn test_session_lifecycle_on_disk() {
        let (store, _temp) = create_test_store();

        let mut session = Session::establish(&store, "tok".to_string(), usuario()).unwrap();
        assert!(store.values_dir().join(TOKEN_KEY).exists());
        assert!(store.values_dir().join(USER_KEY).exists());

        let restored = Session::init_from_storage(&store).unwrap();
        assert_eq!(restored.user().map(|u| u.username.as_str()), Some("admin"));

        session.logout(&store).unwrap();
        assert!(!store.values_dir().join(TOKEN_KEY).exists());
        assert!(!store.values_dir().join(USER_KEY).exists());
        assert!(!Session::init_from_storage(&store).unwrap().is_authenticated());
    }
}
