//! Client-local key/value storage trait

use crate::error::Result;

/// Small persistent string store, the client-side equivalent of browser
/// local storage.
pub trait KeyValueStore: Send + Sync {
    /// Read a value
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any previous one
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a value; removing a missing key is not an error
    fn remove(&self, key: &str) -> Result<()>;

    /// Check if a key is present
    fn contains(&self, key: &str) -> bool {
        matches!(self.get(key), Ok(Some(_)))
    }
}

/// In-memory storage
pub mod memory {
    use super::*;
    use crate::error::FiscalError;
    use std::collections::HashMap;
    use std::sync::RwLock;

    /// In-memory key/value store for tests and ephemeral sessions
    #[derive(Debug, Default)]
    pub struct MemoryStore {
        values: RwLock<HashMap<String, String>>,
    }

    impl MemoryStore {
        /// Create an empty store
        pub fn new() -> Self {
            Self::default()
        }
    }

    fn poisoned() -> FiscalError {
        FiscalError::Validation("memory store lock poisoned".to_string())
    }

    impl KeyValueStore for MemoryStore {
        fn get(&self, key: &str) -> Result<Option<String>> {
            let values = self.values.read().map_err(|_| poisoned())?;
            Ok(values.get(key).cloned())
        }

        fn set(&self, key: &str, value: &str) -> Result<()> {
            let mut values = self.values.write().map_err(|_| poisoned())?;
            values.insert(key.to_string(), value.to_string());
            Ok(())
        }

        fn remove(&self, key: &str) -> Result<()> {
            let mut values = self.values.write().map_err(|_| poisoned())?;
            values.remove(key);
            Ok(())
        }
    }

}
