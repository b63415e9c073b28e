use std::path::PathBuf;
use std::sync::Arc;

use crate::client::PersistClient;
use crate::storage::{FileStorage, KeyValueStorage, MemoryStorage};

pub struct PersistClientBuilder {
    directory: Option<PathBuf>,
    storage: Option<Arc<dyn KeyValueStorage>>,
}

impl PersistClientBuilder {
    pub fn new() -> Self {
        Self {
            directory: None,
            storage: None,
        }
    }

    /// Keep data in files under `path`
    pub fn directory(mut self, path: impl Into<PathBuf>) -> Self {
        self.directory = Some(path.into());
        self
    }

    /// Use a caller-provided backend; takes precedence over `directory`
    pub fn storage(mut self, storage: Arc<dyn KeyValueStorage>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Falls back to in-memory storage when no backend was chosen
    pub fn build(self) -> PersistClient {
        let storage: Arc<dyn KeyValueStorage> = match (self.storage, self.directory) {
            (Some(storage), _) => storage,
            (None, Some(dir)) => {
                tracing::debug!("Using file storage at {}", dir.display());
                Arc::new(FileStorage::new(dir))
            }
            (None, None) => {
                tracing::debug!("Using in-memory storage");
                Arc::new(MemoryStorage::new())
            }
        };

        PersistClient::new(storage)
    }
}

impl Default for PersistClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
