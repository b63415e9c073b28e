use std::sync::Arc;

use crate::conversation::ConversationCache;
use crate::session::SessionStore;
use crate::storage::KeyValueStorage;

/// Entry point to everything the client keeps locally
#[derive(Clone)]
pub struct PersistClient {
    conversation_cache: ConversationCache,
    session_store: SessionStore,
}

impl PersistClient {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self {
            conversation_cache: ConversationCache::new(storage.clone()),
            session_store: SessionStore::new(storage),
        }
    }

    pub fn builder() -> crate::builder::PersistClientBuilder {
        crate::builder::PersistClientBuilder::new()
    }

    pub fn conversations(&self) -> &ConversationCache {
        &self.conversation_cache
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.session_store
    }
}
