pub mod storage;
pub mod conversation;
pub mod session;
pub mod client;
pub mod error;
pub mod builder;

pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};
pub use conversation::{
    apply_client_message_ids, cache_key, derive_version, deserialize, serialize,
    upsert_confirmed, CachePayload, CachedConversation, ConversationCache, StoredMessage,
};
pub use session::{session_id_from_url, with_session_param, SessionStore, SESSION_STORAGE_KEY};
pub use client::PersistClient;
pub use error::PersistError;
pub use builder::PersistClientBuilder;
