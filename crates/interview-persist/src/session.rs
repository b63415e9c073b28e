use std::sync::Arc;

use url::Url;

use crate::error::Result;
use crate::storage::KeyValueStorage;

pub const SESSION_STORAGE_KEY: &str = "golden_interview_session";

/// Query parameters that may carry a session id, in priority order
const SESSION_QUERY_PARAMS: [&str; 2] = ["session", "q"];

/// Remembers which interview session the user was last in
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn KeyValueStorage>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    pub fn remember(&self, session_id: &str) {
        if let Err(e) = self.storage.set_item(SESSION_STORAGE_KEY, session_id) {
            tracing::warn!("Failed to remember session {}: {}", session_id, e);
        }
    }

    pub fn recall(&self) -> Option<String> {
        match self.storage.get_item(SESSION_STORAGE_KEY) {
            Ok(value) => value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            Err(e) => {
                tracing::warn!("Failed to read remembered session: {}", e);
                None
            }
        }
    }

    pub fn forget(&self) {
        if let Err(e) = self.storage.remove_item(SESSION_STORAGE_KEY) {
            tracing::warn!("Failed to forget session: {}", e);
        }
    }
}

/// Session id carried by a page URL (`?session=` wins over `?q=`)
pub fn session_id_from_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;

    SESSION_QUERY_PARAMS.iter().find_map(|param| {
        parsed
            .query_pairs()
            .find(|(key, value)| key.as_ref() == *param && !value.trim().is_empty())
            .map(|(_, value)| value.trim().to_string())
    })
}

/// Rewrite `url` so its `session` parameter is `session_id`, or drop it when `None`.
///
/// The legacy `q` parameter is always removed; other parameters are kept.
pub fn with_session_param(url: &str, session_id: Option<&str>) -> Result<String> {
    let mut parsed = Url::parse(url)?;

    let kept: Vec<(String, String)> = parsed
        .query_pairs()
        .filter(|(key, _)| !SESSION_QUERY_PARAMS.contains(&key.as_ref()))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    if kept.is_empty() && session_id.is_none() {
        parsed.set_query(None);
    } else {
        let mut pairs = parsed.query_pairs_mut();
        pairs.clear();
        for (key, value) in &kept {
            pairs.append_pair(key, value);
        }
        if let Some(id) = session_id {
            pairs.append_pair("session", id);
        }
    }

    Ok(parsed.into())
}
