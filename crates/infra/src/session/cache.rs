//! In-memory Data API session cache

use std::collections::HashMap;

use fmbridge_core::SessionTokenCache;
use fmbridge_domain::Session;
use parking_lot::RwLock;
use tracing::debug;

/// Process-wide session cache keyed by URL-encoded database name.
///
/// Wrap in an `Arc` to share one cache between gateways.
#[derive(Debug, Default)]
pub struct InMemorySessionTokenCache {
    sessions: RwLock<HashMap<String, Session>>,
}

impl InMemorySessionTokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}

impl SessionTokenCache for InMemorySessionTokenCache {
    fn get(&self, datasource_key: &str) -> Option<Session> {
        self.sessions
            .read()
            .get(datasource_key)
            .filter(|session| !session.token.is_empty())
            .cloned()
    }

    fn set(&self, session: Session) {
        debug!(datasource_key = %session.datasource_key, "Caching Data API session");
        self.sessions.write().insert(session.datasource_key.clone(), session);
    }

    fn invalidate(&self, datasource_key: &str) {
        if self.sessions.write().remove(datasource_key).is_some() {
            debug!(datasource_key, "Invalidated Data API session");
        }
    }

    fn clear(&self) {
        self.sessions.write().clear();
    }
}
