//! Port interface for caching Data API session tokens

use fmbridge_domain::Session;

/// Datasource key → bearer token cache
///
/// Entries live until invalidated. Implementations must be safe to share
/// between concurrent requests.
pub trait SessionTokenCache: Send + Sync {
    /// Cached session for `datasource_key`, if any.
    fn get(&self, datasource_key: &str) -> Option<Session>;

    /// Store `session`, replacing any entry for the same key.
    fn set(&self, session: Session);

    /// Forget the session for `datasource_key`.
    fn invalidate(&self, datasource_key: &str);

    /// Drop every cached session.
    fn clear(&self);
}
