mod http;

pub use http::HttpCouchStore;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{SecurityPolicy, UserRecord};

/// CouchStore defines the document-backend interface the sign-in
/// pipeline runs against.
#[async_trait]
pub trait CouchStore: Send + Sync {
    /// Fetches a `_users` record by id. Unknown ids resolve to `None`.
    async fn fetch_user(&self, id: &str) -> Result<Option<UserRecord>>;

    /// Creates or updates a `_users` record.
    async fn store_user(&self, record: &UserRecord) -> Result<()>;

    /// Creates a database. Succeeds if it already exists.
    async fn ensure_database(&self, name: &str) -> Result<()>;

    /// Replaces the database's `_security` object.
    async fn apply_security(&self, name: &str, policy: &SecurityPolicy) -> Result<()>;

    /// Exchanges a name/password pair for a backend session and returns
    /// the raw `Set-Cookie` header value carrying it.
    async fn create_session(&self, name: &str, password: &str) -> Result<String>;
}
