//! The sign-in pipeline.
//!
//! Five dependent steps run in order: verify the assertion, provision
//! the user record, ensure the per-user database, restrict it to the
//! user, open a session. The first failure aborts the remainder, and
//! nothing performed by earlier steps is rolled back.

use crate::auth::AssertionVerifier;
use crate::error::{Error, Result};
use crate::identity;
use crate::store::CouchStore;
use crate::types::{BROWSERID_ROLE, SecurityPolicy, UserRecord};

/// CouchDB's session cookie key.
pub const AUTH_COOKIE: &str = "AuthSession";

/// Runs the full pipeline and returns the record with `session_token`
/// populated.
pub async fn sign_in(
    verifier: &dyn AssertionVerifier,
    store: &dyn CouchStore,
    assertion: &str,
    audience: &str,
) -> Result<UserRecord> {
    let principal = verifier.verify(assertion, audience).await?;
    let record = ensure_user(store, &principal).await?;
    let record = ensure_database(store, record).await?;
    let record = ensure_security(store, record).await?;
    create_session(store, record).await
}

/// Resolves the `_users` record for a principal: created on first
/// sign-in, otherwise merged with the stored record so the existing
/// secret and any out-of-band changes survive.
pub async fn ensure_user(store: &dyn CouchStore, principal: &str) -> Result<UserRecord> {
    tracing::info!("Ensuring {principal} user exists");

    let computed = UserRecord::for_principal(principal);
    let mut record = match store.fetch_user(&computed.id).await? {
        Some(existing) => merge(existing, computed),
        None => {
            tracing::info!("User {principal} doesnt exist, creating ...");
            computed
        }
    };

    if record.secret.is_none() {
        let secret = identity::generate_secret();
        record.password = Some(secret.clone());
        record.secret = Some(secret);
    }

    store.store_user(&record).await?;
    Ok(record)
}

/// Stored fields win: the fetched record keeps its `_rev`, secret, role
/// extensions and unknown fields; the marker role and the derived
/// fields are (re)asserted on top.
fn merge(mut existing: UserRecord, computed: UserRecord) -> UserRecord {
    if !existing.roles.iter().any(|role| role == BROWSERID_ROLE) {
        existing.roles.push(BROWSERID_ROLE.to_string());
    }
    existing.doc_type = computed.doc_type;
    existing.name = computed.name;
    existing.db = computed.db;
    existing
}

/// Idempotent database creation. The record passes through unchanged.
pub async fn ensure_database(store: &dyn CouchStore, record: UserRecord) -> Result<UserRecord> {
    tracing::info!("Ensuring {} exists", record.db);

    store.ensure_database(&record.db).await?;
    Ok(record)
}

/// Restricts the database to the record's user. Passes through.
pub async fn ensure_security(store: &dyn CouchStore, record: UserRecord) -> Result<UserRecord> {
    tracing::info!("Ensuring {} only can read {}", record.name, record.db);

    store
        .apply_security(&record.db, &SecurityPolicy::reader(&record.name))
        .await?;
    Ok(record)
}

/// Opens a backend session with the record's secret and extracts the
/// `AuthSession` token from the session cookie.
pub async fn create_session(store: &dyn CouchStore, mut record: UserRecord) -> Result<UserRecord> {
    tracing::info!("Creating session");

    let secret = record
        .secret
        .clone()
        .ok_or_else(|| Error::SessionCreation("record has no secret".to_string()))?;
    let cookie_header = store.create_session(&record.name, &secret).await?;
    let token = parse_cookie(&cookie_header, AUTH_COOKIE)
        .ok_or_else(|| Error::SessionCreation("no AuthSession cookie in response".to_string()))?;

    record.session_token = Some(token);
    Ok(record)
}

/// Looks up one key in a cookie header: `key=value` pairs separated by
/// `;`, whitespace trimmed. Pairs without `=` (HttpOnly, Secure) are
/// skipped.
fn parse_cookie(header: &str, key: &str) -> Option<String> {
    header.split(';').find_map(|cookie| {
        let (name, value) = cookie.split_once('=')?;
        if name.trim() == key {
            Some(value.trim().to_string())
        } else {
            None
        }
    })
}
