//! Deterministic identity derivation.
//!
//! Email addresses are not valid CouchDB database names, so the database
//! name is a hash of the principal under a fixed prefix. Both derivations
//! are pure functions of the principal: repeat sign-ins always resolve to
//! the same record and the same database.

use rand::Rng;
use sha2::{Digest, Sha256};

/// Prefix for every provisioned per-user database.
pub const DB_PREFIX: &str = "couch_persona_";

const SECRET_BYTES: usize = 16;

/// `_users` document id for a principal.
#[must_use]
pub fn record_id(principal: &str) -> String {
    format!("org.couchdb.user:{}", urlencoding::encode(principal))
}

/// Database name for a principal: the fixed prefix plus the hex SHA-256
/// of the principal string. Lowercase hex keeps the name valid under
/// CouchDB naming rules.
#[must_use]
pub fn database_name(principal: &str) -> String {
    let digest = Sha256::digest(principal.as_bytes());
    format!("{DB_PREFIX}{}", hex::encode(digest))
}

/// Generates a cryptographically random hex secret for a fresh record.
#[must_use]
pub fn generate_secret() -> String {
    let mut bytes = [0u8; SECRET_BYTES];
    rand::thread_rng().fill(&mut bytes);
    hex::encode(bytes)
}
