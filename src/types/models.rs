use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::identity;

/// Marker role identifying records provisioned through BrowserID sign-in.
pub const BROWSERID_ROLE: &str = "browserid";

/// A CouchDB `_users` document for a Persona-verified identity.
///
/// Unknown fields are captured in `extra` so CouchDB bookkeeping
/// (`password_scheme`, `derived_key`, `salt`, ...) and anything an
/// administrator added out-of-band survive a read-modify-write cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_rev", default, skip_serializing_if = "Option::is_none")]
    pub rev: Option<String>,
    #[serde(rename = "type")]
    pub doc_type: String,
    pub name: String,
    pub roles: Vec<String>,
    pub db: String,
    /// Write-only: CouchDB hashes this server-side on PUT and strips it
    /// from the stored document. Set only when a fresh secret is minted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Durable credential secret, generated on first creation and reused
    /// by every later sign-in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
    /// Session cookie value for the current sign-in. Never persisted.
    #[serde(skip)]
    pub session_token: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserRecord {
    /// Skeleton record for a principal. Every field is a pure function
    /// of the principal; no secret is assigned here.
    #[must_use]
    pub fn for_principal(principal: &str) -> Self {
        Self {
            id: identity::record_id(principal),
            rev: None,
            doc_type: "user".to_string(),
            name: principal.to_string(),
            roles: vec![BROWSERID_ROLE.to_string()],
            db: identity::database_name(principal),
            password: None,
            secret: None,
            session_token: None,
            extra: Map::new(),
        }
    }
}

/// A CouchDB `_security` name/role list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameList {
    pub names: Vec<String>,
    pub roles: Vec<String>,
}

/// The `_security` object written onto a provisioned database.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityPolicy {
    pub admins: NameList,
    pub readers: NameList,
}

impl SecurityPolicy {
    /// Policy granting read access to exactly one user and admin access
    /// to nobody.
    #[must_use]
    pub fn reader(name: &str) -> Self {
        Self {
            admins: NameList::default(),
            readers: NameList {
                names: vec![name.to_string()],
                roles: Vec::new(),
            },
        }
    }
}
