//! # couch-persona
//!
//! Sign in with a Mozilla Persona (BrowserID) assertion and get a CouchDB
//! database of your own.
//!
//! The crate verifies an assertion against the Persona verifier, provisions
//! a CouchDB `_users` record and a dedicated per-user database, restricts
//! that database to the signed-in user, and hands back a CouchDB session
//! cookie. The whole sequence runs as one fail-fast pipeline; see
//! [`signin::sign_in`].
//!
//! Usable both as a standalone binary and as a library:
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use couch_persona::auth::PersonaVerifier;
//! use couch_persona::config::ServerConfig;
//! use couch_persona::server::{AppState, create_router};
//! use couch_persona::store::HttpCouchStore;
//!
//! let config = ServerConfig::default();
//! let state = Arc::new(AppState::new(
//!     Arc::new(PersonaVerifier::new(config.request_timeout).unwrap()),
//!     Arc::new(HttpCouchStore::new(&config).unwrap()),
//!     &config,
//! ).unwrap());
//! let router = create_router(state);
//! // Serve with axum...
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod identity;
pub mod server;
pub mod signin;
pub mod store;
pub mod types;
