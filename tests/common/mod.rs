#![allow(dead_code)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use couch_persona::auth::AssertionVerifier;
use couch_persona::error::{Error, Result};
use couch_persona::store::CouchStore;
use couch_persona::types::{SecurityPolicy, UserRecord};

/// Verifier double with a fixed outcome and a call counter.
pub struct StubVerifier {
    outcome: std::result::Result<String, String>,
    pub calls: AtomicUsize,
}

impl StubVerifier {
    pub fn accepting(principal: &str) -> Self {
        Self {
            outcome: Ok(principal.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn rejecting(reason: &str) -> Self {
        Self {
            outcome: Err(reason.to_string()),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl AssertionVerifier for StubVerifier {
    async fn verify(&self, _assertion: &str, _audience: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone().map_err(Error::VerificationFailed)
    }
}

/// Backend double recording every call, with per-step failure switches.
#[derive(Default)]
pub struct StubStore {
    pub existing: Mutex<Option<UserRecord>>,
    pub session_header: Mutex<String>,

    pub fail_store_user: bool,
    pub fail_ensure_database: bool,
    pub fail_apply_security: bool,
    pub fail_create_session: bool,

    pub fetch_calls: AtomicUsize,
    pub store_calls: AtomicUsize,
    pub database_calls: AtomicUsize,
    pub security_calls: AtomicUsize,
    pub session_calls: AtomicUsize,

    pub stored: Mutex<Vec<UserRecord>>,
    pub databases: Mutex<Vec<String>>,
    pub policies: Mutex<Vec<(String, SecurityPolicy)>>,
    pub sessions: Mutex<Vec<(String, String)>>,
}

pub const STUB_SESSION_TOKEN: &str = "dGVzdC1zZXNzaW9u";

impl StubStore {
    pub fn empty() -> Self {
        Self {
            session_header: Mutex::new(format!(
                "AuthSession={STUB_SESSION_TOKEN}; Version=1; Path=/; HttpOnly"
            )),
            ..Self::default()
        }
    }

    pub fn with_existing(record: UserRecord) -> Self {
        let store = Self::empty();
        *store.existing.lock().unwrap() = Some(record);
        store
    }

    pub fn fetches(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn stores(&self) -> usize {
        self.store_calls.load(Ordering::SeqCst)
    }

    pub fn database_creates(&self) -> usize {
        self.database_calls.load(Ordering::SeqCst)
    }

    pub fn security_writes(&self) -> usize {
        self.security_calls.load(Ordering::SeqCst)
    }

    pub fn session_creates(&self) -> usize {
        self.session_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CouchStore for StubStore {
    async fn fetch_user(&self, _id: &str) -> Result<Option<UserRecord>> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.existing.lock().unwrap().clone())
    }

    async fn store_user(&self, record: &UserRecord) -> Result<()> {
        self.store_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_store_user {
            return Err(Error::RecordPersist("stub refused the write".to_string()));
        }
        self.stored.lock().unwrap().push(record.clone());
        Ok(())
    }

    async fn ensure_database(&self, name: &str) -> Result<()> {
        self.database_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_ensure_database {
            return Err(Error::NamespaceProvision(
                "unexpected status 500 Internal Server Error".to_string(),
            ));
        }
        self.databases.lock().unwrap().push(name.to_string());
        Ok(())
    }

    async fn apply_security(&self, name: &str, policy: &SecurityPolicy) -> Result<()> {
        self.security_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_apply_security {
            return Err(Error::PolicyApply(
                "unexpected status 401 Unauthorized".to_string(),
            ));
        }
        self.policies
            .lock()
            .unwrap()
            .push((name.to_string(), policy.clone()));
        Ok(())
    }

    async fn create_session(&self, name: &str, password: &str) -> Result<String> {
        self.session_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_create_session {
            return Err(Error::SessionCreation(
                "unexpected status 401 Unauthorized".to_string(),
            ));
        }
        self.sessions
            .lock()
            .unwrap()
            .push((name.to_string(), password.to_string()));
        Ok(self.session_header.lock().unwrap().clone())
    }
}
