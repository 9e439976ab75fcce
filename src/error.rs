use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("assertion verification failed: {0}")]
    VerificationFailed(String),

    #[error("error persisting user record: {0}")]
    RecordPersist(String),

    #[error("error creating database: {0}")]
    NamespaceProvision(String),

    #[error("error securing database: {0}")]
    PolicyApply(String),

    #[error("error creating session: {0}")]
    SessionCreation(String),

    #[error("upstream request failed: {0}")]
    Proxy(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// Machine-readable code reported in the JSON error body.
    /// Verification failures report the verifier's own reason.
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Error::VerificationFailed(reason) => reason,
            Error::RecordPersist(_) => "error_persisting_user",
            Error::NamespaceProvision(_) => "error_creating_database",
            Error::PolicyApply(_) => "error_securing_database",
            Error::SessionCreation(_) => "error_creating_session",
            Error::Proxy(_) => "bad_gateway",
            Error::Config(_) => "invalid_configuration",
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
