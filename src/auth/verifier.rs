use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::{Error, Result};

/// Default Persona verification endpoint.
pub const VERIFIER_URL: &str = "https://verifier.login.persona.org/verify";

/// Verifies identity assertions against an external verifier.
#[async_trait]
pub trait AssertionVerifier: Send + Sync {
    /// Returns the verified principal (an email address) for an
    /// assertion/audience pair.
    async fn verify(&self, assertion: &str, audience: &str) -> Result<String>;
}

#[derive(Debug, Deserialize)]
struct VerifierReply {
    status: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    reason: Option<String>,
}

impl VerifierReply {
    fn into_principal(self) -> Result<String> {
        if self.status == "okay" {
            if let Some(email) = self.email {
                return Ok(email);
            }
        }
        Err(Error::VerificationFailed(
            self.reason
                .unwrap_or_else(|| "assertion rejected".to_string()),
        ))
    }
}

/// Submits assertions to the Persona verifier over HTTPS.
///
/// A rejected assertion and an unreachable verifier both surface as
/// [`Error::VerificationFailed`]; the reason string keeps the detail
/// apart for diagnostics.
pub struct PersonaVerifier {
    client: reqwest::Client,
    url: String,
}

impl PersonaVerifier {
    pub fn new(timeout: Duration) -> Result<Self> {
        Self::with_url(VERIFIER_URL, timeout)
    }

    /// Points at a different verifier endpoint, e.g. a local stand-in.
    pub fn with_url(url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("failed to build verifier client: {e}")))?;
        Ok(Self {
            client,
            url: url.to_string(),
        })
    }
}

#[async_trait]
impl AssertionVerifier for PersonaVerifier {
    async fn verify(&self, assertion: &str, audience: &str) -> Result<String> {
        tracing::info!("Verifying assertion for audience {audience}");

        let reply: VerifierReply = self
            .client
            .post(&self.url)
            .form(&[("assertion", assertion), ("audience", audience)])
            .send()
            .await
            .map_err(|e| Error::VerificationFailed(e.to_string()))?
            .json()
            .await
            .map_err(|e| Error::VerificationFailed(e.to_string()))?;

        reply.into_principal()
    }
}
