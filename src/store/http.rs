use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode, header};

use super::CouchStore;
use crate::config::ServerConfig;
use crate::error::{Error, Result};
use crate::types::{SecurityPolicy, UserRecord};

/// CouchDB client. Admin credentials are supplied at construction and
/// attached to every administrative request; session creation
/// authenticates with the user's own credentials instead.
pub struct HttpCouchStore {
    client: Client,
    base_url: String,
    username: String,
    password: String,
}

impl HttpCouchStore {
    pub fn new(config: &ServerConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| Error::Config(format!("failed to build couch client: {e}")))?;
        Ok(Self {
            client,
            base_url: config.couch_url.trim_end_matches('/').to_string(),
            username: config.admin_username.clone(),
            password: config.admin_password.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn admin_request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, self.url(path))
            .basic_auth(&self.username, Some(&self.password))
    }
}

/// CouchDB answers `PUT /{db}` with 201 for a fresh database and 412
/// when it already exists; both count as provisioned.
fn database_create_outcome(status: StatusCode) -> Result<()> {
    match status {
        StatusCode::CREATED | StatusCode::PRECONDITION_FAILED => Ok(()),
        other => Err(Error::NamespaceProvision(format!(
            "unexpected status {other}"
        ))),
    }
}

#[async_trait]
impl CouchStore for HttpCouchStore {
    async fn fetch_user(&self, id: &str) -> Result<Option<UserRecord>> {
        let reply = self
            .admin_request(Method::GET, &format!("_users/{id}"))
            .send()
            .await
            .map_err(|e| Error::RecordPersist(e.to_string()))?;

        if reply.status() == StatusCode::OK {
            let record = reply
                .json()
                .await
                .map_err(|e| Error::RecordPersist(e.to_string()))?;
            Ok(Some(record))
        } else {
            Ok(None)
        }
    }

    async fn store_user(&self, record: &UserRecord) -> Result<()> {
        let reply = self
            .admin_request(Method::PUT, &format!("_users/{}", record.id))
            .json(record)
            .send()
            .await
            .map_err(|e| Error::RecordPersist(e.to_string()))?;

        if reply.status().is_success() {
            Ok(())
        } else {
            Err(Error::RecordPersist(format!(
                "unexpected status {}",
                reply.status()
            )))
        }
    }

    async fn ensure_database(&self, name: &str) -> Result<()> {
        let reply = self
            .admin_request(Method::PUT, name)
            .send()
            .await
            .map_err(|e| Error::NamespaceProvision(e.to_string()))?;

        database_create_outcome(reply.status())
    }

    async fn apply_security(&self, name: &str, policy: &SecurityPolicy) -> Result<()> {
        let reply = self
            .admin_request(Method::PUT, &format!("{name}/_security"))
            .json(policy)
            .send()
            .await
            .map_err(|e| Error::PolicyApply(e.to_string()))?;

        if reply.status().is_success() {
            Ok(())
        } else {
            Err(Error::PolicyApply(format!(
                "unexpected status {}",
                reply.status()
            )))
        }
    }

    async fn create_session(&self, name: &str, password: &str) -> Result<String> {
        let reply = self
            .client
            .post(self.url("_session"))
            .form(&[("name", name), ("password", password)])
            .send()
            .await
            .map_err(|e| Error::SessionCreation(e.to_string()))?;

        if reply.status() != StatusCode::OK {
            return Err(Error::SessionCreation(format!(
                "unexpected status {}",
                reply.status()
            )));
        }

        reply
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|value| value.to_str().ok())
            .map(ToString::to_string)
            .ok_or_else(|| Error::SessionCreation("missing Set-Cookie header".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_created_is_success() {
        assert!(database_create_outcome(StatusCode::CREATED).is_ok());
    }

    #[test]
    fn test_database_already_exists_is_success() {
        assert!(database_create_outcome(StatusCode::PRECONDITION_FAILED).is_ok());
    }

    #[test]
    fn test_unexpected_database_status_is_provision_error() {
        let err = database_create_outcome(StatusCode::INTERNAL_SERVER_ERROR).unwrap_err();
        assert!(matches!(err, Error::NamespaceProvision(_)));

        let err = database_create_outcome(StatusCode::UNAUTHORIZED).unwrap_err();
        assert!(matches!(err, Error::NamespaceProvision(_)));
    }
}
