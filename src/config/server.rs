use std::net::SocketAddr;
use std::time::Duration;

/// Runtime configuration, assembled from the command line in `main` and
/// passed explicitly to each component at construction.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
    /// Externally reachable URL of this server, e.g. "https://auth.example.com".
    /// Reported back to clients in the sign-in envelope.
    pub host_url: String,
    /// CouchDB base URL, e.g. "http://127.0.0.1:5984".
    pub couch_url: String,
    pub admin_username: String,
    pub admin_password: String,
    /// Bound on every outbound verifier and backend call.
    pub request_timeout: Duration,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.bind, self.port).parse()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 3000,
            host_url: "http://127.0.0.1:3000".to_string(),
            couch_url: "http://127.0.0.1:5984".to_string(),
            admin_username: String::new(),
            admin_password: String::new(),
            request_timeout: Duration::from_secs(30),
        }
    }
}
