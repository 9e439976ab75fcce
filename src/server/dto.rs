use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub assertion: String,
}

/// Success envelope for a completed sign-in. `db` is the externally
/// reachable URL of the caller's database, routed through the proxy.
#[derive(Debug, Serialize)]
pub struct SignInResponse {
    pub ok: bool,
    pub db: String,
    pub email: String,
    pub name: String,
}
