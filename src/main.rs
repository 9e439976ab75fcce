use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use couch_persona::auth::PersonaVerifier;
use couch_persona::config::ServerConfig;
use couch_persona::server::{AppState, create_router};
use couch_persona::store::HttpCouchStore;

#[derive(Parser)]
#[command(name = "couch-persona")]
#[command(about = "Persona sign-in broker for CouchDB", long_about = None)]
struct Cli {
    /// Externally reachable URL of this server (e.g. "https://auth.example.com")
    #[arg(long)]
    host: String,

    /// CouchDB base URL (e.g. "http://127.0.0.1:5984")
    #[arg(long)]
    db: String,

    /// CouchDB admin username
    #[arg(long)]
    username: String,

    /// CouchDB admin password
    #[arg(long)]
    password: String,

    /// Port to listen on
    #[arg(long, short, default_value = "3000")]
    port: u16,

    /// Address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    bind: String,

    /// Outbound request timeout in seconds
    #[arg(long, default_value = "30")]
    timeout: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("couch_persona=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    let config = ServerConfig {
        bind: cli.bind,
        port: cli.port,
        host_url: cli.host,
        couch_url: cli.db,
        admin_username: cli.username,
        admin_password: cli.password,
        request_timeout: Duration::from_secs(cli.timeout),
    };

    let verifier = PersonaVerifier::new(config.request_timeout)?;
    let store = HttpCouchStore::new(&config)?;
    let state = Arc::new(AppState::new(Arc::new(verifier), Arc::new(store), &config)?);

    let app = create_router(state);
    let addr = config.socket_addr()?;

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
