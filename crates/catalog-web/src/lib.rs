//! catalog-web - HTTP API for catalog using Axum

pub mod error;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::create_router;
pub use state::AppState;

use anyhow::Result;
use catalog_core::ItemStore;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing::info;

/// Configuration for the API server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Location of the JSON item store
    pub data_path: PathBuf,

    /// Address to bind
    pub host: IpAddr,

    /// Port to bind
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data/items.json"),
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 3008,
        }
    }
}

impl ServerConfig {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Run the API server until the process is stopped
pub async fn run(config: ServerConfig) -> Result<()> {
    let store = ItemStore::new(config.data_path.clone());
    store.ensure_exists().await?;

    let router = create_router(AppState::new(store));

    let addr = config.addr();
    let listener = TcpListener::bind(addr).await?;

    info!(data = %config.data_path.display(), "Web server listening on http://{}", addr);

    axum::serve(listener, router).await?;

    Ok(())
}
