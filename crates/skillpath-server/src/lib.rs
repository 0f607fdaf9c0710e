//! HTTP server exposing the skill graph queries

pub mod error;
pub mod handlers;
pub mod router;

use std::sync::Arc;

use anyhow::Context;
use chrono::{DateTime, Utc};
use skillpath_core::{GraphStore, SkillGraph};
use tracing::{info, warn};

pub use error::ApiError;
pub use router::create_router;

/// Address the server binds to.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

/// State shared by every handler.
pub struct ServerState {
    pub graph: Arc<GraphStore>,
    pub started_at: DateTime<Utc>,
}

impl ServerState {
    pub fn new(graph: SkillGraph) -> Self {
        Self::with_store(Arc::new(GraphStore::new(graph)))
    }

    /// Share an existing store, e.g. with the seed watcher.
    pub fn with_store(graph: Arc<GraphStore>) -> Self {
        ServerState {
            graph,
            started_at: Utc::now(),
        }
    }
}

pub struct SkillpathServer {
    state: Arc<ServerState>,
    config: ServerConfig,
}

impl SkillpathServer {
    pub fn new(graph: SkillGraph, config: ServerConfig) -> Self {
        SkillpathServer {
            state: Arc::new(ServerState::new(graph)),
            config,
        }
    }

    pub fn with_store(graph: Arc<GraphStore>, config: ServerConfig) -> Self {
        SkillpathServer {
            state: Arc::new(ServerState::with_store(graph)),
            config,
        }
    }

    pub fn state(&self) -> Arc<ServerState> {
        Arc::clone(&self.state)
    }

    /// Bind and serve until Ctrl-C.
    pub async fn start(self) -> anyhow::Result<()> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .with_context(|| format!("failed to bind {addr}"))?;
        info!("Skillpath server listening on http://{}", listener.local_addr()?);

        let app = create_router(self.state);
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("server error")?;

        info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
