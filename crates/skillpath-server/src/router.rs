//! Axum router setup for the Skillpath server

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{
        add_prerequisite, add_skill, all_skills, graph_stats, health_check, learning_path,
        prerequisites, related_skills,
    },
    ServerState,
};

/// Create the axum router with all routes
pub fn create_router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        // Read-only graph queries
        .route("/skills/all", get(all_skills))
        .route("/skills/graph/related", get(related_skills))
        .route("/skills/graph/prereqs", get(prerequisites))
        .route("/skills/graph/path", get(learning_path))
        .route("/skills/graph/stats", get(graph_stats))
        // Graph edits
        .route("/skills/add", post(add_skill))
        .route("/skills/add-prerequisite", post(add_prerequisite))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
