//! REST API handlers for the Skillpath server

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use skillpath_core::{
    GraphStats, LearningPath, PrerequisitesView, RelatedView, Resolver, SkillListing,
};
use tracing::{debug, info};

use crate::{error::ApiError, ServerState};

/// `?skill=` query parameter shared by the lookup endpoints.
///
/// Optional so a missing parameter is reported the same way as a blank one.
#[derive(Debug, Default, Deserialize)]
pub struct SkillQuery {
    pub skill: Option<String>,
}

impl SkillQuery {
    fn raw(&self) -> &str {
        self.skill.as_deref().unwrap_or_default()
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub started_at: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct AddSkillRequest {
    #[serde(default)]
    pub skill: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AddSkillResponse {
    pub success: bool,
    pub skill: String,
    pub message: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct AddPrerequisiteRequest {
    /// The skill that requires the prerequisite.
    #[serde(default)]
    pub skill: String,
    #[serde(default)]
    pub prerequisite: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AddPrerequisiteResponse {
    pub success: bool,
    pub skill: String,
    pub prerequisite: String,
    pub message: String,
}

/// GET /skills/all
pub async fn all_skills(State(state): State<Arc<ServerState>>) -> Json<SkillListing> {
    let graph = state.graph.snapshot();
    Json(Resolver::new(&graph).all_skills())
}

/// GET /skills/graph/related?skill=
pub async fn related_skills(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<SkillQuery>,
) -> Result<Json<RelatedView>, ApiError> {
    let graph = state.graph.snapshot();
    let view = Resolver::new(&graph).related_of(query.raw())?;
    debug!(
        "Related skills for '{}': {} prerequisites, {} successors",
        view.skill,
        view.prerequisites.len(),
        view.successors.len()
    );
    Ok(Json(view))
}

/// GET /skills/graph/prereqs?skill=
pub async fn prerequisites(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<SkillQuery>,
) -> Result<Json<PrerequisitesView>, ApiError> {
    let graph = state.graph.snapshot();
    let view = Resolver::new(&graph).prerequisites_of(query.raw())?;
    debug!("Prerequisites for '{}': {}", view.skill, view.count);
    Ok(Json(view))
}

/// GET /skills/graph/path?skill=
pub async fn learning_path(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<SkillQuery>,
) -> Result<Json<LearningPath>, ApiError> {
    let graph = state.graph.snapshot();
    let path = Resolver::new(&graph).learning_path_to(query.raw())?;
    debug!("Learning path to '{}': {} steps", path.target_skill, path.path_length);
    Ok(Json(path))
}

/// GET /skills/graph/stats
pub async fn graph_stats(State(state): State<Arc<ServerState>>) -> Json<GraphStats> {
    Json(state.graph.snapshot().stats())
}

/// POST /skills/add
pub async fn add_skill(
    State(state): State<Arc<ServerState>>,
    payload: Result<Json<AddSkillRequest>, JsonRejection>,
) -> Result<Json<AddSkillResponse>, ApiError> {
    let Json(request) = payload?;
    let (name, existed) = state.graph.update(|graph| {
        let existed = graph.lookup(&request.skill).is_some();
        let id = graph.add_skill(&request.skill)?;
        let name = graph.skill(id).map(|s| s.name.clone()).unwrap_or_default();
        Ok((name, existed))
    })?;

    let message = if existed {
        format!("Skill '{}' already exists", name)
    } else {
        info!("Added skill '{}'", name);
        format!("Skill '{}' added successfully", name)
    };
    Ok(Json(AddSkillResponse {
        success: true,
        skill: name,
        message,
    }))
}

/// POST /skills/add-prerequisite
///
/// Creates either skill if needed. Rejected with 409 when the edge would
/// make the graph cyclic; the published graph is untouched in that case.
pub async fn add_prerequisite(
    State(state): State<Arc<ServerState>>,
    payload: Result<Json<AddPrerequisiteRequest>, JsonRejection>,
) -> Result<Json<AddPrerequisiteResponse>, ApiError> {
    let Json(request) = payload?;
    let (skill, prerequisite, added) = state.graph.update(|graph| {
        let added = graph.ensure_prerequisite(&request.prerequisite, &request.skill)?;
        let canonical = |raw: &str| {
            graph
                .lookup(raw)
                .map(|s| s.name.clone())
                .unwrap_or_else(|| raw.trim().to_string())
        };
        Ok((canonical(&request.skill), canonical(&request.prerequisite), added))
    })?;

    let message = if added {
        info!("Added prerequisite '{}' → '{}'", prerequisite, skill);
        format!("Prerequisite relationship added: '{}' → '{}'", prerequisite, skill)
    } else {
        format!("Prerequisite relationship already exists: '{}' → '{}'", prerequisite, skill)
    };
    Ok(Json(AddPrerequisiteResponse {
        success: true,
        skill,
        prerequisite,
        message,
    }))
}

/// GET /health
pub async fn health_check(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    let health = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        started_at: state.started_at.to_rfc3339(),
    };
    Json(health)
}
