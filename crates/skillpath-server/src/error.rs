//! API error type mapping library errors to HTTP status codes

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;
use skillpath_core::{GraphError, ResolveError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Missing or blank input, or a request body that is not the expected JSON.
    InvalidInput(String),
    /// No skill matches; carries names the caller might have meant.
    NotFound { detail: String, suggestions: Vec<String> },
    /// The edit would break the acyclic invariant.
    Conflict(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    detail: &'a str,
    #[serde(skip_serializing_if = "no_suggestions")]
    suggestions: &'a [String],
}

fn no_suggestions(suggestions: &&[String]) -> bool {
    suggestions.is_empty()
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
        }
    }

    pub fn detail(&self) -> &str {
        match self {
            ApiError::InvalidInput(detail)
            | ApiError::NotFound { detail, .. }
            | ApiError::Conflict(detail) => detail,
        }
    }
}

impl From<ResolveError> for ApiError {
    fn from(e: ResolveError) -> Self {
        match e {
            ResolveError::InvalidInput => ApiError::InvalidInput(e.to_string()),
            ResolveError::SkillNotFound { ref suggestions, .. } => ApiError::NotFound {
                detail: e.to_string(),
                suggestions: suggestions.clone(),
            },
        }
    }
}

impl From<GraphError> for ApiError {
    fn from(e: GraphError) -> Self {
        match e {
            GraphError::InvalidName | GraphError::InvalidEdge(_) => {
                ApiError::InvalidInput(e.to_string())
            }
            GraphError::UnknownSkill(_) => ApiError::NotFound {
                detail: e.to_string(),
                suggestions: Vec::new(),
            },
            GraphError::CycleDetected { .. } => ApiError::Conflict(e.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidInput(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::debug!(status = status.as_u16(), "{}", self.detail());

        let suggestions: &[String] = match &self {
            ApiError::NotFound { suggestions, .. } => suggestions.as_slice(),
            _ => &[],
        };
        let body = ErrorBody {
            detail: self.detail(),
            suggestions,
        };
        (status, Json(body)).into_response()
    }
}
