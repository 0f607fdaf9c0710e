//! Error taxonomy for graph construction, queries and seeding

use std::path::PathBuf;

use thiserror::Error;

use crate::seed::SeedFormat;

/// Invariant violations raised while building or editing the graph.
///
/// A failed mutation never leaves the graph partially modified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("skill name cannot be empty or whitespace only")]
    InvalidName,

    #[error("unknown skill '{0}'")]
    UnknownSkill(String),

    #[error("a skill cannot be a prerequisite of itself: '{0}'")]
    InvalidEdge(String),

    #[error(
        "adding prerequisite '{from}' → '{to}' would create a circular dependency; \
         '{to}' already leads to '{from}'"
    )]
    CycleDetected { from: String, to: String },
}

/// Failures of the read-only query operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("skill parameter cannot be empty")]
    InvalidInput,

    #[error("skill '{name}' not found")]
    SkillNotFound {
        name: String,
        /// Close or available names, best first.
        suggestions: Vec<String>,
    },
}

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read seed file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {format} seed: {message}")]
    Parse { format: SeedFormat, message: String },

    #[error("unsupported seed file extension: {0}")]
    UnsupportedFormat(PathBuf),

    #[error("invalid seed entry for '{skill}': {source}")]
    Graph {
        skill: String,
        #[source]
        source: GraphError,
    },
}
