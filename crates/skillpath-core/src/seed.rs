//! Seed sets: the initial skills and prerequisite edges
//!
//! A seed can be written in TOML, JSON or YAML:
//!
//! ```toml
//! skills = ["Git"]
//!
//! [[prerequisites]]
//! skill = "Machine Learning"
//! requires = ["Data Analysis", "Python"]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SeedError;
use crate::graph::SkillGraph;

const BUILTIN_SEED: &str = include_str!("../seeds/career.toml");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedFormat {
    Toml,
    Json,
    Yaml,
}

impl SeedFormat {
    /// Detect the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Some(SeedFormat::Toml),
            Some("json") => Some(SeedFormat::Json),
            Some("yml") | Some("yaml") => Some(SeedFormat::Yaml),
            _ => None,
        }
    }
}

impl std::fmt::Display for SeedFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SeedFormat::Toml => "TOML",
            SeedFormat::Json => "JSON",
            SeedFormat::Yaml => "YAML",
        };
        f.write_str(name)
    }
}

/// One skill and the skills that must be learned before it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PrerequisiteSeed {
    pub skill: String,
    #[serde(default)]
    pub requires: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedSet {
    /// Standalone skills, added first and in this order.
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub prerequisites: Vec<PrerequisiteSeed>,
}

impl SeedSet {
    /// The embedded career-skill seed.
    pub fn builtin() -> Result<Self, SeedError> {
        Self::parse(BUILTIN_SEED, SeedFormat::Toml)
    }

    pub fn parse(contents: &str, format: SeedFormat) -> Result<Self, SeedError> {
        let parsed = match format {
            SeedFormat::Toml => toml::from_str(contents).map_err(|e| e.to_string()),
            SeedFormat::Json => serde_json::from_str(contents).map_err(|e| e.to_string()),
            SeedFormat::Yaml => serde_yaml::from_str(contents).map_err(|e| e.to_string()),
        };
        parsed.map_err(|message| SeedError::Parse { format, message })
    }

    pub fn from_path(path: &Path) -> Result<Self, SeedError> {
        let format = SeedFormat::from_path(path)
            .ok_or_else(|| SeedError::UnsupportedFormat(path.to_path_buf()))?;
        let contents = std::fs::read_to_string(path).map_err(|source| SeedError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let seed = Self::parse(&contents, format)?;
        tracing::debug!("Loaded {} seed from {}", format, path.display());
        Ok(seed)
    }

    /// Build a fresh graph. Any invalid entry aborts the whole build.
    pub fn build(&self) -> Result<SkillGraph, SeedError> {
        let mut graph = SkillGraph::new();

        for name in &self.skills {
            graph.add_skill(name).map_err(|source| SeedError::Graph {
                skill: name.clone(),
                source,
            })?;
        }

        for entry in &self.prerequisites {
            let invalid = |source| SeedError::Graph {
                skill: entry.skill.clone(),
                source,
            };
            graph.add_skill(&entry.skill).map_err(invalid)?;
            for required in &entry.requires {
                graph
                    .ensure_prerequisite(required, &entry.skill)
                    .map_err(invalid)?;
            }
        }

        tracing::info!(
            "Seeded skill graph: {} skills, {} prerequisites",
            graph.skill_count(),
            graph.edge_count()
        );
        Ok(graph)
    }
}
