//! Core data structures for the skill graph

use serde::{Deserialize, Serialize};

/// Handle of a skill inside a graph snapshot.
///
/// Ids are dense insertion indices; a snapshot cloned from another keeps
/// every id it inherited valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SkillId(pub u32);

impl SkillId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for SkillId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A learnable competency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub id: SkillId,
    /// Display name as seeded, surrounding whitespace trimmed.
    pub name: String,
    /// Normalized identity key. Two skills are the same iff their keys match.
    pub key: String,
}

/// Normalize a raw skill name into its identity key.
///
/// Trims surrounding whitespace and lowercases. Every lookup and every
/// insertion goes through this function; an empty result means the input
/// was blank.
pub fn normalize_skill_name(raw: &str) -> String {
    raw.trim().to_lowercase()
}
