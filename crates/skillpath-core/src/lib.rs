//! Skillpath Core: skill graph, prerequisite resolver and seed loading

pub mod model;
pub mod error;
pub mod graph;
pub mod store;
pub mod resolver;
pub mod seed;


#[cfg(test)]
pub mod test_utils;

pub use model::{SkillId, Skill, normalize_skill_name};
pub use error::{GraphError, ResolveError, SeedError};
pub use graph::{SkillGraph, GraphStats};
pub use store::GraphStore;
pub use resolver::{Resolver, PrerequisitesView, RelatedView, LearningPath, SkillListing};
pub use seed::{SeedSet, PrerequisiteSeed, SeedFormat};
