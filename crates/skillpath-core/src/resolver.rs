//! Read-only queries over a graph snapshot
//!
//! The resolver owns the name-matching contract: raw input is normalized
//! once, blank input is rejected before the graph is consulted, and unknown
//! names come back with suggestions instead of an empty result.

use std::collections::HashSet;

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use serde::{Deserialize, Serialize};

use crate::error::ResolveError;
use crate::graph::{GraphStats, SkillGraph};
use crate::model::{normalize_skill_name, Skill, SkillId};

/// Maximum number of names offered with a `SkillNotFound`.
pub const MAX_SUGGESTIONS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillListing {
    pub skills: Vec<String>,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrerequisitesView {
    pub skill: String,
    pub prerequisites: Vec<String>,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedView {
    pub skill: String,
    pub prerequisites: Vec<String>,
    pub successors: Vec<String>,
    pub all_related: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningPath {
    pub target_skill: String,
    pub learning_path: Vec<String>,
    pub path_length: usize,
    pub message: String,
}

/// Query layer borrowing one snapshot.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'g> {
    graph: &'g SkillGraph,
}

fn skill_names(skills: &[&Skill]) -> Vec<String> {
    skills.iter().map(|s| s.name.clone()).collect()
}

impl<'g> Resolver<'g> {
    pub fn new(graph: &'g SkillGraph) -> Self {
        Resolver { graph }
    }

    /// Resolve raw user input to a skill.
    pub fn resolve(&self, raw: &str) -> Result<&'g Skill, ResolveError> {
        if normalize_skill_name(raw).is_empty() {
            return Err(ResolveError::InvalidInput);
        }
        self.graph
            .lookup(raw)
            .ok_or_else(|| ResolveError::SkillNotFound {
                name: raw.trim().to_string(),
                suggestions: self.suggestions(raw.trim()),
            })
    }

    /// Close matches for an unknown name; falls back to the first seeded
    /// names when nothing scores.
    pub fn suggestions(&self, query: &str) -> Vec<String> {
        let matcher = SkimMatcherV2::default().ignore_case();
        let mut scored: Vec<(i64, &Skill)> = self
            .graph
            .all_skills()
            .filter_map(|skill| matcher.fuzzy_match(&skill.name, query).map(|score| (score, skill)))
            .collect();
        // Stable sort keeps seed order among equal scores.
        scored.sort_by(|a, b| b.0.cmp(&a.0));

        if scored.is_empty() {
            return self
                .graph
                .all_skills()
                .take(MAX_SUGGESTIONS)
                .map(|s| s.name.clone())
                .collect();
        }
        scored
            .into_iter()
            .take(MAX_SUGGESTIONS)
            .map(|(_, s)| s.name.clone())
            .collect()
    }

    pub fn all_skills(&self) -> SkillListing {
        let skills: Vec<String> = self.graph.all_skills().map(|s| s.name.clone()).collect();
        SkillListing {
            count: skills.len(),
            skills,
        }
    }

    pub fn stats(&self) -> GraphStats {
        self.graph.stats()
    }

    /// Direct (one-hop) prerequisites only.
    pub fn prerequisites_of(&self, raw: &str) -> Result<PrerequisitesView, ResolveError> {
        let skill = self.resolve(raw)?;
        let prerequisites = skill_names(&self.graph.direct_predecessors(skill.id));
        Ok(PrerequisitesView {
            skill: skill.name.clone(),
            count: prerequisites.len(),
            prerequisites,
        })
    }

    /// Direct prerequisites and direct successors.
    pub fn related_of(&self, raw: &str) -> Result<RelatedView, ResolveError> {
        let skill = self.resolve(raw)?;
        let prerequisites = skill_names(&self.graph.direct_predecessors(skill.id));
        let successors = skill_names(&self.graph.direct_successors(skill.id));

        let all_related = {
            let mut seen = HashSet::new();
            prerequisites
                .iter()
                .chain(successors.iter())
                .filter(|name| seen.insert(name.as_str()))
                .cloned()
                .collect()
        };

        Ok(RelatedView {
            skill: skill.name.clone(),
            prerequisites,
            successors,
            all_related,
        })
    }

    /// Every transitive prerequisite of the target, each before the skills
    /// that need it, ending with the target.
    pub fn learning_path_to(&self, raw: &str) -> Result<LearningPath, ResolveError> {
        let target = self.resolve(raw)?;
        let order = self.ancestors_post_order(target.id);

        let learning_path: Vec<String> = order
            .iter()
            .filter_map(|&id| self.graph.skill(id))
            .map(|s| s.name.clone())
            .collect();

        let message = if learning_path.len() == 1 {
            format!(
                "'{}' has no prerequisites. You can start learning it directly!",
                target.name
            )
        } else {
            format!(
                "Learn {} skills in order: {}",
                learning_path.len(),
                learning_path.join(" → ")
            )
        };

        Ok(LearningPath {
            target_skill: target.name.clone(),
            path_length: learning_path.len(),
            learning_path,
            message,
        })
    }

    /// Post-order DFS over predecessor edges, rooted at `target`.
    ///
    /// Predecessors are entered in insertion order, so the output is the
    /// same for the same graph. A skill is emitted only once all of its own
    /// predecessors have been.
    fn ancestors_post_order(&self, target: SkillId) -> Vec<SkillId> {
        enum Frame {
            Enter(SkillId),
            Emit(SkillId),
        }

        let mut order = Vec::new();
        let mut visited = HashSet::new();
        let mut stack = vec![Frame::Enter(target)];

        while let Some(frame) = stack.pop() {
            match frame {
                Frame::Emit(id) => order.push(id),
                Frame::Enter(id) => {
                    if !visited.insert(id) {
                        continue;
                    }
                    stack.push(Frame::Emit(id));
                    // Reversed so the first-seeded prerequisite is popped first.
                    for pred in self.graph.direct_predecessors(id).into_iter().rev() {
                        if !visited.contains(&pred.id) {
                            stack.push(Frame::Enter(pred.id));
                        }
                    }
                }
            }
        }

        order
    }
}
