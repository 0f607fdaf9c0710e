//! Skill graph wrapping petgraph::DiGraph with name-keyed lookup

use std::collections::HashMap;

use petgraph::algo::{has_path_connecting, is_cyclic_directed};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::Serialize;

use crate::error::GraphError;
use crate::model::{normalize_skill_name, Skill, SkillId};

/// The prerequisite graph. An edge `A → B` means A must be learned before B.
///
/// Acyclic at all times: every mutation is validated before it touches the
/// underlying graph, so a rejected call leaves it exactly as it was.
#[derive(Clone, Default)]
pub struct SkillGraph {
    inner: DiGraph<Skill, ()>,
    by_key: HashMap<String, NodeIndex>,
}

/// Structural summary used by health checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GraphStats {
    pub num_skills: usize,
    pub num_relationships: usize,
    pub is_dag: bool,
}

impl std::fmt::Debug for SkillGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SkillGraph")
            .field("skill_count", &self.inner.node_count())
            .field("edge_count", &self.inner.edge_count())
            .finish()
    }
}

fn node_index(id: SkillId) -> NodeIndex {
    NodeIndex::new(id.index())
}

fn skill_id(idx: NodeIndex) -> SkillId {
    SkillId(idx.index() as u32)
}

impl SkillGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a skill, or return the existing one with the same normalized name.
    pub fn add_skill(&mut self, name: &str) -> Result<SkillId, GraphError> {
        let key = normalize_skill_name(name);
        if key.is_empty() {
            return Err(GraphError::InvalidName);
        }
        if let Some(&idx) = self.by_key.get(&key) {
            return Ok(skill_id(idx));
        }

        let id = SkillId(self.inner.node_count() as u32);
        let idx = self.inner.add_node(Skill {
            id,
            name: name.trim().to_string(),
            key: key.clone(),
        });
        debug_assert_eq!(skill_id(idx), id);
        self.by_key.insert(key, idx);
        Ok(id)
    }

    /// Add the edge `from → to`. Returns `false` when the edge already existed.
    pub fn add_prerequisite(&mut self, from: SkillId, to: SkillId) -> Result<bool, GraphError> {
        let from_skill = self
            .skill(from)
            .ok_or_else(|| GraphError::UnknownSkill(from.to_string()))?;
        let to_skill = self
            .skill(to)
            .ok_or_else(|| GraphError::UnknownSkill(to.to_string()))?;

        if from == to {
            return Err(GraphError::InvalidEdge(from_skill.name.clone()));
        }

        let (from_idx, to_idx) = (node_index(from), node_index(to));
        if self.inner.find_edge(from_idx, to_idx).is_some() {
            return Ok(false);
        }

        // `to` reaching `from` already means the new edge would close a loop.
        if has_path_connecting(&self.inner, to_idx, from_idx, None) {
            return Err(GraphError::CycleDetected {
                from: from_skill.name.clone(),
                to: to_skill.name.clone(),
            });
        }

        self.inner.add_edge(from_idx, to_idx, ());
        Ok(true)
    }

    /// Add `prerequisite → skill` where both names must already be present.
    pub fn add_prerequisite_by_name(
        &mut self,
        prerequisite: &str,
        skill: &str,
    ) -> Result<bool, GraphError> {
        let from = self
            .lookup(prerequisite)
            .map(|s| s.id)
            .ok_or_else(|| GraphError::UnknownSkill(prerequisite.trim().to_string()))?;
        let to = self
            .lookup(skill)
            .map(|s| s.id)
            .ok_or_else(|| GraphError::UnknownSkill(skill.trim().to_string()))?;
        self.add_prerequisite(from, to)
    }

    /// Add both skills if needed, then `prerequisite → skill`.
    ///
    /// All-or-nothing: if the edge is rejected, no skill is created either.
    pub fn ensure_prerequisite(
        &mut self,
        prerequisite: &str,
        skill: &str,
    ) -> Result<bool, GraphError> {
        let from_key = normalize_skill_name(prerequisite);
        let to_key = normalize_skill_name(skill);
        if from_key.is_empty() || to_key.is_empty() {
            return Err(GraphError::InvalidName);
        }
        if from_key == to_key {
            return Err(GraphError::InvalidEdge(skill.trim().to_string()));
        }

        let existing = (self.by_key.get(&from_key), self.by_key.get(&to_key));
        if let (Some(&from), Some(&to)) = existing {
            return self.add_prerequisite(skill_id(from), skill_id(to));
        }

        // A freshly added skill has no edges, so the new edge cannot close a loop.
        let from = self.add_skill(prerequisite)?;
        let to = self.add_skill(skill)?;
        self.add_prerequisite(from, to)
    }

    /// Find a skill by raw name (trimmed, case-insensitive).
    pub fn lookup(&self, name: &str) -> Option<&Skill> {
        let key = normalize_skill_name(name);
        self.by_key
            .get(&key)
            .and_then(|&idx| self.inner.node_weight(idx))
    }

    /// Get a skill by id.
    pub fn skill(&self, id: SkillId) -> Option<&Skill> {
        self.inner.node_weight(node_index(id))
    }

    /// Skills with an edge into `id`, in edge insertion order.
    pub fn direct_predecessors(&self, id: SkillId) -> Vec<&Skill> {
        self.neighbors_in_order(id, Direction::Incoming)
    }

    /// Skills with an edge out of `id`, in edge insertion order.
    pub fn direct_successors(&self, id: SkillId) -> Vec<&Skill> {
        self.neighbors_in_order(id, Direction::Outgoing)
    }

    // petgraph walks adjacency newest-first; edge indices restore seed order.
    fn neighbors_in_order(&self, id: SkillId, direction: Direction) -> Vec<&Skill> {
        let idx = node_index(id);
        if self.inner.node_weight(idx).is_none() {
            return Vec::new();
        }

        let mut edges: Vec<_> = self
            .inner
            .edges_directed(idx, direction)
            .map(|edge| {
                let other = match direction {
                    Direction::Incoming => edge.source(),
                    Direction::Outgoing => edge.target(),
                };
                (edge.id(), other)
            })
            .collect();
        edges.sort_by_key(|(edge_id, _)| *edge_id);

        edges
            .into_iter()
            .filter_map(|(_, other)| self.inner.node_weight(other))
            .collect()
    }

    /// All skills in insertion order.
    pub fn all_skills(&self) -> impl Iterator<Item = &Skill> {
        self.inner
            .node_indices()
            .filter_map(move |idx| self.inner.node_weight(idx))
    }

    /// All edges as `(prerequisite, dependent)` in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (&Skill, &Skill)> {
        self.inner.edge_references().filter_map(move |edge| {
            let from = self.inner.node_weight(edge.source())?;
            let to = self.inner.node_weight(edge.target())?;
            Some((from, to))
        })
    }

    pub fn skill_count(&self) -> usize {
        self.inner.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    pub fn stats(&self) -> GraphStats {
        GraphStats {
            num_skills: self.skill_count(),
            num_relationships: self.edge_count(),
            is_dag: !is_cyclic_directed(&self.inner),
        }
    }
}
