//! Published graph snapshots
//!
//! Readers take an `Arc` of the current snapshot and traverse it without any
//! further locking. Writers build a complete replacement off to the side and
//! swap it in, so no reader can see a half-seeded graph or a transient cycle.

use std::sync::{Arc, Mutex, PoisonError, RwLock};

use crate::error::GraphError;
use crate::graph::SkillGraph;

pub struct GraphStore {
    current: RwLock<Arc<SkillGraph>>,
    // Serializes writers; the RwLock is held only for the pointer swap.
    writer: Mutex<()>,
}

impl GraphStore {
    pub fn new(graph: SkillGraph) -> Self {
        GraphStore {
            current: RwLock::new(Arc::new(graph)),
            writer: Mutex::new(()),
        }
    }

    /// The snapshot in effect right now.
    pub fn snapshot(&self) -> Arc<SkillGraph> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Replace the whole graph.
    pub fn publish(&self, graph: SkillGraph) -> Arc<SkillGraph> {
        let _writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let next = Arc::new(graph);
        self.swap(Arc::clone(&next));
        tracing::debug!(
            skills = next.skill_count(),
            edges = next.edge_count(),
            "Published graph snapshot"
        );
        next
    }

    /// Copy-on-write edit. `f` runs against a private copy; the copy is
    /// published only if `f` succeeds. Concurrent edits are serialized, and
    /// readers keep getting the previous snapshot while `f` runs.
    pub fn update<T, F>(&self, f: F) -> Result<T, GraphError>
    where
        F: FnOnce(&mut SkillGraph) -> Result<T, GraphError>,
    {
        let _writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let mut staged = SkillGraph::clone(&self.snapshot());
        let value = f(&mut staged)?;
        self.swap(Arc::new(staged));
        Ok(value)
    }

    fn swap(&self, next: Arc<SkillGraph>) {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *guard = next;
    }
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new(SkillGraph::new())
    }
}

impl std::fmt::Debug for GraphStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphStore")
            .field("current", &self.snapshot())
            .finish()
    }
}
