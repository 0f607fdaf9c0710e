//! Test utilities for Skillpath

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use crate::graph::SkillGraph;

/// The four-skill graph used throughout the query tests:
/// `SQL → Data Analysis → Machine Learning ← Python`.
pub fn sample_graph() -> SkillGraph {
    let mut graph = SkillGraph::new();
    graph.ensure_prerequisite("SQL", "Data Analysis").unwrap();
    graph.ensure_prerequisite("Data Analysis", "Machine Learning").unwrap();
    graph.ensure_prerequisite("Python", "Machine Learning").unwrap();
    graph
}

/// A larger graph with shared ancestors and an unrelated component.
pub fn data_science_graph() -> SkillGraph {
    let mut graph = SkillGraph::new();
    for (from, to) in [
        ("Mathematics", "Statistics"),
        ("Mathematics", "Linear Algebra"),
        ("Python", "Data Analysis"),
        ("Statistics", "Data Analysis"),
        ("Statistics", "Machine Learning"),
        ("Linear Algebra", "Machine Learning"),
        ("Python", "Machine Learning"),
        ("Machine Learning", "Deep Learning"),
        ("Linear Algebra", "Deep Learning"),
        ("HTML", "CSS"),
    ] {
        graph.ensure_prerequisite(from, to).unwrap();
    }
    graph
}

/// Write a seed file with the given name and contents into a fresh temp dir.
pub fn write_seed(file_name: &str, contents: &str) -> (TempDir, std::path::PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join(file_name);
    write_file(&path, contents);
    (temp_dir, path)
}

pub fn write_file(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_graph_shape() {
        let graph = sample_graph();
        assert_eq!(graph.skill_count(), 4);
        assert_eq!(graph.edge_count(), 3);
    }

    #[test]
    fn test_write_seed_creates_file() {
        let (_dir, path) = write_seed("nested/seed.toml", "skills = []");
        assert!(path.exists());
    }
}
