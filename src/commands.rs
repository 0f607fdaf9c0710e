//! CLI command implementations

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use serde::Serialize;
use skillpath_core::{
    GraphStats, GraphStore, LearningPath, PrerequisitesView, RelatedView, ResolveError, Resolver,
    SeedSet, SkillGraph, SkillListing,
};
use skillpath_server::{ServerConfig, SkillpathServer};
use skillpath_watcher::SeedWatcher;

use crate::config::AppConfig;

/// Build the graph from a seed file, or the built-in seed when none is set.
pub fn load_graph(seed: Option<&Path>) -> anyhow::Result<SkillGraph> {
    let set = match seed {
        Some(path) => SeedSet::from_path(path)?,
        None => SeedSet::builtin().context("built-in seed is invalid")?,
    };
    Ok(set.build()?)
}

pub async fn serve(config: AppConfig) -> anyhow::Result<()> {
    let seed_path = config.seed.path.as_deref();
    let graph = load_graph(seed_path)?;
    let stats = graph.stats();
    tracing::info!(
        "Loaded {} skills, {} prerequisites",
        stats.num_skills,
        stats.num_relationships
    );

    let store = Arc::new(GraphStore::new(graph));

    if config.seed.watch {
        match seed_path {
            Some(path) => {
                let mut watcher = SeedWatcher::new(path, Arc::clone(&store))?;
                watcher.start_watching()?;
                tokio::spawn(async move {
                    if let Err(e) = watcher.process_events().await {
                        tracing::error!("Seed watcher error: {:#}", e);
                    }
                });
            }
            None => tracing::warn!("--watch has no effect with the built-in seed"),
        }
    }

    let server_config = ServerConfig {
        host: config.server.host,
        port: config.server.port,
    };
    SkillpathServer::with_store(store, server_config).start().await
}

pub fn path(config: &AppConfig, skill: &str, json: bool) -> anyhow::Result<()> {
    let graph = load_graph(config.seed.path.as_deref())?;
    let view = Resolver::new(&graph).learning_path_to(skill).map_err(not_found)?;
    emit(&view, json, render_path)
}

pub fn prereqs(config: &AppConfig, skill: &str, json: bool) -> anyhow::Result<()> {
    let graph = load_graph(config.seed.path.as_deref())?;
    let view = Resolver::new(&graph).prerequisites_of(skill).map_err(not_found)?;
    emit(&view, json, render_prereqs)
}

pub fn related(config: &AppConfig, skill: &str, json: bool) -> anyhow::Result<()> {
    let graph = load_graph(config.seed.path.as_deref())?;
    let view = Resolver::new(&graph).related_of(skill).map_err(not_found)?;
    emit(&view, json, render_related)
}

pub fn list(config: &AppConfig, json: bool) -> anyhow::Result<()> {
    let graph = load_graph(config.seed.path.as_deref())?;
    let listing = Resolver::new(&graph).all_skills();
    emit(&listing, json, render_listing)
}

pub fn stats(config: &AppConfig, json: bool) -> anyhow::Result<()> {
    let graph = load_graph(config.seed.path.as_deref())?;
    let stats = graph.stats();
    emit(&stats, json, render_stats)
}

/// Load and validate the seed without serving it.
pub fn check(config: &AppConfig) -> anyhow::Result<()> {
    let source = match config.seed.path.as_deref() {
        Some(path) => path.display().to_string(),
        None => "built-in seed".to_string(),
    };
    let graph = load_graph(config.seed.path.as_deref())
        .with_context(|| format!("{source} failed validation"))?;
    println!(
        "{source}: OK ({} skills, {} prerequisites)",
        graph.skill_count(),
        graph.edge_count()
    );
    Ok(())
}

fn emit<T: Serialize>(value: &T, json: bool, render: fn(&T) -> String) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{}", render(value));
    }
    Ok(())
}

fn not_found(err: ResolveError) -> anyhow::Error {
    match &err {
        ResolveError::SkillNotFound { suggestions, .. } if !suggestions.is_empty() => {
            anyhow::anyhow!("{err}. Did you mean: {}?", suggestions.join(", "))
        }
        _ => anyhow::Error::new(err),
    }
}

fn render_path(view: &LearningPath) -> String {
    let mut out = view.message.clone();
    if view.path_length > 1 {
        for (step, name) in view.learning_path.iter().enumerate() {
            out.push_str(&format!("\n  {}. {}", step + 1, name));
        }
    }
    out
}

fn render_prereqs(view: &PrerequisitesView) -> String {
    if view.prerequisites.is_empty() {
        return format!("{} has no prerequisites", view.skill);
    }
    let mut out = format!("{} requires:", view.skill);
    for name in &view.prerequisites {
        out.push_str(&format!("\n  - {name}"));
    }
    out
}

fn render_related(view: &RelatedView) -> String {
    let none = || "(none)".to_string();
    let join = |names: &[String]| {
        if names.is_empty() {
            none()
        } else {
            names.join(", ")
        }
    };
    format!(
        "{}\n  prerequisites: {}\n  leads to:      {}",
        view.skill,
        join(&view.prerequisites),
        join(&view.successors)
    )
}

fn render_listing(listing: &SkillListing) -> String {
    let mut out = format!("{} skills", listing.count);
    for name in &listing.skills {
        out.push_str(&format!("\n  {name}"));
    }
    out
}

fn render_stats(stats: &GraphStats) -> String {
    format!(
        "skills:        {}\nprerequisites: {}\nacyclic:       {}",
        stats.num_skills, stats.num_relationships, stats.is_dag
    )
}
