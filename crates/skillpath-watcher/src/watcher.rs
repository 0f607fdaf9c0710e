//! Seed file watcher implementation

use anyhow::{Context, Result};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use skillpath_core::{GraphStore, SeedSet, SkillGraph};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Quiet period after the last change before the seed is reloaded.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(250);

/// Rebuilds the skill graph whenever the seed file changes and publishes
/// the result to the shared store.
///
/// The parent directory is watched rather than the file itself: editors
/// commonly save by writing a temp file and renaming it over the original,
/// which would silently end a watch on the old inode.
pub struct SeedWatcher {
    watcher: RecommendedWatcher,
    event_rx: mpsc::UnboundedReceiver<notify::EventKind>,
    seed_path: PathBuf,
    store: Arc<GraphStore>,
    debounce: Duration,
}

impl SeedWatcher {
    pub fn new(seed_path: impl AsRef<Path>, store: Arc<GraphStore>) -> Result<Self> {
        let seed_path = std::fs::canonicalize(seed_path.as_ref()).with_context(|| {
            format!("cannot watch seed file {}", seed_path.as_ref().display())
        })?;
        let file_name = seed_path
            .file_name()
            .map(OsString::from)
            .with_context(|| format!("seed path has no file name: {}", seed_path.display()))?;

        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
            match res {
                Ok(event) => Self::handle_notify_event(event, &file_name, &event_tx),
                Err(e) => error!("Seed watch error: {}", e),
            }
        })?;

        Ok(Self {
            watcher,
            event_rx,
            seed_path,
            store,
            debounce: DEFAULT_DEBOUNCE,
        })
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn seed_path(&self) -> &Path {
        &self.seed_path
    }

    /// Forward events that touch the seed file.
    fn handle_notify_event(
        event: notify::Event,
        file_name: &OsString,
        event_tx: &mpsc::UnboundedSender<notify::EventKind>,
    ) {
        let relevant = matches!(
            event.kind,
            notify::EventKind::Create(_) | notify::EventKind::Modify(_) | notify::EventKind::Remove(_)
        );
        if !relevant {
            return;
        }
        if event
            .paths
            .iter()
            .any(|p| p.file_name() == Some(file_name.as_os_str()))
        {
            debug!("Seed file event: {:?}", event.kind);
            if let Err(e) = event_tx.send(event.kind) {
                warn!("Failed to forward seed event: {}", e);
            }
        }
    }

    /// Start watching the seed file's directory.
    pub fn start_watching(&mut self) -> Result<()> {
        let dir = self
            .seed_path
            .parent()
            .with_context(|| format!("seed path has no parent: {}", self.seed_path.display()))?
            .to_path_buf();
        self.watcher.watch(&dir, RecursiveMode::NonRecursive)?;
        info!("Watching seed file: {}", self.seed_path.display());
        Ok(())
    }

    /// Load, validate and publish the seed. The store is left untouched on
    /// any failure.
    pub fn reload(&self) -> Result<Arc<SkillGraph>> {
        let seed = SeedSet::from_path(&self.seed_path)?;
        let graph = seed.build()?;
        Ok(self.store.publish(graph))
    }

    /// Process change events until the watcher is dropped.
    pub async fn process_events(mut self) -> Result<()> {
        while let Some(kind) = self.event_rx.recv().await {
            debug!("Seed change detected ({:?}), waiting for writes to settle", kind);

            // Coalesce a burst of events into one reload.
            loop {
                match tokio::time::timeout(self.debounce, self.event_rx.recv()).await {
                    Ok(Some(_)) => continue,
                    Ok(None) => return Ok(()),
                    Err(_) => break,
                }
            }

            match self.reload() {
                Ok(graph) => info!(
                    "Reloaded seed: {} skills, {} prerequisites",
                    graph.skill_count(),
                    graph.edge_count()
                ),
                Err(e) => warn!("Seed reload rejected, keeping current graph: {:#}", e),
            }
        }

        Ok(())
    }
}
