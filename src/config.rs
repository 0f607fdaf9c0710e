//! Application configuration: `skillpath.toml`, environment, CLI flags

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "skillpath.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub server: ServerSection,
    pub seed: SeedSection,
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerSection {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        ServerSection {
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SeedSection {
    /// Seed file; the built-in career seed is used when unset.
    pub path: Option<PathBuf>,
    /// Reload the seed when the file changes (serve only).
    pub watch: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSection {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingSection {
    fn default() -> Self {
        LoggingSection {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Read the config file. A missing file means defaults unless the path
    /// was given explicitly.
    pub fn load(path: &Path, explicit: bool) -> anyhow::Result<Self> {
        if !path.exists() {
            if explicit {
                bail!("config file not found: {}", path.display());
            }
            return Ok(AppConfig::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let mut config: AppConfig = toml::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;

        // Relative seed paths are relative to the config file.
        if let (Some(seed), Some(dir)) = (config.seed.path.as_mut(), path.parent()) {
            if seed.is_relative() {
                *seed = dir.join(&*seed);
            }
        }
        Ok(config)
    }

    /// Apply `SKILLPATH_*` overrides from the process environment.
    pub fn apply_env(&mut self) -> anyhow::Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    pub fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) -> anyhow::Result<()> {
        if let Some(host) = var("SKILLPATH_HOST") {
            self.server.host = host;
        }
        if let Some(port) = var("SKILLPATH_PORT") {
            self.server.port = port
                .trim()
                .parse()
                .with_context(|| format!("invalid SKILLPATH_PORT: {port}"))?;
        }
        if let Some(seed) = var("SKILLPATH_SEED") {
            self.seed.path = Some(PathBuf::from(seed));
        }
        Ok(())
    }
}
