//! Skillpath CLI entry point

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;

use config::{AppConfig, LoggingSection, DEFAULT_CONFIG_FILE};

#[derive(Parser)]
#[command(name = "skillpath")]
#[command(about = "Skill prerequisites and learning paths", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to ./skillpath.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Seed file (TOML, JSON or YAML); overrides the config file
    #[arg(long, global = true)]
    seed: Option<PathBuf>,

    /// Print query results as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Reload the graph when the seed file changes
        #[arg(short, long)]
        watch: bool,
    },
    /// Ordered learning path to a skill
    Path { skill: String },
    /// Direct prerequisites of a skill
    Prereqs { skill: String },
    /// Direct prerequisites and successors of a skill
    Related { skill: String },
    /// List every skill
    List,
    /// Graph statistics
    Stats,
    /// Validate the seed and exit
    Check,
    /// Show version
    Version,
}

fn init_logging(verbose: bool, logging: &LoggingSection) {
    let level = if verbose { "debug" } else { logging.level.as_str() };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!(
            "skillpath={level},skillpath_core={level},skillpath_server={level},\
             skillpath_watcher={level},tower_http={level}"
        ))
    });

    // Logs go to stderr so query output on stdout stays pipeable.
    let registry = tracing_subscriber::registry().with(filter);
    if logging.json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

/// Load `.env`, the config file and `SKILLPATH_*` overrides, then start logging.
fn bootstrap(verbose: bool, config: Option<&Path>, seed: Option<PathBuf>) -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();
    let config_path = config.unwrap_or(Path::new(DEFAULT_CONFIG_FILE));
    let mut app = AppConfig::load(config_path, config.is_some())?;
    app.apply_env()?;
    if let Some(seed) = seed {
        app.seed.path = Some(seed);
    }

    init_logging(verbose, &app.logging);
    tracing::debug!("Skillpath v{}", env!("CARGO_PKG_VERSION"));
    Ok(app)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let Cli {
        command,
        verbose,
        config,
        seed,
        json,
    } = Cli::parse();
    let settings = || bootstrap(verbose, config.as_deref(), seed.clone());

    match command {
        Commands::Version => {
            println!("Skillpath v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::Serve { port, host, watch } => {
            let mut app = settings()?;
            if let Some(port) = port {
                app.server.port = port;
            }
            if let Some(host) = host {
                app.server.host = host;
            }
            app.seed.watch |= watch;
            commands::serve(app).await
        }
        Commands::Path { skill } => commands::path(&settings()?, &skill, json),
        Commands::Prereqs { skill } => commands::prereqs(&settings()?, &skill, json),
        Commands::Related { skill } => commands::related(&settings()?, &skill, json),
        Commands::List => commands::list(&settings()?, json),
        Commands::Stats => commands::stats(&settings()?, json),
        Commands::Check => commands::check(&settings()?),
    }
}
