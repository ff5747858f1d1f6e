//! vitrine: 3D model showcase
//!
//! Usage:
//!   vitrine list                 # Print the project gallery
//!   vitrine view [ID]            # Open the showcase window, optionally on a project
//!   vitrine --config viewer.ron  # Override viewer settings

mod app;
mod input;
mod logging;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use vitrine_core::ProjectRegistry;
use vitrine_viewer::ViewerConfig;

use crate::logging::{init_logging, LoggingConfig};

#[derive(Parser)]
#[command(name = "vitrine")]
#[command(about = "Interactive showcase of 3D model projects")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// RON file with viewer settings
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory that model paths are resolved against
    #[arg(long, global = true)]
    assets: Option<PathBuf>,

    /// Debug logging for vitrine crates
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the project gallery
    List,
    /// Open the showcase window
    View {
        /// Project to open right away
        id: Option<u32>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(LoggingConfig::from_verbosity(cli.verbose));

    let mut config = match &cli.config {
        Some(path) => ViewerConfig::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => ViewerConfig::default(),
    };
    if let Some(assets) = cli.assets {
        config.asset_root = assets;
    }

    match cli.command {
        Some(Commands::List) => {
            list_projects(&config);
            Ok(())
        }
        Some(Commands::View { id }) => app::run(config, id),
        None => app::run(config, None),
    }
}

fn list_projects(config: &ViewerConfig) {
    for project in ProjectRegistry::builtin() {
        let model = project
            .model_path
            .map(|p| config.resolve_asset(p).display().to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:>3}  {:<24} {:<40} {} -> {}  {}",
            project.id, project.title, project.description, project.accent.from, project.accent.to, model
        );
    }
}
