//! Booster Hub CLI: browse the booster catalog and create projects from it.
//!
//! The binary is a thin host around the `booster_catalog` engine: it turns
//! flags and environment variables into a [`CatalogConfig`], starts the
//! catalog service (which clones and indexes the catalog before returning),
//! runs one command against the published snapshot and stops.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use booster_catalog::{Booster, CatalogConfig, CatalogService, Mission, Runtime};
use clap::{Parser, Subcommand};
use git_fetcher::GitFetcher;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod errors;
use errors::Error;

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;

/// Booster Hub CLI: create new projects from catalog boosters
#[derive(Parser)]
#[command(name = "booster-hub")]
#[command(about = "Browse the booster catalog and create projects from it", long_about = None)]
struct Cli {
    /// Catalog repository URL (defaults to the public booster catalog)
    #[arg(long, global = true)]
    repository: Option<String>,

    /// Catalog ref to index
    #[arg(long = "ref", global = true)]
    reference: Option<String>,

    /// Directory used as scratch space for catalog and booster checkouts
    #[arg(long, global = true)]
    catalog_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the missions available in the catalog
    Missions,

    /// List the runtimes available for a mission
    Runtimes {
        /// The mission to list runtimes for
        mission: String,
    },

    /// Show the booster for a (mission, runtime) pair
    Show {
        mission: String,
        runtime: String,

        /// Print the full entry as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a new project from a booster's content
    Create {
        mission: String,
        runtime: String,

        /// Directory the project is created in
        #[arg(long)]
        target: PathBuf,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().pretty())
        .with(EnvFilter::from_env("BOOSTER_HUB_LOG"))
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), Error> {
    let catalog_dir = match &cli.catalog_dir {
        Some(dir) => dir.clone(),
        None => std::env::temp_dir().join("booster-hub-catalog"),
    };
    // Scratch space belongs to the host, not the engine.
    std::fs::create_dir_all(&catalog_dir)?;

    let mut config = CatalogConfig::from_env(catalog_dir);
    if let Some(repository) = &cli.repository {
        config = config.with_repository(repository.as_str());
    }
    if let Some(reference) = &cli.reference {
        config = config.with_reference(reference.as_str());
    }
    // One-shot commands never need the background refresh.
    config = config.with_index_period(None);

    let service = CatalogService::start(config, Arc::new(GitFetcher::new())).await?;
    let result = execute(&cli.command, &service).await;
    service.stop().await;
    result
}

async fn execute(command: &Commands, service: &CatalogService) -> Result<(), Error> {
    match command {
        Commands::Missions => {
            for mission in service.missions() {
                println!("{mission}");
            }
            Ok(())
        }
        Commands::Runtimes { mission } => {
            for runtime in service.runtimes(&Mission::new(mission.clone())) {
                println!("{runtime}");
            }
            Ok(())
        }
        Commands::Show {
            mission,
            runtime,
            json,
        } => {
            let booster = lookup(service, mission, runtime)?;
            if *json {
                println!("{}", serde_json::to_string_pretty(&booster)?);
            } else {
                print!("{}", describe_booster(&booster));
            }
            Ok(())
        }
        Commands::Create {
            mission,
            runtime,
            target,
        } => {
            let booster = lookup(service, mission, runtime)?;
            let created = service.copy_to(&booster, target)?;
            println!(
                "Created project from '{}' in {}",
                booster.name(),
                created.display()
            );
            Ok(())
        }
    }
}

fn lookup(service: &CatalogService, mission: &str, runtime: &str) -> Result<Booster, Error> {
    let mission = Mission::new(mission);
    let runtime = Runtime::new(runtime);
    service
        .find_booster(&mission, &runtime)?
        .ok_or_else(|| Error::NoSuchBooster {
            mission: mission.to_string(),
            runtime: runtime.to_string(),
        })
}

fn describe_booster(booster: &Booster) -> String {
    let mut out = String::new();
    out.push_str(&format!("Name:        {}\n", booster.name()));
    out.push_str(&format!("Description: {}\n", booster.description()));
    out.push_str(&format!("Mission:     {}\n", booster.mission()));
    out.push_str(&format!("Runtime:     {}\n", booster.runtime()));
    out.push_str(&format!(
        "Repository:  {} @ {}\n",
        booster.source_repository(),
        booster.source_ref()
    ));
    if let Some(long_description) = booster.long_description() {
        out.push('\n');
        out.push_str(long_description);
        if !long_description.ends_with('\n') {
            out.push('\n');
        }
    }
    out
}
