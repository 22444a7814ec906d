//! Facade CLI - static export of the marketing site.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod config;
mod site;

#[derive(Parser)]
#[command(name = "facade")]
#[command(about = "Static marketing site built from design-system components")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to facade.toml config file
    #[arg(short, long, default_value = "facade.toml")]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Export every route as static HTML
    Build {
        /// Output directory (defaults to config or "out")
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip stylesheet minification
        #[arg(long)]
        no_minify: bool,

        /// Write <route>.html instead of <route>/index.html
        #[arg(long)]
        flat: bool,

        /// Remove the output directory first
        #[arg(long)]
        clean: bool,
    },

    /// List routes and the files they export to
    Routes,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    match cli.command {
        Commands::Build {
            output,
            no_minify,
            flat,
            clean,
        } => {
            let overrides = commands::build::Overrides {
                output,
                minify: no_minify.then_some(false),
                trailing_slash: flat.then_some(false),
                clean: clean.then_some(true),
            };
            commands::build::run(&cli.config, overrides)?;
        }
        Commands::Routes => {
            commands::routes::run(&cli.config)?;
        }
    }

    Ok(())
}
