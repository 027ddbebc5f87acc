mod commands;
mod control;
mod error;
mod extract;
mod index;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;

#[derive(Parser)]
#[command(name = "ipkdex")]
#[command(author, version, about = "Fast .ipk package metadata extractor and index generator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a package's index entry
    Info {
        /// Path to the .ipk archive
        package: PathBuf,

        /// Output the full record as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the raw control file from a package
    Control {
        /// Path to the .ipk archive
        package: PathBuf,
    },

    /// Build a Packages index from a directory of .ipk files
    Index {
        /// Directory to scan for packages
        dir: PathBuf,

        /// Write the index to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging; logs go to stderr so `index` output stays pipeable
    let default_filter = if cli.verbose { "ipkdex=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(Commands::Info { package, json }) => {
            commands::info(&package, json)?;
        }
        Some(Commands::Control { package }) => {
            commands::cat_control(&package)?;
        }
        Some(Commands::Index { dir, output }) => {
            commands::index(&dir, output.as_deref())?;
        }
        None => {
            println!("ipkdex - extract .ipk metadata and build package indexes");
            println!("\nRun {} to see available commands.", "ipkdex --help".cyan());
        }
    }

    Ok(())
}
