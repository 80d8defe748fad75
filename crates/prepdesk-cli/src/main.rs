//! prepdesk CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "prepdesk", version, about = "Mock-interview practice and scoring")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scripted interview session and print the report
    Run {
        /// Path to a role-bank .toml file or directory
        #[arg(long)]
        bank: PathBuf,

        /// Path to the session script .toml
        #[arg(long)]
        script: PathBuf,

        /// Output directory for the JSON report (omit to skip saving)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Validate role-bank TOML files
    Validate {
        /// Path to a role-bank file or directory
        #[arg(long)]
        bank: PathBuf,
    },

    /// Scan a recorded answer video for quality/anomaly indicators
    Scan {
        /// Path to the stored video file
        #[arg(long)]
        video: PathBuf,
    },

    /// Create a starter role bank and session script
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("prepdesk=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            bank,
            script,
            output,
        } => commands::run::execute(bank, script, output),
        Commands::Validate { bank } => commands::validate::execute(bank),
        Commands::Scan { video } => commands::scan::execute(video),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
