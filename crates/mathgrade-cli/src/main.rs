//! mathgrade CLI: grade attempt batches and render learning plans.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;
mod config;

#[derive(Parser)]
#[command(
    name = "mathgrade",
    version,
    about = "Grade math assessment attempts and build learning plans"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Grade an attempt batch and write a report
    Grade {
        /// Path to a .json attempt batch
        #[arg(long)]
        input: PathBuf,

        /// Learner grade, e.g. "Grade 4" (overrides the batch and config)
        #[arg(long)]
        grade: Option<String>,

        /// Output directory
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format: json, markdown, all
        #[arg(long)]
        format: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate attempt batch files
    Validate {
        /// Path to attempt batch file or directory
        #[arg(long)]
        input: PathBuf,
    },

    /// Render a saved report
    Show {
        /// Saved report JSON
        #[arg(long)]
        report: PathBuf,

        /// Output format: text, markdown, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Create starter config and example attempt batch
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("mathgrade=info")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Grade {
            input,
            grade,
            output,
            format,
            config,
        } => commands::grade::execute(input, grade, output, format, config),
        Commands::Validate { input } => commands::validate::execute(input),
        Commands::Show { report, format } => commands::show::execute(report, format),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
