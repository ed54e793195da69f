// src/cli/mod.rs — CLI definition (clap derive)

pub mod history;
pub mod migrate;
pub mod progress;
pub mod questions;
pub mod results;
pub mod start;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "mockprep", about = "Timed mock interview practice", version)]
pub struct Cli {
    /// Suppress progress output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Config file path
    #[arg(long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run an interactive interview session (default)
    Start(StartArgs),
    /// Show the results of the last completed session
    Results {
        /// Write the report as JSON (defaults to ./interview-results.json)
        #[arg(long)]
        export: Option<Option<PathBuf>>,
    },
    /// List past interviews with dashboard stats
    History {
        /// Only interviews whose title or role contains this text
        #[arg(long)]
        search: Option<String>,
    },
    /// Print the question catalog
    Questions {
        /// Question file (TOML or JSON); the built-in set when omitted
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Only this category (technical, behavioral)
        #[arg(long)]
        category: Option<String>,

        /// Only questions whose prompt or key points contain this text
        #[arg(long)]
        search: Option<String>,
    },
    /// Show or manage database migrations
    Migrate {
        /// Show migration status only
        #[arg(long)]
        status: bool,

        /// Undo the most recent migration
        #[arg(long, conflicts_with = "status")]
        rollback: bool,
    },
}

#[derive(clap::Args, Clone, Debug, Default)]
pub struct StartArgs {
    /// Interview title
    #[arg(long)]
    pub title: Option<String>,

    /// Job role being practised for
    #[arg(long)]
    pub role: Option<String>,

    /// Years of experience (e.g. "1-3 years")
    #[arg(long)]
    pub experience: Option<String>,

    /// Reason for the interview (new-job, practice, upcoming, skills, career-switch)
    #[arg(long)]
    pub reason: Option<String>,

    /// Number of questions to ask
    #[arg(short = 'n', long)]
    pub questions: Option<usize>,

    /// Start with the camera off
    #[arg(long)]
    pub no_camera: bool,

    /// Start with the microphone off
    #[arg(long)]
    pub no_mic: bool,

    /// Question file (TOML or JSON)
    #[arg(long)]
    pub catalog: Option<PathBuf>,
}
