// src/main.rs — mockprep entry point

use clap::Parser;

use mockprep::cli::{Cli, Commands, StartArgs};
use mockprep::infra::config::Config;
use mockprep::infra::{logger, paths};

#[tokio::main]
async fn main() {
    // Initialize logging (respects RUST_LOG)
    logger::init_logging("warn");

    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load config (falls back to defaults if no config.toml)
    let config = if let Some(ref path) = cli.config {
        Config::load_from(std::path::Path::new(path))?
    } else {
        Config::load()?
    };

    match cli.command {
        Some(Commands::Start(args)) => {
            mockprep::cli::start::run_start(args, &config, cli.quiet).await
        }
        Some(Commands::Results { export }) => {
            let export = export.map(|path| path.unwrap_or_else(paths::default_export_path));
            mockprep::cli::results::show_results(&config, export.as_deref())
        }
        Some(Commands::History { search }) => {
            mockprep::cli::history::show_history(&config, search.as_deref())
        }
        Some(Commands::Questions {
            catalog,
            category,
            search,
        }) => mockprep::cli::questions::list_questions(
            &config,
            catalog.as_deref(),
            category.as_deref(),
            search.as_deref(),
        ),
        Some(Commands::Migrate { status, rollback }) => {
            mockprep::cli::migrate::run_migrate(&config, status, rollback)
        }
        None => mockprep::cli::start::run_start(StartArgs::default(), &config, cli.quiet).await,
    }
}
