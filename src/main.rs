use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use visuales::app::AppContext;
use visuales::cli::{browse, commands, Cli, Commands, DownloadsAction, FavoritesAction};
use visuales::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(workers) = cli.workers {
        config.search.max_concurrency = workers.max(1);
    }

    let ctx = AppContext::new(config, None)?;

    match cli.command {
        Commands::Categories => {
            commands::list_categories(&ctx)?;
        }
        Commands::Ls { location, json } => {
            commands::list_directory(&ctx, &location, json).await?;
        }
        Commands::Search { query, json } => {
            commands::search(&ctx, &query, json).await?;
        }
        Commands::Download { location, dest } => {
            commands::download(&ctx, &location, dest).await?;
        }
        Commands::DownloadFolder { location, dest } => {
            commands::download_directory(&ctx, &location, dest).await?;
        }
        Commands::Favorites { action } => match action {
            FavoritesAction::List => commands::list_favorites(&ctx)?,
            FavoritesAction::Add { location } => commands::add_favorite(&ctx, &location)?,
            FavoritesAction::Remove { location } => commands::remove_favorite(&ctx, &location)?,
        },
        Commands::History { limit } => {
            commands::list_history(&ctx, limit)?;
        }
        Commands::Downloads { action } => match action {
            DownloadsAction::List => commands::list_downloads(&ctx)?,
            DownloadsAction::Remove { id } => commands::remove_download(&ctx, id)?,
        },
        Commands::SetDownloadPath { dir } => {
            commands::set_download_path(&ctx, &dir)?;
        }
        Commands::Open { location } => {
            commands::open_external(&ctx, &location)?;
        }
        Commands::Browse => {
            browse::run(&ctx).await?;
        }
    }

    Ok(())
}
