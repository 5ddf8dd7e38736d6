use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use newsdesk::cli::{commands, Cli, Commands, ConfigAction};
use newsdesk::config::Config;

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
        config.fetch.workers = workers;
    }

    match cli.command {
        Commands::Fetch(args) => {
            let ctx = commands::fetch_context(config, &args)?;
            commands::fetch_news(&ctx, &args).await?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::show_config(&config)?,
            ConfigAction::Path => commands::show_config_path()?,
        },
    }

    Ok(())
}
