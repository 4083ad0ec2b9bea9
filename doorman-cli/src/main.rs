use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{info, Level};

use doorman_cli::config::{Config, EventPayload};
use doorman_cli::event_handler;
use doorman_cli::github::GitHubClient;
use doorman_cli::scanner;
use doorman_core::JoinConfig;

/// Doorman: automates org membership requests filed as issues
#[derive(Parser, Debug)]
#[command(name = "doorman")]
#[command(about = "GitHub org membership request bot", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Handle one issue event (run by the workflow on issue triggers)
    Event,
    /// Sweep all open join-request issues (run on a schedule)
    Scan,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let cli = Cli::parse();

    let config = Config::from_env()?;
    let join_config = JoinConfig::load(&config.config_path)?;
    let org = config.resolve_org(&join_config)?;
    let client = GitHubClient::new(config.token.clone());

    match cli.command {
        Commands::Event => {
            let payload = EventPayload::from_env()?;
            info!(
                "handling {}/{} event for issue #{}",
                payload.event_name, payload.event_action, payload.issue_number
            );
            event_handler::handle_event(&client, &join_config, &org, &config.repo, &payload).await
        }
        Commands::Scan => {
            info!("starting join-request scan for {}", config.repo);
            scanner::scan(&client, &join_config, &org, &config.repo).await
        }
    }
}
