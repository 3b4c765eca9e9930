use clap::Parser;
use ios_repos::{
    cli::{commands, Cli, Commands},
    github::{GitHubClient, GitHubConfig, GitHubService},
    Result,
};
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if it exists
    let _ = dotenvy::dotenv();

    // Logs go to stderr so command output stays pipeable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,ios_repos=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        error!("{}", e);
        eprintln!("Error: {}", e.log_safe());
        if e.is_retryable() {
            eprintln!("This may be temporary, try again in a moment.");
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Encode { pairs } => commands::encode(&pairs),
        Commands::Decode { query } => commands::decode(&query),
        Commands::List { page } => commands::list(&connect(cli.api_url)?, page).await,
        Commands::Readme { repository } => {
            commands::readme(&connect(cli.api_url)?, &repository).await
        }
    }
}

fn connect(api_url: Option<String>) -> Result<GitHubService> {
    let mut config = GitHubConfig::from_env()?;
    if let Some(url) = api_url {
        config = config.with_base_url(url);
    }

    let client = GitHubClient::new(config)?;
    Ok(GitHubService::spawn(client))
}
