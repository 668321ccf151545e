mod poller;

use clap::{Args, Parser, Subcommand};
use hwbot_channels::telegram::TelegramNotifier;
use hwbot_core::{
    config::{self, redact, Config, Credentials},
    dedup::DedupPolicy,
};
use hwbot_practicum::PracticumClient;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "homework-bot",
    version,
    about = "Forwards homework review status changes to Telegram"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file.
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: String,

    #[command(flatten)]
    secrets: SecretArgs,
}

/// Secrets, normally supplied through the environment or a `.env` file.
#[derive(Args)]
struct SecretArgs {
    /// OAuth token for the homework status API.
    #[arg(long, env = "PRACTICUM_TOKEN", hide_env_values = true, global = true)]
    practicum_token: Option<String>,

    /// Telegram bot token.
    #[arg(long, env = "TELEGRAM_TOKEN", hide_env_values = true, global = true)]
    telegram_token: Option<String>,

    /// Telegram chat that receives notifications.
    #[arg(long, env = "TELEGRAM_CHAT_ID", global = true)]
    telegram_chat_id: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start polling and notifying. Runs until the process is stopped.
    Start,
    /// Validate credentials and print the effective configuration.
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Seed the environment before clap reads `env = ...` arguments.
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let cfg = config::load(&cli.config)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.bot.log_level)),
        )
        .init();
    info!("{}", config_source_notice(&cli.config));

    let SecretArgs {
        practicum_token,
        telegram_token,
        telegram_chat_id,
    } = cli.secrets;
    let creds = Credentials::new(practicum_token, telegram_token, telegram_chat_id)?;

    match cli.command {
        Commands::Start => start(cfg, creds).await,
        Commands::Check => {
            print_check(&cli.config, &cfg, &creds);
            Ok(())
        }
    }
}

async fn start(cfg: Config, creds: Credentials) -> anyhow::Result<()> {
    let source = PracticumClient::from_config(
        cfg.poller.endpoint.clone(),
        creds.practicum_token.clone(),
        cfg.poller.request_timeout(),
    );
    let notifier = TelegramNotifier::with_api_base(&cfg.telegram.api_base, &creds.telegram_token);

    info!("homework-bot starting");
    let poll = poller::PollLoop::new(
        Arc::new(source),
        Arc::new(notifier),
        creds.telegram_chat_id,
        cfg.poller.retry_period(),
        DedupPolicy::from_flag(cfg.poller.dedupe),
        chrono::Utc::now().timestamp(),
    );
    poll.run().await;

    Ok(())
}

/// Describe where the effective configuration came from.
fn config_source_notice(config_path: &str) -> String {
    if Path::new(config_path).exists() {
        format!("Loaded config from {config_path}")
    } else {
        format!("Config file not found at {config_path}, using defaults")
    }
}

fn print_check(config_path: &str, cfg: &Config, creds: &Credentials) {
    println!("homework-bot — configuration check\n");
    println!("Config: {config_path}");
    println!("Endpoint: {}", cfg.poller.endpoint);
    println!("Retry period: {}s", cfg.poller.retry_period_secs);
    println!("Request timeout: {}s", cfg.poller.request_timeout_secs);
    println!(
        "Duplicate suppression: {}",
        if cfg.poller.dedupe { "on" } else { "off" }
    );
    println!("Telegram API: {}", cfg.telegram.api_base);
    println!();
    println!("  PRACTICUM_TOKEN: {}", redact(&creds.practicum_token));
    println!("  TELEGRAM_TOKEN: {}", redact(&creds.telegram_token));
    println!("  TELEGRAM_CHAT_ID: {}", creds.telegram_chat_id);
}
