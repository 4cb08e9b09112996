//! Status Dispatcher Binary

use clap::Parser;
use status_dispatcher::{
    fetch_host_page, Command, Config, DirectFetcher, Dispatcher, ProberClient, Result,
    StatusBoard,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Check configured services from this machine and from the status API
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Base URL of the status check API
    #[arg(long)]
    api_url: Option<String>,

    /// Timeout in seconds of the client-side fetch
    #[arg(long)]
    client_timeout: Option<u64>,

    /// Admin key; grants the check-all command
    #[arg(long, env = "ADMIN_KEY", hide_env_values = true)]
    admin_key: Option<String>,

    /// Row to check, may be repeated
    #[arg(long = "row")]
    rows: Vec<usize>,

    /// Check every service at once
    #[arg(long)]
    all: bool,
}

#[tokio::main]
async fn main() {
    initialize_tracing();

    let args = Args::parse();
    let config = merge_config(Config::from_env(), &args);

    if let Err(e) = config.validate() {
        error!("Configuration validation failed: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(config, args).await {
        error!("Status dispatcher failed: {}", e);
        std::process::exit(1);
    }
}

fn merge_config(mut config: Config, args: &Args) -> Config {
    if let Some(api_url) = &args.api_url {
        config.api_url = api_url.clone();
    }
    if let Some(seconds) = args.client_timeout {
        config.client_timeout = Some(Duration::from_secs(seconds));
    }
    if args.admin_key.is_some() {
        config.admin_key = args.admin_key.clone();
    }
    config
}

async fn run(config: Config, args: Args) -> Result<()> {
    info!("Starting status dispatcher v{}", env!("CARGO_PKG_VERSION"));

    let page = fetch_host_page(
        &config.api_url,
        config.admin_key.as_deref(),
        config.server_timeout,
    )
    .await?;

    let board = StatusBoard::new(page.services.len(), page.privileged);
    let dispatcher = Dispatcher::new(
        page.services.clone(),
        Arc::new(board.clone()),
        Arc::new(DirectFetcher::new(config.client_timeout)?),
        Arc::new(ProberClient::new(
            page.ajax_url.clone(),
            page.nonce.clone(),
            config.server_timeout,
        )?),
        page.privileged,
    );

    let commands: Vec<Command> = if args.all {
        vec![Command::CheckAll]
    } else if args.rows.is_empty() {
        (0..page.services.len()).map(Command::CheckOne).collect()
    } else {
        args.rows.iter().copied().map(Command::CheckOne).collect()
    };

    let results = futures::future::join_all(commands.iter().map(|c| dispatcher.execute(*c))).await;
    for (command, result) in commands.iter().zip(results) {
        if let Err(e) = result {
            warn!("{:?} refused: {}", command, e);
        }
    }

    print!("{}", board.render(dispatcher.services()).await);
    Ok(())
}

/// Initialize structured logging
fn initialize_tracing() {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .json();

    let filter_layer = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
