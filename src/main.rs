//! Mscore - Entry Point
//!
//! Loads the referral code and proxy list, asks for a wallet count, then
//! onboards that many wallets one at a time.

use std::io::Write;
use std::sync::Arc;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mscore::config::{Config, LogConfig};
use mscore::proxy::{
    DispatcherConfig, HealthCheckerConfig, HttpProxyValidator, RequestDispatcher, ReqwestTransport,
};
use mscore::repository::{load_proxy_pool, load_referral_code, WalletRepository};
use mscore::services::{
    parse_wallet_count, LogProgress, RandomWalletGenerator, RunController, WalletOnboarding,
};

#[derive(Debug, Parser)]
#[command(name = "mscore", version, about = "Create and register Monad Score wallets")]
struct Cli {
    /// Number of wallets to create; prompted for when omitted
    count: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::from_env()?;
    init_tracing(&config.log);

    info!("Starting Mscore");

    let referral_code = load_referral_code(&config.files.code).await;
    let pool = Arc::new(load_proxy_pool(&config.files.proxies).await);

    let raw_count = match cli.count {
        Some(count) => count,
        None => prompt("Enter number of wallets to create: ").await?,
    };
    let count = match parse_wallet_count(&raw_count) {
        Ok(count) => count,
        Err(e) => {
            error!("{} - please enter a positive number", e);
            return Err(e.into());
        }
    };

    let validator = Arc::new(HttpProxyValidator::new(HealthCheckerConfig {
        check_timeout: config.check_timeout(),
        check_url: config.validation.check_url.clone(),
    }));
    let transport = Arc::new(ReqwestTransport::new(
        config.service.base_url.clone(),
        &config.service.site_origin,
        config.request_timeout(),
    )?);
    let dispatcher = Arc::new(RequestDispatcher::new(
        pool,
        validator,
        transport,
        DispatcherConfig {
            max_retries: config.service.max_retries,
        },
    ));

    let controller = RunController::new(
        WalletOnboarding::new(dispatcher, referral_code),
        Arc::new(RandomWalletGenerator),
        WalletRepository::new(config.files.wallets.clone()),
    )
    .with_progress(Arc::new(LogProgress));

    let report = match controller.run(count).await {
        Ok(report) => report,
        Err(e) => {
            error!("Critical error: {}", e);
            return Err(e.into());
        }
    };

    info!("Process completed");
    info!(
        "Final results: total wallets: {}, successful: {}, failed: {}, saved wallets: {}",
        report.stats.total, report.stats.success, report.stats.failed, report.saved
    );

    Ok(())
}

fn init_tracing(log: &LogConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("mscore={}", log.level).into());
    let registry = tracing_subscriber::registry().with(filter);

    if log.format.eq_ignore_ascii_case("json") {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Ask on stdout, read one line from stdin
async fn prompt(question: &str) -> std::io::Result<String> {
    let mut stdout = std::io::stdout();
    write!(stdout, "{}", question)?;
    stdout.flush()?;

    let mut line = String::new();
    BufReader::new(tokio::io::stdin()).read_line(&mut line).await?;
    Ok(line)
}
