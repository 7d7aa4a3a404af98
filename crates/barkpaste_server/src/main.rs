//! Headless API server entrypoint.

use barkpaste_core::constants::DEFAULT_LISTEN;
use barkpaste_core::{bootstrap_default_token, Config, Database};
use barkpaste_server::{serve_router, spawn_sweeper, sweeper::sweep_once, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct CliFlags {
    help: bool,
    clean_expired: bool,
}

fn parse_cli_flags(args: &[String]) -> anyhow::Result<CliFlags> {
    let mut flags = CliFlags::default();
    for arg in args.iter().skip(1) {
        match arg.as_str() {
            "--help" | "-h" => flags.help = true,
            "--clean-expired" => flags.clean_expired = true,
            value if value.starts_with('-') => {
                anyhow::bail!(
                    "Unknown option: '{}'. Use --help to see supported options.",
                    value
                );
            }
            value => {
                anyhow::bail!(
                    "Unexpected positional argument: '{}'. Use --help to see supported options.",
                    value
                );
            }
        }
    }
    Ok(flags)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "barkpaste_core=info,barkpaste_server=info,tower_http=warn".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().collect();
    let cli_flags = parse_cli_flags(&args)?;

    if cli_flags.help {
        print_help();
        return Ok(());
    }

    let config = Config::from_env();
    let database = Database::new(&config.db_path)?;
    bootstrap_default_token(database.tokens.as_ref(), &config.default_token)?;

    let state = AppState::from_database(config.clone(), &database);

    if cli_flags.clean_expired {
        let removed = sweep_once(state.service.clone())
            .await
            .ok_or_else(|| anyhow::anyhow!("Expiry sweep failed"))?;
        println!("Removed {} expired paste(s)", removed);
        return Ok(());
    }

    let sweeper = config
        .sweep_interval()
        .map(|period| spawn_sweeper(state.service.clone(), period));
    if sweeper.is_none() {
        tracing::info!("Periodic expiry sweep disabled");
    }

    let bind_addr = barkpaste_server::resolve_bind_address(&config);
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    let actual_addr = listener.local_addr().unwrap_or(bind_addr);
    tracing::info!("barkpaste running at http://{}", actual_addr);

    let serve_result = serve_router(listener, state, shutdown_signal()).await;

    if let Some(handle) = sweeper {
        handle.abort();
    }
    tracing::info!("Shut down");

    serve_result?;
    Ok(())
}

fn print_help() {
    println!("barkpaste server\n");
    println!("Usage: barkpaste [OPTIONS]\n");
    println!("Options:");
    println!("  --clean-expired   Remove expired pastes once and exit");
    println!("  --help            Show this help message");
    println!("\nEnvironment variables:");
    println!("  DB_PATH           Database directory (default: ~/.cache/barkpaste/db)");
    println!("  LISTEN            Listen address (default: {})", DEFAULT_LISTEN);
    println!("  PASTE_TTL         Default regular paste TTL in seconds (default: 86400)");
    println!("  MAX_PASTE_SIZE    Anonymous paste size limit in bytes (default: 1MB)");
    println!("  BODY_LIMIT        Maximum request body in bytes (default: 200MB)");
    println!("  DEFAULT_TOKEN     Token seeded into an empty token store (change it!)");
    println!("  SWEEP_INTERVAL    Seconds between expiry sweeps, 0 disables (default: 60)");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutting down gracefully...");
}
