use clap::Parser;
use tracing_subscriber::EnvFilter;

use flightlog_api::config::{self, AppConfig};

#[derive(Debug, Parser)]
#[command(name = "flightlog-api", version, about = "Flight log API backed by Supabase")]
struct Args {
    /// Address to bind (overrides HOST)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides PORT)
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up SUPABASE_URL, SUPABASE_KEY, etc.
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    let mut config: AppConfig = config::config().clone();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.environment.default_log_filter())),
        )
        .init();

    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    tracing::info!(
        environment = ?config.environment,
        backend = %config.supabase.url,
        cors_origin = %config.security.cors_origin,
        "starting flightlog-api"
    );

    flightlog_api::server::serve(&config).await
}
