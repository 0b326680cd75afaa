use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use chloromap::{api, config::Config, engine::EngineClient};

const DEFAULT_PORT: u16 = 8000;

#[derive(Parser)]
#[command(name = "chloromap")]
#[command(about = "Chlorophyll-index tile facade over a remote imagery platform")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Port for the HTTP API
        #[arg(short, long, default_value_t = DEFAULT_PORT)]
        port: u16,
    },
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "chloromap=debug,tower_http=debug".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let port = match cli.command {
        Some(Commands::Serve { port }) => port,
        None => DEFAULT_PORT,
    };

    // Both of these are fatal: without the credential set no request is
    // ever served.
    let config = Config::from_env().context("missing platform credentials in environment")?;
    let engine = EngineClient::connect(&config)
        .await
        .context("could not establish platform session")?;

    let app = api::create_router(api::AppState::new(Arc::new(engine)));

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    tracing::info!("chloromap listening on http://0.0.0.0:{}", port);
    axum::serve(listener, app).await?;

    Ok(())
}
