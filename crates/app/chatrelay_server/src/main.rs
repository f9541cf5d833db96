//! chatrelay gateway server binary.
//!
//! Serves `POST /api/chat` and `GET /api/health`, forwarding prompts to the
//! Gemini API. The upstream API key is read once at startup.

use chatrelay_api::config::ApiConfig;
use clap::Parser;
use tracing::{info, warn};

/// CLI arguments for the gateway.
///
/// Each flag overrides the matching environment variable. The API key is
/// only taken from `GEMINI_API_KEY`.
#[derive(Parser, Debug)]
#[command(name = "chatrelay_server", about = "chatrelay streaming gateway", version)]
struct Args {
    /// Address to listen on [env: BIND_ADDR, default: 127.0.0.1:3000].
    #[arg(long)]
    bind_addr: Option<String>,

    /// Upstream model name [env: GEMINI_MODEL, default: gemini-2.0-flash].
    #[arg(long)]
    model: Option<String>,

    /// Upstream API root [env: GEMINI_BASE_URL].
    #[arg(long)]
    base_url: Option<String>,
}

impl Args {
    fn apply(self, config: &mut ApiConfig) {
        if let Some(bind_addr) = self.bind_addr {
            config.bind_addr = bind_addr;
        }
        if let Some(model) = self.model {
            config.gemini.model = model;
        }
        if let Some(base_url) = self.base_url {
            config.gemini.base_url = base_url;
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(
                    "info,chatrelay_api=debug,chatrelay_core=debug",
                )
            }),
        )
        .init();

    let args = Args::parse();

    let mut config = ApiConfig::from_env();
    args.apply(&mut config);

    if !config.gemini.has_api_key() {
        warn!("GEMINI_API_KEY is not set; upstream requests will be rejected");
    }
    info!(gemini = ?config.gemini, "starting chatrelay_server");

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    let local_addr = listener.local_addr()?;

    let app = chatrelay_api::router(chatrelay_api::AppState::new(config));

    info!(addr = %local_addr, "gateway listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
