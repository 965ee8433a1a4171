use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use minder::error::{AppError, Result};
use minder::{open_store, Assistant, Config, Store, Transport};

/// Owner identity used for the local console session
const LOCAL_OWNER: &str = "local";

/// Console transport: replies go to stdout. Stands in for a real messaging
/// platform client behind the same trait.
struct StdioTransport;

#[async_trait]
impl Transport for StdioTransport {
    async fn send(&self, _owner_id: &str, text: &str) -> Result<()> {
        println!("{text}");
        Ok(())
    }

    async fn send_file(&self, _owner_id: &str, location: &str, display_name: &str) -> Result<()> {
        println!("[file] {display_name} ({location})");
        Ok(())
    }

    async fn resolve_file_link(&self, file_ref: &str) -> Result<String> {
        // The console has no file hosting; echo the opaque handle back
        Ok(format!("ref:{file_ref}"))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "minder=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting assistant bot...");

    // Load configuration
    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    tracing::info!(
        "Environment: {}, store: {}",
        config.environment,
        config.database_path
    );

    // A failed store open is logged, not fatal: the bot keeps answering and
    // every store-touching operation fails fast until a restart fixes it
    let store = match open_store(&config.database_path).await {
        Ok(store) => store,
        Err(e) => {
            tracing::error!("Store initialization failed: {}", e);
            Store::unavailable()
        }
    };

    let transport = Arc::new(StdioTransport);
    let assistant = Assistant::new(store, transport.clone(), config);

    // Re-arm reminders that survived the restart
    match assistant.recover().await {
        Ok(swept) => tracing::info!("Recovered {} pending reminders", swept),
        Err(AppError::StoreUnavailable) => {
            tracing::warn!("Skipping reminder recovery: store unavailable")
        }
        Err(e) => tracing::error!("Reminder recovery failed: {}", e),
    }

    tracing::info!("Ready. Type commands (try /help), Ctrl-D to exit.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let reply = assistant.handle_message(LOCAL_OWNER, &line).await;
        if let Err(e) = transport.send(LOCAL_OWNER, &reply).await {
            tracing::error!("Failed to deliver reply: {}", e);
        }
    }

    tracing::info!("Input closed, shutting down");

    Ok(())
}
