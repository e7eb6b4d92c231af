//! Cogniflow API Server
//!
//! Main entry point for the Cogniflow ERP backend.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cogniflow_api::{AppState, create_router};
use cogniflow_core::demo::{SeedOutcome, seed_demo_data};
use cogniflow_core::insights::{InsightPolicy, InsightService};
use cogniflow_core::store::{MemoryStore, SharedStore};
use cogniflow_db::{PgStore, connect};
use cogniflow_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cogniflow=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load()?;

    let store: SharedStore = match &config.database.url {
        Some(url) => {
            let db = connect(url, config.database.max_connections).await?;
            info!("Connected to database");
            Arc::new(PgStore::new(db))
        }
        None => {
            info!("No database configured, keeping books in memory");
            Arc::new(MemoryStore::new())
        }
    };

    let state = AppState::new(store, InsightPolicy::from(&config.insights), &config.jwt);

    if config.server.seed_demo_data {
        match seed_demo_data(&state.ledger, &state.records, Utc::now()).await? {
            SeedOutcome::Seeded { .. } => info!("Demo books loaded"),
            SeedOutcome::AlreadySeeded => info!("Demo books already present"),
        }
    }

    if config.insights.analysis_interval_secs > 0 {
        spawn_analysis(
            state.insights.clone(),
            Duration::from_secs(config.insights.analysis_interval_secs),
        );
    }

    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Runs the periodic insight rules every `every`, starting one period from now.
fn spawn_analysis(insights: InsightService, every: Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            if let Err(e) = insights.run_analysis(None, Utc::now()).await {
                tracing::warn!(error = %e, "Scheduled analysis failed");
            }
        }
    });
    info!(interval_secs = every.as_secs(), "Scheduled insight analysis enabled");
}
