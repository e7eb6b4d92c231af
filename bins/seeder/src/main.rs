//! Database seeder for Cogniflow development and demos.
//!
//! Applies pending migrations, then loads the demo chart of accounts,
//! transactions and invoices. Running it again leaves existing books alone.
//!
//! Usage: cargo run --bin seeder

use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use cogniflow_core::demo::{SeedOutcome, seed_demo_data};
use cogniflow_core::insights::{InsightEngine, InsightPolicy, InsightService};
use cogniflow_core::ledger::LedgerService;
use cogniflow_core::records::RecordService;
use cogniflow_core::store::SharedStore;
use cogniflow_db::PgStore;
use cogniflow_db::migration::Migrator;
use cogniflow_shared::AppConfig;
use sea_orm_migration::MigratorTrait;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    let database_url = std::env::var("DATABASE_URL")
        .ok()
        .or(config.database.url)
        .context("DATABASE_URL or COGNIFLOW__DATABASE__URL must be set")?;

    println!("Connecting to database...");
    let db = cogniflow_db::connect(&database_url, config.database.max_connections).await?;

    println!("Applying migrations...");
    Migrator::up(&db, None).await?;

    let store: SharedStore = Arc::new(PgStore::new(db));
    let insights = InsightService::new(
        store.clone(),
        InsightEngine::standard(InsightPolicy::from(&config.insights)),
    );
    let ledger = LedgerService::new(store.clone());
    let records = RecordService::new(store, insights);

    println!("Seeding demo books...");
    match seed_demo_data(&ledger, &records, Utc::now()).await? {
        SeedOutcome::Seeded {
            accounts,
            transactions,
            invoices,
        } => println!(
            "Seeded {accounts} accounts, {transactions} transactions and {invoices} invoices"
        ),
        SeedOutcome::AlreadySeeded => println!("Demo books already present, nothing to do"),
    }

    Ok(())
}
