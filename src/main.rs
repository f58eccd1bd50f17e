//! Batch job runner: recomputes giving aggregates and RFM scores for every
//! recorded donor. Intended to be invoked periodically by cron or a queue
//! worker; per-donation recomputation happens inline in the mutation path.

use donortrack::{config, core::trigger::TriggerCoordinator, errors::Result};
use dotenvy::dotenv;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    dotenv().ok();

    let db = config::database::create_connection()
        .await
        .inspect(|_| info!("Database connection established."))
        .inspect_err(|e| error!("Failed to connect to database: {e}"))?;

    config::database::create_tables(&db).await?;

    let triggers = TriggerCoordinator::new(db);
    let updated = triggers
        .recalculate_all_donors()
        .await
        .inspect_err(|e| error!("Donor recalculation failed: {e}"))?;

    info!("Recalculated analytics for {updated} contacts.");
    Ok(())
}
