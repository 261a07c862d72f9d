//! Karma Ledger Main Entry Point
//!
//! Opens the ledger store, migrates it if needed, repairs any totals that
//! drifted from the ledger, and logs the current ranking.

use dotenv::dotenv;
use karma_ledger::{Dependencies, KarmaLedgerError, Settings};
use std::env;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing/logging.
fn init_tracing() -> Result<(), KarmaLedgerError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("karma_ledger=info,karma_ledger_pipeline=info,karma_ledger_repository=info")
    });

    let json = env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true),
            )
            .try_init()
            .map_err(|e| KarmaLedgerError::Tracing(e.to_string()))?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true).pretty())
            .try_init()
            .map_err(|e| KarmaLedgerError::Tracing(e.to_string()))?;
    }

    info!(
        service_name = "karma-ledger",
        service_version = env!("CARGO_PKG_VERSION"),
        json,
        "Tracing initialized"
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), KarmaLedgerError> {
    dotenv().ok();
    init_tracing()?;

    info!("Starting karma ledger");

    let settings = Settings::from_env()?;
    let deps = match Dependencies::new(&settings).await {
        Ok(deps) => deps,
        Err(e) => {
            error!(error = %e, "Failed to initialize dependencies");
            return Err(e);
        }
    };

    let repaired = deps.queries.verify_and_repair().await?;
    info!(repaired = repaired.len(), "Ledger integrity verified");

    let top = deps.queries.top(settings.top_limit).await?;
    for (index, entry) in top.iter().enumerate() {
        info!(
            position = index + 1,
            recipient = %entry.recipient,
            total = entry.total,
            positive = entry.positive,
            negative = entry.negative,
            "Top recipient"
        );
    }

    deps.store.pool().close().await;
    Ok(())
}
