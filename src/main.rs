//! HTTP server for the payroll engine.
//!
//! Environment:
//! - `PAYROLL_CONFIG`: path to a YAML config file (defaults are used when unset)
//! - `PAYROLL_SEED`: path to a JSON file of staff, attendance, sales, targets and advances
//! - `RUST_LOG`: log filter, `info` by default

use std::sync::Arc;

use payroll_engine::api::{create_router, AppState};
use payroll_engine::config::{ConfigLoader, PayrollConfig};
use payroll_engine::store::{InMemoryStore, SeedData};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match std::env::var("PAYROLL_CONFIG") {
        Ok(path) => {
            info!(path = %path, "Loading configuration");
            ConfigLoader::load(&path)?
        }
        Err(_) => PayrollConfig::default(),
    };

    let seed = match std::env::var("PAYROLL_SEED") {
        Ok(path) => {
            info!(path = %path, "Loading seed data");
            let contents = std::fs::read_to_string(&path)?;
            serde_json::from_str::<SeedData>(&contents)?
        }
        Err(_) => SeedData::default(),
    };

    let bind_address = config.server.bind_address.clone();
    let store = Arc::new(InMemoryStore::from_seed(&seed).await);
    let state = AppState::in_memory(config, store);
    for advance in seed.advances {
        state.ledger().issue(advance).await?;
    }

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!(
        address = %bind_address,
        staff = seed.staff.len(),
        "Payroll engine listening"
    );
    axum::serve(listener, create_router(state)).await?;

    Ok(())
}
