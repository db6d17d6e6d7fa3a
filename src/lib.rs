pub mod api;
pub mod config;
pub mod error;
pub mod logic;
pub mod model;
pub mod seed;
pub mod store;

// Export API types
pub use api::handlers;
pub use api::routes;
pub use api::Envelope;

pub use error::{ServiceError, ServiceResult};
pub use logic::{EntityService, ReferenceResolver};

// Export all model types
pub use model::*;

// Export store types
pub use store::{MemoryStore, PostgresStore, Repository, Store};

use crate::config::{AppConfig, StoreBackend};
use std::sync::Arc;
use tokio::net::TcpListener;

/// Build the configured store and serve the API until the listener fails.
pub async fn run_server(config: AppConfig) -> anyhow::Result<()> {
    match config.database.backend {
        StoreBackend::Memory => {
            log::info!("Using in-memory store");
            serve(Arc::new(MemoryStore::new()), &config).await
        }
        StoreBackend::Postgres => {
            log::info!("Connecting to PostgreSQL...");
            let store =
                PostgresStore::new(&config.database_url(), config.max_connections()).await?;
            store.migrate().await?;
            serve(Arc::new(store), &config).await
        }
    }
}

async fn serve<S: Store + 'static>(store: Arc<S>, config: &AppConfig) -> anyhow::Result<()> {
    // Load seed data for demonstration (optional)
    if std::env::var("LOAD_SEED_DATA").unwrap_or_default() == "true" {
        log::info!("Loading seed data...");
        seed::load_seed_data(&*store).await?;
    }

    let app = routes::create_router().with_state(store);

    let bind_address = config.server_address();
    let listener = TcpListener::bind(&bind_address).await?;
    log::info!("Academia server running on http://{}", bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
