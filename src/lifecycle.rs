//! Database connection lifecycle and active-count bookkeeping.

use tracing::{error, info, warn};

use crate::error::StoreError;
use crate::metrics::Metrics;
use crate::store::{StorageOp, TodoStore};

/// Verify the store is reachable and initialize the connection and
/// active-todo gauges.
///
/// A failed ping is fatal: the gauge is left at 0 and the error returned.
pub async fn startup(store: &dyn TodoStore, metrics: &Metrics) -> Result<(), StoreError> {
    if let Err(e) = store.ping().await {
        error!("Failed to connect to MongoDB: {}", e);
        metrics.set_mongo_connected(false);
        return Err(e);
    }

    metrics.set_mongo_connected(true);
    info!("MongoDB connected");

    refresh_active_count(store, metrics).await;
    Ok(())
}

/// Close the store and mark it disconnected.
pub async fn shutdown(store: &dyn TodoStore, metrics: &Metrics) {
    store.close().await;
    metrics.set_mongo_connected(false);
    info!("MongoDB disconnected");
}

/// Recount incomplete todos and publish the result.
///
/// Failures are logged and counted but never propagated; the gauge keeps
/// its previous value until the next successful count.
pub async fn refresh_active_count(store: &dyn TodoStore, metrics: &Metrics) {
    match store.count_active().await {
        Ok(count) => metrics.set_active_todos(count),
        Err(e) => {
            metrics.inc_db_errors(StorageOp::Count);
            warn!("Error counting active todos: {}", e);
        }
    }
}
