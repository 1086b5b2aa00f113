/**
 * Server Initialization
 *
 * This module handles the initialization and setup of the Axum HTTP
 * server, including state creation, database loading, and route
 * configuration.
 *
 * # Initialization Process
 *
 * 1. Load optional services (database pool + migrations)
 * 2. Create app state
 * 3. Create and configure the router
 *
 * The reward ledger keeps no in-memory state; balances are always
 * recomputed from the record store, so there is nothing to restore
 * on startup.
 */

use axum::Router;

use crate::routes::router::create_router;
use crate::server::config::load_database;
use crate::server::state::AppState;

/// Create and configure the Axum application
///
/// This function sets up the Axum HTTP server with:
/// - Database connection pool (if configured)
/// - Route configuration
///
/// # Returns
///
/// Configured Axum Router ready to serve requests
///
/// # Error Handling
///
/// The function is designed to be resilient:
/// - Missing database: server starts, ledger endpoints answer 503
/// - Migration failures: logged but don't prevent startup
pub async fn create_app() -> Router<()> {
    tracing::info!("Initializing CYBEV backend server");

    let db_pool = load_database().await;

    let app_state = AppState { db_pool };

    create_router(app_state)
}
