/**
 * Application State Management
 *
 * This module defines the application state structure and implements
 * the necessary `FromRef` traits for Axum state extraction.
 *
 * # Architecture
 *
 * The `AppState` struct serves as the central state container for the
 * application. The reward ledger keeps all durable state in PostgreSQL,
 * so the only shared resource is the connection pool.
 *
 * # State Extraction
 *
 * The `FromRef` implementations allow Axum handlers to extract specific
 * parts of the state without needing the entire `AppState`. This follows
 * Axum's recommended pattern for state management.
 */

use axum::extract::FromRef;
use sqlx::PgPool;

/// Application state shared across all request handlers
///
/// # Fields
///
/// * `db_pool` - Optional PostgreSQL database connection pool
///
/// # Thread Safety
///
/// `PgPool` is internally reference-counted and safe to clone into
/// every handler invocation.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    ///
    /// This is `None` if the database is not configured (e.g., if
    /// `DATABASE_URL` environment variable is not set). Handlers answer
    /// 503 Service Unavailable when the pool is missing.
    pub db_pool: Option<PgPool>,
}

/// Implement FromRef for Option<PgPool>
///
/// This allows Axum handlers to extract the optional database pool
/// directly from `AppState`.
impl FromRef<AppState> for Option<PgPool> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.db_pool.clone()
    }
}
