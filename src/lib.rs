//! CYBEV Backend - Main Library
//!
//! Backend service for the CYBEV token reward ledger. It exposes an Axum
//! HTTP API backed by PostgreSQL and owns the reward accounting core:
//! an append-only ledger of signed reward records, on-demand balance
//! aggregation, an earning policy engine with duplicate-claim and
//! daily-cap suppression, a check-in streak calculator, and a
//! transactional peer-to-peer transfer engine.
//!
//! # Module Structure
//!
//! - **`server`** - Server initialization, application state, configuration
//! - **`routes`** - HTTP route configuration and router assembly
//! - **`auth`** - Authentication, JWT tokens, user management
//! - **`middleware`** - Request processing middleware
//! - **`rewards`** - The reward ledger core (store, policy, streak, transfer)
//! - **`error`** - Error types and HTTP response conversion
//!
//! # State Management
//!
//! Shared state (`AppState`) holds the optional PostgreSQL connection
//! pool. Handlers check for `None` and answer 503 when the database is
//! not configured, so the server can start without one.
//!
//! # Error Handling
//!
//! Business-rule rejections (duplicate claim, insufficient balance,
//! already claimed today) are modeled as `RewardError` variants that
//! convert to JSON error responses with a machine-readable `code`.

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Authentication and user management
pub mod auth;

/// Middleware for request processing
pub mod middleware;

/// Reward ledger core
pub mod rewards;

/// Error types
pub mod error;

/// Re-export commonly used types
pub use server::create_app;
pub use error::RewardError;
