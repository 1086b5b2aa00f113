/**
 * Server Module
 *
 * This module contains server initialization, application state,
 * and configuration loading.
 */

/// Server initialization
pub mod init;

/// Application state
pub mod state;

/// Configuration loading
pub mod config;

pub use init::create_app;
pub use state::AppState;
