/**
 * Error Module
 *
 * This module defines the error types for the reward ledger and their
 * conversion into HTTP responses.
 */

/// Error type definitions
pub mod types;

/// Conversion implementations (IntoResponse)
pub mod conversion;

pub use types::RewardError;
