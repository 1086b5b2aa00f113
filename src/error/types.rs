/**
 * Reward Ledger Error Types
 *
 * This module defines the error taxonomy for the reward ledger core.
 * These errors are used in the engines and HTTP handlers and can be
 * converted to HTTP responses.
 *
 * # Error Categories
 *
 * ## Business-rule rejections
 *
 * Duplicate claims, daily-cap violations, insufficient balance and
 * invalid transfer parameters are valid rejections, not faults. They
 * are terminal: the caller should not retry, and no partial record is
 * ever written for them.
 *
 * ## Store errors
 *
 * Transient database failures surface as `Store` / `StoreUnavailable`.
 * These may be retried by the caller or infrastructure layer.
 */

use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors produced by the reward ledger core
///
/// Each variant carries enough context for the client to explain *why*
/// the operation was rejected, per the API contract.
#[derive(Debug, Error)]
pub enum RewardError {
    /// The requested action has no earning policy
    #[error("unknown action type: {action}")]
    InvalidActionType {
        /// The unrecognized action string
        action: String,
    },

    /// A reward for this (user, action, reference) tuple already exists
    #[error("reward already claimed for this {action} event")]
    DuplicateClaim {
        /// Action that was attempted
        action: String,
    },

    /// The daily check-in was already claimed within the current UTC day
    #[error("already checked in today, try again at {next_reset}")]
    AlreadyClaimedToday {
        /// Next UTC midnight, when the claim becomes available again
        next_reset: DateTime<Utc>,
    },

    /// Sender balance is lower than the requested transfer amount
    #[error("insufficient balance: have {balance}, need {requested}")]
    InsufficientBalance {
        /// Sender's current balance
        balance: i64,
        /// Amount the sender tried to move
        requested: i64,
    },

    /// Transfer amount must be strictly positive
    #[error("transfer amount must be positive, got {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: i64,
    },

    /// Sender and recipient are the same account
    #[error("cannot transfer tokens to yourself")]
    SelfTransfer,

    /// The referenced user does not exist
    #[error("user not found")]
    UserNotFound,

    /// The database is not configured
    #[error("ledger store is not available")]
    StoreUnavailable,

    /// Underlying database failure
    #[error("store error: {0}")]
    Store(#[from] sqlx::Error),
}

impl RewardError {
    /// Get the HTTP status code for this error
    ///
    /// # Status Code Mapping
    ///
    /// - `InvalidActionType`, `InvalidAmount`, `SelfTransfer` - 400 Bad Request
    /// - `DuplicateClaim`, `AlreadyClaimedToday` - 409 Conflict
    /// - `InsufficientBalance` - 422 Unprocessable Entity
    /// - `UserNotFound` - 404 Not Found
    /// - `StoreUnavailable` - 503 Service Unavailable
    /// - `Store` - 500 Internal Server Error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidActionType { .. } => StatusCode::BAD_REQUEST,
            Self::InvalidAmount { .. } => StatusCode::BAD_REQUEST,
            Self::SelfTransfer => StatusCode::BAD_REQUEST,
            Self::DuplicateClaim { .. } => StatusCode::CONFLICT,
            Self::AlreadyClaimedToday { .. } => StatusCode::CONFLICT,
            Self::InsufficientBalance { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::UserNotFound => StatusCode::NOT_FOUND,
            Self::StoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable error code for API clients
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidActionType { .. } => "invalid_action_type",
            Self::InvalidAmount { .. } => "invalid_amount",
            Self::SelfTransfer => "self_transfer",
            Self::DuplicateClaim { .. } => "duplicate_claim",
            Self::AlreadyClaimedToday { .. } => "already_claimed_today",
            Self::InsufficientBalance { .. } => "insufficient_balance",
            Self::UserNotFound => "user_not_found",
            Self::StoreUnavailable => "store_unavailable",
            Self::Store(_) => "store_error",
        }
    }

    /// Get the error message
    ///
    /// Store errors are masked with a generic message so internal
    /// database details never leak to clients.
    pub fn message(&self) -> String {
        match self {
            Self::Store(_) => "internal store error".to_string(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_status_code_mapping() {
        let err = RewardError::InvalidActionType { action: "dance".to_string() };
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let err = RewardError::DuplicateClaim { action: "post".to_string() };
        assert_eq!(err.status_code(), StatusCode::CONFLICT);

        let err = RewardError::AlreadyClaimedToday { next_reset: Utc::now() };
        assert_eq!(err.status_code(), StatusCode::CONFLICT);

        let err = RewardError::InsufficientBalance { balance: 10, requested: 50 };
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

        assert_eq!(RewardError::SelfTransfer.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(RewardError::UserNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            RewardError::StoreUnavailable.status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_insufficient_balance_message_explains_why() {
        let err = RewardError::InsufficientBalance { balance: 10, requested: 50 };
        let msg = err.message();
        assert!(msg.contains("10"));
        assert!(msg.contains("50"));
    }

    #[test]
    fn test_already_claimed_message_names_reset_time() {
        let next_reset = Utc::now();
        let err = RewardError::AlreadyClaimedToday { next_reset };
        assert!(err.message().contains(&next_reset.to_string()));
    }

    #[test]
    fn test_store_error_is_masked() {
        let err = RewardError::Store(sqlx::Error::RowNotFound);
        assert_eq!(err.message(), "internal store error");
        assert_eq!(err.code(), "store_error");
    }

    #[test]
    fn test_from_sqlx_error() {
        let err: RewardError = sqlx::Error::RowNotFound.into();
        assert_matches!(err, RewardError::Store(_));
    }
}
