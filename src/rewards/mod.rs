//! Reward Ledger Core
//!
//! This module implements the token reward accounting engine:
//!
//! - **`record`** - The reward record data model (the ledger rows)
//! - **`store`** - Append-only record store and aggregate queries
//! - **`balance`** - Balance aggregation (always recomputed, never cached)
//! - **`policy`** - Earning policy engine (amounts, duplicate suppression,
//!   daily caps)
//! - **`streak`** - Consecutive check-in day calculation
//! - **`transfer`** - Peer-to-peer balance transfers (transactional
//!   debit/credit pair)
//! - **`handlers`** - HTTP handlers for the `/api/rewards/*` endpoints
//!
//! # Accounting model
//!
//! Every earning event appends one immutable signed record. A user's
//! balance is the sum of their completed records; there is no cached
//! running total anywhere, so the balance can never drift from the
//! ledger. Transfers append a matched debit/credit pair inside a single
//! database transaction.

/// Reward record data model
pub mod record;

/// Append-only record store
pub mod store;

/// Balance aggregation
pub mod balance;

/// Earning policy engine
pub mod policy;

/// Check-in streak calculation
pub mod streak;

/// Peer-to-peer transfers
pub mod transfer;

/// HTTP handlers
pub mod handlers;

pub use record::{ActionType, RecordStatus, RewardRecord};
pub use policy::RewardPolicy;
