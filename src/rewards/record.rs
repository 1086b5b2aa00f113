/**
 * Reward Record Model
 *
 * This module defines the reward record: one immutable, signed ledger
 * entry per reward event. Positive amounts are credits, negative
 * amounts are debits (only transfers write debits).
 *
 * # Invariants
 *
 * - Records are never mutated after insert except for `status`
 *   transitions; no UPDATE path exists for `amount` or `action_type`.
 * - Only `completed` records count toward a user's balance.
 * - `reference_id`/`reference_kind` point at the entity that triggered
 *   the reward and act as the idempotency key for duplicate-claim
 *   suppression.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Category of the action that produced a reward record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    /// Publishing a blog post
    Post,
    /// Commenting on a post
    Comment,
    /// Liking a post
    Like,
    /// Sharing a post
    Share,
    /// Claiming the daily check-in bonus
    DailyCheckin,
    /// Referring a new user
    Referral,
    /// One-time signup bonus
    Signup,
    /// Peer-to-peer transfer (debit or credit leg)
    Transfer,
    /// Miscellaneous manual rewards
    Other,
}

impl ActionType {
    /// Database / wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Post => "post",
            Self::Comment => "comment",
            Self::Like => "like",
            Self::Share => "share",
            Self::DailyCheckin => "daily_checkin",
            Self::Referral => "referral",
            Self::Signup => "signup",
            Self::Transfer => "transfer",
            Self::Other => "other",
        }
    }

    /// Parse the database / wire representation
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "post" => Some(Self::Post),
            "comment" => Some(Self::Comment),
            "like" => Some(Self::Like),
            "share" => Some(Self::Share),
            "daily_checkin" => Some(Self::DailyCheckin),
            "referral" => Some(Self::Referral),
            "signup" => Some(Self::Signup),
            "transfer" => Some(Self::Transfer),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

/// Lifecycle status of a reward record
///
/// Only `Completed` records count toward balance. `Pending` exists for
/// flows that settle asynchronously; `Failed`/`Cancelled` records stay
/// in the ledger for auditability but are excluded from every sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    Pending,
    Completed,
    Failed,
    Cancelled,
}

impl RecordStatus {
    /// Database / wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parse the database / wire representation
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

/// One entry in the reward ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardRecord {
    /// Unique record ID
    pub id: Uuid,
    /// Owning account
    pub user_id: Uuid,
    /// Signed token amount; positive credit, negative debit
    pub amount: i64,
    /// Category of the triggering action
    pub action_type: ActionType,
    /// Human-readable description
    pub reason: String,
    /// Idempotency pointer to the triggering entity
    pub reference_id: Option<String>,
    /// Kind of the referenced entity (post, user, ...)
    pub reference_kind: Option<String>,
    /// Lifecycle status
    pub status: RecordStatus,
    /// Write-once creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Parameters for appending a new record to the ledger
///
/// The store writes exactly what it is given; all business rules
/// (policies, caps, sufficiency) live in the engines above it.
#[derive(Debug, Clone)]
pub struct NewRecord {
    pub user_id: Uuid,
    pub amount: i64,
    pub action_type: ActionType,
    pub reason: String,
    pub reference_id: Option<String>,
    pub reference_kind: Option<String>,
    pub status: RecordStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_type_round_trip() {
        for action in [
            ActionType::Post,
            ActionType::Comment,
            ActionType::Like,
            ActionType::Share,
            ActionType::DailyCheckin,
            ActionType::Referral,
            ActionType::Signup,
            ActionType::Transfer,
            ActionType::Other,
        ] {
            assert_eq!(ActionType::parse(action.as_str()), Some(action));
        }
    }

    #[test]
    fn test_action_type_rejects_unknown() {
        assert_eq!(ActionType::parse("dance"), None);
        assert_eq!(ActionType::parse(""), None);
        assert_eq!(ActionType::parse("Post"), None);
    }

    #[test]
    fn test_status_round_trip() {
        for status in [
            RecordStatus::Pending,
            RecordStatus::Completed,
            RecordStatus::Failed,
            RecordStatus::Cancelled,
        ] {
            assert_eq!(RecordStatus::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn test_serde_uses_snake_case() {
        let json = serde_json::to_string(&ActionType::DailyCheckin).unwrap();
        assert_eq!(json, "\"daily_checkin\"");
        let json = serde_json::to_string(&RecordStatus::Completed).unwrap();
        assert_eq!(json, "\"completed\"");
    }
}
