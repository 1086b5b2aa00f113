/**
 * Reward HTTP Handlers
 *
 * This module contains the HTTP handlers for the reward ledger
 * endpoints. All routes here sit behind the auth middleware; the
 * `AuthUser` extractor provides the verified caller.
 *
 * # Routes
 *
 * - `POST /api/rewards/earn` - Earn a reward for an action
 * - `POST /api/rewards/checkin` - Claim the daily check-in bonus
 * - `POST /api/rewards/transfer` - Transfer balance to another user
 * - `GET /api/rewards/balance` - Current balance
 * - `GET /api/rewards/history` - Paginated reward history
 * - `GET /api/rewards/streak` - Current check-in streak
 */

use axum::{
    extract::{Query, State},
    response::Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::RewardError;
use crate::middleware::auth::AuthUser;
use crate::rewards::record::{ActionType, RewardRecord};
use crate::rewards::{balance, policy, store, streak, transfer};

/// Default page size for history queries
const DEFAULT_HISTORY_LIMIT: i64 = 20;
/// Upper bound on requested page size
const MAX_HISTORY_LIMIT: i64 = 100;

/// Earn request body
#[derive(Deserialize, Debug)]
pub struct EarnRequest {
    /// Action being rewarded (`post`, `comment`, `like`, ...)
    pub action: String,
    /// Idempotency reference to the triggering entity
    #[serde(default)]
    pub reference_id: Option<String>,
    /// Kind of the referenced entity (post, user, ...)
    #[serde(default)]
    pub reference_kind: Option<String>,
}

/// Earn response body
#[derive(Serialize, Deserialize, Debug)]
pub struct EarnResponse {
    /// ID of the appended reward record
    pub record_id: Uuid,
    /// The rewarded action
    pub action: String,
    /// Amount credited by this claim
    pub amount: i64,
    /// Caller's recomputed balance
    pub balance: i64,
}

/// Check-in response body
#[derive(Serialize, Deserialize, Debug)]
pub struct CheckinResponse {
    /// ID of the appended check-in record
    pub record_id: Uuid,
    /// Amount credited by this check-in
    pub amount: i64,
    /// Consecutive check-in days including today
    pub streak: u32,
    /// Caller's recomputed balance
    pub balance: i64,
}

/// Transfer request body
#[derive(Deserialize, Debug)]
pub struct TransferRequest {
    /// Recipient user ID
    pub to_user_id: Uuid,
    /// Amount to move (must be positive)
    pub amount: i64,
    /// Optional note recorded on both ledger legs
    #[serde(default)]
    pub note: Option<String>,
}

/// Transfer response body
#[derive(Serialize, Deserialize, Debug)]
pub struct TransferResponse {
    /// Amount moved
    pub amount: i64,
    /// Sender's recomputed balance
    pub balance: i64,
}

/// Balance response body
#[derive(Serialize, Deserialize, Debug)]
pub struct BalanceResponse {
    /// Sum of the caller's completed reward records
    pub balance: i64,
}

/// History query parameters
#[derive(Deserialize, Debug, Default)]
pub struct HistoryQuery {
    /// 1-based page number (default 1)
    pub page: Option<i64>,
    /// Page size (default 20, max 100)
    pub limit: Option<i64>,
    /// Optional action filter
    pub action_type: Option<String>,
}

/// History response body
#[derive(Serialize, Deserialize, Debug)]
pub struct HistoryResponse {
    /// Records on this page, newest first
    pub records: Vec<RewardRecord>,
    /// 1-based page number
    pub page: i64,
    /// Page size used
    pub limit: i64,
    /// Total matching records
    pub total: i64,
}

/// Streak response body
#[derive(Serialize, Deserialize, Debug)]
pub struct StreakResponse {
    /// Consecutive check-in days
    pub streak: u32,
}

/// Resolve the pool or fail with `StoreUnavailable`
fn require_pool(pool: Option<PgPool>) -> Result<PgPool, RewardError> {
    pool.ok_or_else(|| {
        tracing::error!("Database not configured");
        RewardError::StoreUnavailable
    })
}

/// Parse an action string or fail with `InvalidActionType`
fn parse_action(action: &str) -> Result<ActionType, RewardError> {
    ActionType::parse(action).ok_or_else(|| RewardError::InvalidActionType {
        action: action.to_string(),
    })
}

/// Earn a reward for an action
///
/// The policy engine decides the amount, rejects duplicate claims for
/// the same reference, and enforces the daily check-in cap when the
/// action is `daily_checkin`.
pub async fn earn(
    State(pool): State<Option<PgPool>>,
    AuthUser(auth): AuthUser,
    Json(request): Json<EarnRequest>,
) -> Result<Json<EarnResponse>, RewardError> {
    let pool = require_pool(pool)?;
    let action = parse_action(&request.action)?;

    let record = policy::earn(
        &pool,
        auth.user_id,
        action,
        request.reference_id.as_deref(),
        request.reference_kind.as_deref(),
    )
    .await?;

    let balance = balance::get_balance(&pool, auth.user_id).await?;

    Ok(Json(EarnResponse {
        record_id: record.id,
        action: action.as_str().to_string(),
        amount: record.amount,
        balance,
    }))
}

/// Claim the daily check-in bonus
///
/// Succeeds at most once per UTC calendar day; the response includes
/// the updated streak.
pub async fn checkin(
    State(pool): State<Option<PgPool>>,
    AuthUser(auth): AuthUser,
) -> Result<Json<CheckinResponse>, RewardError> {
    let pool = require_pool(pool)?;

    let record = policy::earn(&pool, auth.user_id, ActionType::DailyCheckin, None, None).await?;

    let streak = streak::get_checkin_streak(&pool, auth.user_id, Utc::now()).await?;
    let balance = balance::get_balance(&pool, auth.user_id).await?;

    Ok(Json(CheckinResponse {
        record_id: record.id,
        amount: record.amount,
        streak,
        balance,
    }))
}

/// Transfer balance to another user
pub async fn transfer_tokens(
    State(pool): State<Option<PgPool>>,
    AuthUser(auth): AuthUser,
    Json(request): Json<TransferRequest>,
) -> Result<Json<TransferResponse>, RewardError> {
    let pool = require_pool(pool)?;

    let balance = transfer::transfer(
        &pool,
        auth.user_id,
        request.to_user_id,
        request.amount,
        request.note.as_deref(),
    )
    .await?;

    Ok(Json(TransferResponse {
        amount: request.amount,
        balance,
    }))
}

/// Get the caller's current balance
pub async fn get_balance(
    State(pool): State<Option<PgPool>>,
    AuthUser(auth): AuthUser,
) -> Result<Json<BalanceResponse>, RewardError> {
    let pool = require_pool(pool)?;

    let balance = balance::get_balance(&pool, auth.user_id).await?;

    Ok(Json(BalanceResponse { balance }))
}

/// Get the caller's reward history, newest first
pub async fn get_history(
    State(pool): State<Option<PgPool>>,
    AuthUser(auth): AuthUser,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, RewardError> {
    let pool = require_pool(pool)?;

    let action = match &query.action_type {
        Some(s) => Some(parse_action(s)?),
        None => None,
    };

    let page = query.page.unwrap_or(1).max(1);
    let limit = query
        .limit
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .clamp(1, MAX_HISTORY_LIMIT);
    let offset = (page - 1) * limit;

    let records = store::list_by_user(&pool, auth.user_id, action, limit, offset).await?;
    let total = store::count_by_user(&pool, auth.user_id, action).await?;

    Ok(Json(HistoryResponse {
        records,
        page,
        limit,
        total,
    }))
}

/// Get the caller's current check-in streak
pub async fn get_streak(
    State(pool): State<Option<PgPool>>,
    AuthUser(auth): AuthUser,
) -> Result<Json<StreakResponse>, RewardError> {
    let pool = require_pool(pool)?;

    let streak = streak::get_checkin_streak(&pool, auth.user_id, Utc::now()).await?;

    Ok(Json(StreakResponse { streak }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_parse_action_accepts_known_actions() {
        assert_eq!(parse_action("post").unwrap(), ActionType::Post);
        assert_eq!(parse_action("daily_checkin").unwrap(), ActionType::DailyCheckin);
    }

    #[test]
    fn test_parse_action_rejects_unknown() {
        assert_matches!(
            parse_action("teleport"),
            Err(RewardError::InvalidActionType { .. })
        );
    }

    #[test]
    fn test_require_pool_without_database() {
        assert_matches!(require_pool(None), Err(RewardError::StoreUnavailable));
    }
}
