/**
 * Reward Record Store
 *
 * Database operations for the append-only reward ledger. The store is
 * a pure persistence layer: `append_record` writes exactly what it is
 * given and never rejects based on business rules — those live in the
 * policy, streak and transfer engines.
 *
 * # Duplicate guard
 *
 * The one store-level rule is the partial unique index on
 * `(user_id, action_type, reference_id)` (transfers excluded). A
 * violating insert is surfaced as `DuplicateClaim`, so two racing earn
 * calls for the same event cannot both commit, regardless of what the
 * application-level pre-check saw.
 */

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::error::RewardError;
use crate::rewards::record::{ActionType, NewRecord, RecordStatus, RewardRecord};

/// Map a database row to a `RewardRecord`
///
/// Unknown action/status strings cannot appear through this crate's
/// write paths; rows predating the enum would map to `Other`/`Pending`
/// rather than fail the whole query.
fn map_row(row: &sqlx::postgres::PgRow) -> RewardRecord {
    let action: String = row.get("action_type");
    let status: String = row.get("status");
    RewardRecord {
        id: row.get("id"),
        user_id: row.get("user_id"),
        amount: row.get("amount"),
        action_type: ActionType::parse(&action).unwrap_or(ActionType::Other),
        reason: row.get("reason"),
        reference_id: row.get("reference_id"),
        reference_kind: row.get("reference_kind"),
        status: RecordStatus::parse(&status).unwrap_or(RecordStatus::Pending),
        created_at: row.get("created_at"),
    }
}

/// Append a record to the ledger
///
/// This is a pure write: no business rules are evaluated here. The only
/// failure besides transport errors is the storage-level duplicate
/// guard, which maps to `DuplicateClaim`.
pub async fn append_record(
    pool: &PgPool,
    record: &NewRecord,
) -> Result<RewardRecord, RewardError> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let row = sqlx::query(
        r#"
        INSERT INTO reward_records
            (id, user_id, amount, action_type, reason, reference_id, reference_kind, status, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING id, user_id, amount, action_type, reason, reference_id, reference_kind, status, created_at
        "#
    )
    .bind(id)
    .bind(record.user_id)
    .bind(record.amount)
    .bind(record.action_type.as_str())
    .bind(&record.reason)
    .bind(&record.reference_id)
    .bind(&record.reference_kind)
    .bind(record.status.as_str())
    .bind(now)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        if e.as_database_error().is_some_and(|db| db.is_unique_violation()) {
            tracing::warn!(
                "Duplicate reward insert rejected by store: user={} action={} reference={:?}",
                record.user_id,
                record.action_type.as_str(),
                record.reference_id
            );
            RewardError::DuplicateClaim {
                action: record.action_type.as_str().to_string(),
            }
        } else {
            RewardError::Store(e)
        }
    })?;

    Ok(map_row(&row))
}

/// Find a record by its idempotency reference
///
/// Used as the friendly pre-check before inserting; the unique index is
/// the actual guarantee.
pub async fn find_by_reference(
    pool: &PgPool,
    user_id: Uuid,
    action_type: ActionType,
    reference_id: &str,
) -> Result<Option<RewardRecord>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT id, user_id, amount, action_type, reason, reference_id, reference_kind, status, created_at
        FROM reward_records
        WHERE user_id = $1 AND action_type = $2 AND reference_id = $3
        "#
    )
    .bind(user_id)
    .bind(action_type.as_str())
    .bind(reference_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.as_ref().map(map_row))
}

/// List a user's records, newest first, with optional action filter
pub async fn list_by_user(
    pool: &PgPool,
    user_id: Uuid,
    action_type: Option<ActionType>,
    limit: i64,
    offset: i64,
) -> Result<Vec<RewardRecord>, sqlx::Error> {
    let rows = match action_type {
        Some(action) => {
            sqlx::query(
                r#"
                SELECT id, user_id, amount, action_type, reason, reference_id, reference_kind, status, created_at
                FROM reward_records
                WHERE user_id = $1 AND action_type = $2
                ORDER BY created_at DESC
                LIMIT $3 OFFSET $4
                "#
            )
            .bind(user_id)
            .bind(action.as_str())
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query(
                r#"
                SELECT id, user_id, amount, action_type, reason, reference_id, reference_kind, status, created_at
                FROM reward_records
                WHERE user_id = $1
                ORDER BY created_at DESC
                LIMIT $2 OFFSET $3
                "#
            )
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?
        }
    };

    Ok(rows.iter().map(map_row).collect())
}

/// Count a user's records, with optional action filter (history paging)
pub async fn count_by_user(
    pool: &PgPool,
    user_id: Uuid,
    action_type: Option<ActionType>,
) -> Result<i64, sqlx::Error> {
    let row = match action_type {
        Some(action) => {
            sqlx::query(
                r#"
                SELECT COUNT(*) AS count FROM reward_records
                WHERE user_id = $1 AND action_type = $2
                "#
            )
            .bind(user_id)
            .bind(action.as_str())
            .fetch_one(pool)
            .await?
        }
        None => {
            sqlx::query(
                r#"
                SELECT COUNT(*) AS count FROM reward_records
                WHERE user_id = $1
                "#
            )
            .bind(user_id)
            .fetch_one(pool)
            .await?
        }
    };

    Ok(row.get("count"))
}

/// Sum the completed records for a user
///
/// This is the single source of truth for balance. Every read path that
/// needs a balance (history header, transfer sufficiency check, the
/// balance endpoint) goes through this sum; nothing caches it.
pub async fn sum_completed_by_user(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<i64, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT COALESCE(SUM(amount), 0)::BIGINT AS balance
        FROM reward_records
        WHERE user_id = $1 AND status = 'completed'
        "#
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(row.get("balance"))
}

/// Find a completed daily check-in inside a UTC day window
pub async fn find_checkin_in_day(
    pool: &PgPool,
    user_id: Uuid,
    day_start: DateTime<Utc>,
    day_end: DateTime<Utc>,
) -> Result<Option<RewardRecord>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT id, user_id, amount, action_type, reason, reference_id, reference_kind, status, created_at
        FROM reward_records
        WHERE user_id = $1
          AND action_type = 'daily_checkin'
          AND status = 'completed'
          AND created_at >= $2
          AND created_at < $3
        LIMIT 1
        "#
    )
    .bind(user_id)
    .bind(day_start)
    .bind(day_end)
    .fetch_optional(pool)
    .await?;

    Ok(row.as_ref().map(map_row))
}

/// Distinct UTC calendar days with a completed check-in, newest first
///
/// Bounded to a recent window; the streak calculator walks these days
/// backward from its anchor.
pub async fn recent_checkin_days(
    pool: &PgPool,
    user_id: Uuid,
    limit: i64,
) -> Result<Vec<NaiveDate>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT DISTINCT (created_at AT TIME ZONE 'UTC')::date AS day
        FROM reward_records
        WHERE user_id = $1
          AND action_type = 'daily_checkin'
          AND status = 'completed'
        ORDER BY day DESC
        LIMIT $2
        "#
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(|row| row.get("day")).collect())
}
