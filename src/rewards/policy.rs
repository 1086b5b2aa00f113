/**
 * Earning Policy Engine
 *
 * Maps an action type to a reward amount (fixed or randomized range),
 * enforces duplicate-claim suppression via reference lookup, and
 * enforces the once-per-UTC-day cap on the daily check-in.
 *
 * # Amount randomization
 *
 * Range policies draw a fresh uniform integer per call. Repeated calls
 * for the same logical event are prevented by the idempotency
 * reference, not by determinism; tests assert amounts fall inside the
 * range rather than matching an exact value.
 *
 * # Failure semantics
 *
 * All failures are business-rule rejections reported synchronously to
 * the caller. No partial record is ever written: the single append is
 * the last step of a successful earn.
 */

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::RewardError;
use crate::rewards::record::{ActionType, NewRecord, RecordStatus, RewardRecord};
use crate::rewards::store;

/// How the reward amount for an action is determined
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewardPolicy {
    /// Every claim earns exactly this amount
    Fixed(i64),
    /// Every claim earns a uniform random amount in `[min, max]`
    Range { min: i64, max: i64 },
}

/// Look up the earning policy for an action
///
/// `Transfer` has no policy: transfer records are written only by the
/// transfer engine, never earned.
pub fn policy_for(action: ActionType) -> Option<RewardPolicy> {
    match action {
        ActionType::Post => Some(RewardPolicy::Fixed(50)),
        ActionType::Comment => Some(RewardPolicy::Fixed(10)),
        ActionType::Like => Some(RewardPolicy::Fixed(2)),
        ActionType::Share => Some(RewardPolicy::Fixed(15)),
        ActionType::DailyCheckin => Some(RewardPolicy::Range { min: 10, max: 50 }),
        ActionType::Referral => Some(RewardPolicy::Fixed(100)),
        ActionType::Signup => Some(RewardPolicy::Fixed(100)),
        ActionType::Other => Some(RewardPolicy::Fixed(5)),
        ActionType::Transfer => None,
    }
}

/// Draw the amount for a policy
///
/// Range policies draw a fresh uniform integer, inclusive of both
/// bounds, on every call.
pub fn draw_amount(policy: RewardPolicy) -> i64 {
    match policy {
        RewardPolicy::Fixed(amount) => amount,
        RewardPolicy::Range { min, max } => rand::thread_rng().gen_range(min..=max),
    }
}

/// UTC calendar-day boundaries containing `now`: `[start, end)`
///
/// `end` is the next UTC midnight, which is also when a rejected daily
/// check-in becomes claimable again.
pub fn utc_day_bounds(now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = now
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .expect("midnight is always a valid time")
        .and_utc();
    (start, start + Duration::days(1))
}

/// Human-readable reason line for an earned record
fn reason_for(action: ActionType) -> &'static str {
    match action {
        ActionType::Post => "Reward for publishing a post",
        ActionType::Comment => "Reward for commenting",
        ActionType::Like => "Reward for liking a post",
        ActionType::Share => "Reward for sharing a post",
        ActionType::DailyCheckin => "Daily check-in bonus",
        ActionType::Referral => "Referral bonus",
        ActionType::Signup => "Signup bonus",
        ActionType::Transfer => "Transfer",
        ActionType::Other => "Reward",
    }
}

/// Earn a reward for an action
///
/// # Algorithm
///
/// 1. Look up the policy for `action` (fail `InvalidActionType` when
///    the action is not earnable).
/// 2. If a reference is supplied, check for an existing record with the
///    same (user, action, reference) tuple (fail `DuplicateClaim`).
/// 3. For `daily_checkin`, fail `AlreadyClaimedToday` when a completed
///    check-in already exists in the current UTC day; the error carries
///    the next UTC midnight.
/// 4. Append one `completed` record with the drawn amount.
///
/// The pre-checks make rejections friendly and ordered; the store's
/// unique index is what actually guarantees at-most-once earning under
/// concurrency.
pub async fn earn(
    pool: &PgPool,
    user_id: Uuid,
    action: ActionType,
    reference_id: Option<&str>,
    reference_kind: Option<&str>,
) -> Result<RewardRecord, RewardError> {
    let policy = policy_for(action).ok_or_else(|| RewardError::InvalidActionType {
        action: action.as_str().to_string(),
    })?;

    if let Some(reference) = reference_id {
        if store::find_by_reference(pool, user_id, action, reference)
            .await?
            .is_some()
        {
            tracing::debug!(
                "Duplicate claim rejected: user={} action={} reference={}",
                user_id,
                action.as_str(),
                reference
            );
            return Err(RewardError::DuplicateClaim {
                action: action.as_str().to_string(),
            });
        }
    }

    if action == ActionType::DailyCheckin {
        let (day_start, day_end) = utc_day_bounds(Utc::now());
        if store::find_checkin_in_day(pool, user_id, day_start, day_end)
            .await?
            .is_some()
        {
            tracing::debug!("Daily check-in already claimed: user={}", user_id);
            return Err(RewardError::AlreadyClaimedToday { next_reset: day_end });
        }
    }

    let amount = draw_amount(policy);

    let record = store::append_record(
        pool,
        &NewRecord {
            user_id,
            amount,
            action_type: action,
            reason: reason_for(action).to_string(),
            reference_id: reference_id.map(|s| s.to_string()),
            reference_kind: reference_kind.map(|s| s.to_string()),
            status: RecordStatus::Completed,
        },
    )
    .await?;

    tracing::info!(
        "Reward earned: user={} action={} amount={}",
        user_id,
        action.as_str(),
        amount
    );

    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_every_earnable_action_has_a_policy() {
        for action in [
            ActionType::Post,
            ActionType::Comment,
            ActionType::Like,
            ActionType::Share,
            ActionType::DailyCheckin,
            ActionType::Referral,
            ActionType::Signup,
            ActionType::Other,
        ] {
            assert!(policy_for(action).is_some(), "missing policy for {:?}", action);
        }
    }

    #[test]
    fn test_transfer_is_not_earnable() {
        assert_eq!(policy_for(ActionType::Transfer), None);
    }

    #[test]
    fn test_fixed_policy_draws_exact_amount() {
        assert_eq!(draw_amount(RewardPolicy::Fixed(50)), 50);
        assert_eq!(draw_amount(RewardPolicy::Fixed(0)), 0);
    }

    #[test]
    fn test_range_policy_stays_in_bounds() {
        let policy = RewardPolicy::Range { min: 50, max: 200 };
        for _ in 0..1000 {
            let amount = draw_amount(policy);
            assert!((50..=200).contains(&amount), "amount {} out of range", amount);
        }
    }

    #[test]
    fn test_range_policy_single_point() {
        let policy = RewardPolicy::Range { min: 7, max: 7 };
        assert_eq!(draw_amount(policy), 7);
    }

    #[test]
    fn test_utc_day_bounds() {
        let now = Utc.with_ymd_and_hms(2025, 6, 15, 13, 45, 12).unwrap();
        let (start, end) = utc_day_bounds(now);
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 6, 15, 0, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2025, 6, 16, 0, 0, 0).unwrap());
        assert!(start <= now && now < end);
    }

    #[test]
    fn test_utc_day_bounds_at_midnight() {
        let now = Utc.with_ymd_and_hms(2025, 6, 15, 0, 0, 0).unwrap();
        let (start, end) = utc_day_bounds(now);
        assert_eq!(start, now);
        assert_eq!(end, Utc.with_ymd_and_hms(2025, 6, 16, 0, 0, 0).unwrap());
    }
}
