/**
 * Check-in Streak Calculator
 *
 * Computes the number of consecutive UTC calendar days with a daily
 * check-in, walking backward from the anchor day and breaking at the
 * first gap.
 *
 * # Anchor semantics
 *
 * The streak anchors to today when today has a check-in. When today is
 * not yet claimed, the anchor shifts to yesterday so the run that ended
 * yesterday still counts; the streak only drops to zero once a full
 * calendar day has been missed. This is applied consistently everywhere
 * a streak is reported.
 */

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::rewards::store;

/// How many recent check-in days the calculator looks at
const STREAK_WINDOW: i64 = 30;

/// Count consecutive check-in days from a sorted day list
///
/// # Arguments
///
/// * `days_desc` - Distinct check-in days, newest first
/// * `today` - The anchor calendar day ("now" in UTC)
///
/// # Returns
///
/// Length of the consecutive run ending today or yesterday; zero when
/// the most recent check-in is older than yesterday.
pub fn streak_from_days(days_desc: &[NaiveDate], today: NaiveDate) -> u32 {
    let Some(&most_recent) = days_desc.first() else {
        return 0;
    };

    // Anchor on today if claimed, otherwise allow the run to end yesterday
    let mut expected = if most_recent == today {
        today
    } else {
        match today.pred_opt() {
            Some(yesterday) if most_recent == yesterday => yesterday,
            _ => return 0,
        }
    };

    let mut streak = 0;
    for &day in days_desc {
        if day != expected {
            break;
        }
        streak += 1;
        match expected.pred_opt() {
            Some(prev) => expected = prev,
            None => break,
        }
    }

    streak
}

/// Get a user's current check-in streak
///
/// Fetches the most recent check-in days (bounded to a 30-day window)
/// and counts the consecutive run ending at `now`'s UTC day.
pub async fn get_checkin_streak(
    pool: &PgPool,
    user_id: Uuid,
    now: DateTime<Utc>,
) -> Result<u32, sqlx::Error> {
    let days = store::recent_checkin_days(pool, user_id, STREAK_WINDOW).await?;
    Ok(streak_from_days(&days, now.date_naive()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_three_consecutive_days() {
        let today = day(2025, 6, 15);
        let days = vec![day(2025, 6, 15), day(2025, 6, 14), day(2025, 6, 13)];
        assert_eq!(streak_from_days(&days, today), 3);
    }

    #[test]
    fn test_gap_breaks_streak() {
        let today = day(2025, 6, 15);
        // Checked in today, yesterday, then a miss on the 13th
        let days = vec![day(2025, 6, 15), day(2025, 6, 14), day(2025, 6, 12)];
        assert_eq!(streak_from_days(&days, today), 2);
    }

    #[test]
    fn test_no_checkins() {
        assert_eq!(streak_from_days(&[], day(2025, 6, 15)), 0);
    }

    #[test]
    fn test_only_today() {
        let today = day(2025, 6, 15);
        assert_eq!(streak_from_days(&[today], today), 1);
    }

    #[test]
    fn test_run_ending_yesterday_still_counts() {
        // Today not yet claimed; run through yesterday is preserved
        let today = day(2025, 6, 15);
        let days = vec![day(2025, 6, 14), day(2025, 6, 13), day(2025, 6, 12)];
        assert_eq!(streak_from_days(&days, today), 3);
    }

    #[test]
    fn test_last_checkin_before_yesterday_resets() {
        let today = day(2025, 6, 15);
        let days = vec![day(2025, 6, 13), day(2025, 6, 12)];
        assert_eq!(streak_from_days(&days, today), 0);
    }

    #[test]
    fn test_streak_across_month_boundary() {
        let today = day(2025, 7, 1);
        let days = vec![day(2025, 7, 1), day(2025, 6, 30), day(2025, 6, 29)];
        assert_eq!(streak_from_days(&days, today), 3);
    }
}
