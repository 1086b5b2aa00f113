/**
 * Transfer Engine
 *
 * Moves balance between two users by writing a matched debit/credit
 * pair of reward records. This is the only component that writes two
 * records for one logical operation, and the only one that writes
 * debits.
 *
 * # Atomicity
 *
 * Both legs are inserted inside a single database transaction: either
 * the sender is debited and the recipient credited, or neither record
 * exists. There is no observable state with only a debit.
 *
 * # Validation order
 *
 * Amount and self-transfer checks run before any database read;
 * recipient existence and balance sufficiency before any write. A
 * failed transfer writes nothing.
 */

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::users;
use crate::error::RewardError;
use crate::rewards::balance;

/// Validate transfer parameters that need no database access
///
/// Rejects non-positive amounts and self-transfers.
pub fn validate_transfer(from: Uuid, to: Uuid, amount: i64) -> Result<(), RewardError> {
    if amount <= 0 {
        return Err(RewardError::InvalidAmount { amount });
    }
    if from == to {
        return Err(RewardError::SelfTransfer);
    }
    Ok(())
}

/// Transfer balance from one user to another
///
/// # Algorithm
///
/// 1. Validate amount and distinct parties.
/// 2. Verify the recipient exists in the user directory.
/// 3. Compute the sender's balance; fail `InsufficientBalance` when it
///    is lower than `amount`.
/// 4. Inside one transaction, append the debit record (`-amount`,
///    reference = recipient) and the credit record (`+amount`,
///    reference = sender).
/// 5. Return the sender's recomputed balance.
///
/// # Returns
///
/// The sender's balance after the transfer.
pub async fn transfer(
    pool: &PgPool,
    from: Uuid,
    to: Uuid,
    amount: i64,
    note: Option<&str>,
) -> Result<i64, RewardError> {
    validate_transfer(from, to, amount)?;

    if !users::user_exists(pool, to).await? {
        tracing::warn!("Transfer to unknown user rejected: {} -> {}", from, to);
        return Err(RewardError::UserNotFound);
    }

    let sender_balance = balance::get_balance(pool, from).await?;
    if sender_balance < amount {
        tracing::debug!(
            "Transfer rejected, insufficient balance: user={} balance={} requested={}",
            from,
            sender_balance,
            amount
        );
        return Err(RewardError::InsufficientBalance {
            balance: sender_balance,
            requested: amount,
        });
    }

    let debit_reason = note
        .map(|n| n.to_string())
        .unwrap_or_else(|| format!("Transfer to {}", to));
    let credit_reason = note
        .map(|n| n.to_string())
        .unwrap_or_else(|| format!("Transfer from {}", from));
    let now = Utc::now();

    // Both legs commit together or not at all
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO reward_records
            (id, user_id, amount, action_type, reason, reference_id, reference_kind, status, created_at)
        VALUES ($1, $2, $3, 'transfer', $4, $5, 'user', 'completed', $6)
        "#
    )
    .bind(Uuid::new_v4())
    .bind(from)
    .bind(-amount)
    .bind(&debit_reason)
    .bind(to.to_string())
    .bind(now)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO reward_records
            (id, user_id, amount, action_type, reason, reference_id, reference_kind, status, created_at)
        VALUES ($1, $2, $3, 'transfer', $4, $5, 'user', 'completed', $6)
        "#
    )
    .bind(Uuid::new_v4())
    .bind(to)
    .bind(amount)
    .bind(&credit_reason)
    .bind(from.to_string())
    .bind(now)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!("Transfer completed: {} -> {} amount={}", from, to, amount);

    Ok(balance::get_balance(pool, from).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_rejects_zero_amount() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        assert_matches!(
            validate_transfer(a, b, 0),
            Err(RewardError::InvalidAmount { amount: 0 })
        );
    }

    #[test]
    fn test_rejects_negative_amount() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        assert_matches!(
            validate_transfer(a, b, -50),
            Err(RewardError::InvalidAmount { amount: -50 })
        );
    }

    #[test]
    fn test_rejects_self_transfer() {
        let a = Uuid::new_v4();
        assert_matches!(validate_transfer(a, a, 10), Err(RewardError::SelfTransfer));
    }

    #[test]
    fn test_accepts_valid_parameters() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        assert!(validate_transfer(a, b, 1).is_ok());
    }
}
