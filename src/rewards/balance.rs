/**
 * Balance Aggregator
 *
 * A user's balance is the sum of their completed reward records,
 * recomputed on every read. No cached running total exists anywhere in
 * the schema, so the balance can never drift from the ledger. This
 * trades O(n) read cost for correctness; at this system's scale the
 * trade is acceptable.
 */

use sqlx::PgPool;
use uuid::Uuid;

use crate::rewards::store;

/// Get a user's current balance
///
/// Always recomputes from the record store; never trusts a cached
/// field. Every other read path that needs a balance (transfer
/// sufficiency, history) uses the same sum.
pub async fn get_balance(pool: &PgPool, user_id: Uuid) -> Result<i64, sqlx::Error> {
    store::sum_completed_by_user(pool, user_id).await
}
