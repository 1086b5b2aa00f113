/**
 * Get Current User Handler
 *
 * This module implements the handler for GET /api/auth/me, which returns
 * information about the currently authenticated user.
 *
 * # Authentication
 *
 * This endpoint sits behind the auth middleware; the `AuthUser`
 * extractor provides the verified caller identity.
 */

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use sqlx::PgPool;

use crate::auth::handlers::types::UserResponse;
use crate::middleware::auth::AuthUser;

/// Get current user handler
///
/// Returns information about the currently authenticated user, without
/// sensitive data (no password hash).
///
/// # Errors
///
/// * `401 Unauthorized` - If the caller is not authenticated
/// * `404 Not Found` - If user is not found in database
/// * `503 Service Unavailable` - If database is not configured
/// * `500 Internal Server Error` - If the database query fails
pub async fn get_me(
    State(pool): State<Option<PgPool>>,
    AuthUser(auth): AuthUser,
) -> Result<Json<UserResponse>, (StatusCode, String)> {
    let pool = pool.ok_or_else(|| {
        tracing::error!("Database not configured");
        (StatusCode::SERVICE_UNAVAILABLE, "Database not configured".to_string())
    })?;

    let user = crate::auth::users::get_user_by_id(&pool, auth.user_id)
        .await
        .map_err(|e| {
            tracing::error!("Database error: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Server error".to_string())
        })?
        .ok_or_else(|| {
            tracing::warn!("User not found: {}", auth.user_id);
            (StatusCode::NOT_FOUND, "User not found".to_string())
        })?;

    Ok(Json(UserResponse {
        id: user.id.to_string(),
        username: user.username,
        email: user.email,
    }))
}
