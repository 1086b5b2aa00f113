/**
 * Signup Handler
 *
 * This module implements the user registration handler for POST /api/auth/signup.
 *
 * # Registration Process
 *
 * 1. Validate username, email format and password length
 * 2. Check if user already exists
 * 3. Hash password using bcrypt
 * 4. Create user in database
 * 5. Grant the one-time signup reward (and the referrer's reward, if any)
 * 6. Generate JWT token
 * 7. Return token and user info
 *
 * # Validation
 *
 * - Username must be 3-30 chars, start with a letter, alphanumeric + underscore
 * - Email must contain '@' character (basic validation)
 * - Password must be at least 8 characters long
 * - Username and email must be unique
 *
 * # Rewards
 *
 * The signup bonus and referral bonus are granted through the earning
 * policy engine with the new user's ID as the idempotency reference, so
 * they can never be granted twice. Reward failures are logged but do
 * not fail the signup itself.
 */

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use bcrypt::{hash, DEFAULT_COST};
use sqlx::PgPool;

use crate::auth::handlers::types::{AuthResponse, SignupRequest, UserResponse};
use crate::auth::sessions::create_token;
use crate::auth::users::{create_user, get_user_by_email, get_user_by_username, User};
use crate::rewards::policy;
use crate::rewards::record::ActionType;

/// Validate username format
///
/// Usernames must be:
/// - 3-30 characters long
/// - Contain only alphanumeric characters and underscores
/// - Start with a letter
fn is_valid_username(username: &str) -> bool {
    if username.len() < 3 || username.len() > 30 {
        return false;
    }

    let mut chars = username.chars();

    // First character must be a letter
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }

    // Rest can be alphanumeric or underscore
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Grant the signup bonus to the new user and the referral bonus to the
/// referrer (if a valid referral code was supplied).
///
/// Both grants use the new user's ID as the reference, so retried
/// signups can never double-grant. Failures here are logged and
/// swallowed; the account is already created and the signup succeeds.
async fn grant_signup_rewards(pool: &PgPool, user: &User, referred_by: Option<&str>) {
    let user_ref = user.id.to_string();

    if let Err(e) = policy::earn(
        pool,
        user.id,
        ActionType::Signup,
        Some(&user_ref),
        Some("user"),
    )
    .await
    {
        tracing::warn!("Failed to grant signup reward to {}: {:?}", user.id, e);
    }

    let Some(referrer_name) = referred_by else {
        return;
    };

    match get_user_by_username(pool, referrer_name).await {
        Ok(Some(referrer)) if referrer.id != user.id => {
            if let Err(e) = policy::earn(
                pool,
                referrer.id,
                ActionType::Referral,
                Some(&user_ref),
                Some("user"),
            )
            .await
            {
                tracing::warn!("Failed to grant referral reward to {}: {:?}", referrer.id, e);
            }
        }
        Ok(_) => {
            tracing::warn!("Unknown referral code on signup: {}", referrer_name);
        }
        Err(e) => {
            tracing::error!("Referral lookup failed: {:?}", e);
        }
    }
}

/// Sign up handler
///
/// This handler processes user registration requests. It validates the
/// input, creates a new user account, grants the signup reward, and
/// returns a JWT token for immediate authentication.
///
/// # Arguments
///
/// * `State(pool)` - Database connection pool
/// * `Json(request)` - Signup request containing username, email and password
///
/// # Returns
///
/// JSON response with JWT token and user info, or an error status code
///
/// # Errors
///
/// * `400 Bad Request` - If username/email format is invalid or password is too short
/// * `409 Conflict` - If user with this username or email already exists
/// * `503 Service Unavailable` - If database is not configured
/// * `500 Internal Server Error` - If password hashing, user creation, or token generation fails
pub async fn signup(
    State(pool): State<Option<PgPool>>,
    Json(request): Json<SignupRequest>,
) -> Result<Json<AuthResponse>, (StatusCode, String)> {
    let pool = pool.ok_or_else(|| {
        tracing::error!("Database not configured");
        (StatusCode::SERVICE_UNAVAILABLE, "Database not configured".to_string())
    })?;
    tracing::info!("Signup request for username: {}, email: {}", request.username, request.email);

    // Validate username format
    if !is_valid_username(&request.username) {
        tracing::warn!("Invalid username format: {}", request.username);
        return Err((StatusCode::BAD_REQUEST, "Username must be 3-30 chars, start with a letter, and contain only letters, numbers, and underscores".to_string()));
    }

    // Validate email format (basic check)
    if !request.email.contains('@') {
        tracing::warn!("Invalid email format: {}", request.email);
        return Err((StatusCode::BAD_REQUEST, "Invalid email format".to_string()));
    }

    // Validate password length
    if request.password.len() < 8 {
        tracing::warn!("Password too short");
        return Err((StatusCode::BAD_REQUEST, "Password must be at least 8 characters".to_string()));
    }

    // Check if username already exists
    if let Ok(Some(_)) = get_user_by_username(&pool, &request.username).await {
        tracing::warn!("Username already exists: {}", request.username);
        return Err((StatusCode::CONFLICT, "Username already taken".to_string()));
    }

    // Check if email already exists
    if let Ok(Some(_)) = get_user_by_email(&pool, &request.email).await {
        tracing::warn!("Email already exists: {}", request.email);
        return Err((StatusCode::CONFLICT, "Email already registered".to_string()));
    }

    // Hash password
    let password_hash = hash(&request.password, DEFAULT_COST)
        .map_err(|e| {
            tracing::error!("Failed to hash password: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Server error".to_string())
        })?;

    // Create user
    let user = create_user(&pool, request.username.clone(), request.email.clone(), password_hash)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create user: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to create user".to_string())
        })?;

    // Grant signup / referral rewards (best-effort)
    grant_signup_rewards(&pool, &user, request.referred_by.as_deref()).await;

    // Create token
    let token = create_token(user.id, user.email.clone())
        .map_err(|e| {
            tracing::error!("Failed to create token: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Server error".to_string())
        })?;

    tracing::info!("User created successfully: {} ({})", user.username, user.email);

    Ok(Json(AuthResponse {
        token,
        user: UserResponse {
            id: user.id.to_string(),
            username: user.username,
            email: user.email,
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_usernames() {
        assert!(is_valid_username("alice"));
        assert!(is_valid_username("bob_42"));
        assert!(is_valid_username("Xyz"));
    }

    #[test]
    fn test_username_too_short_or_long() {
        assert!(!is_valid_username("ab"));
        assert!(!is_valid_username(&"a".repeat(31)));
    }

    #[test]
    fn test_username_must_start_with_letter() {
        assert!(!is_valid_username("1alice"));
        assert!(!is_valid_username("_alice"));
    }

    #[test]
    fn test_username_rejects_special_chars() {
        assert!(!is_valid_username("alice!"));
        assert!(!is_valid_username("al ice"));
        assert!(!is_valid_username("al-ice"));
    }
}
