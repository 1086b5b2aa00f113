/**
 * Login Handler
 *
 * This module implements the user authentication handler for POST /api/auth/login.
 *
 * # Authentication Process
 *
 * 1. Look up user by username (or email)
 * 2. Verify password using bcrypt
 * 3. Generate JWT token
 * 4. Return token and user info
 *
 * # Security
 *
 * - Passwords are verified using bcrypt
 * - Invalid credentials return 401 Unauthorized (no information leakage)
 * - JWT tokens are generated with 30-day expiration
 * - User passwords are never returned in responses
 */

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use bcrypt::verify;
use sqlx::PgPool;

use crate::auth::handlers::types::{AuthResponse, LoginRequest, UserResponse};
use crate::auth::sessions::create_token;
use crate::auth::users::{get_user_by_email, get_user_by_username};

/// Login handler
///
/// This handler processes user authentication requests. It verifies the
/// username and password, and returns a JWT token if authentication succeeds.
///
/// # Arguments
///
/// * `State(pool)` - Database connection pool
/// * `Json(request)` - Login request containing username and password
///
/// # Returns
///
/// JSON response with JWT token and user info, or an error status code
///
/// # Errors
///
/// * `401 Unauthorized` - If user is not found or password is incorrect
/// * `503 Service Unavailable` - If database is not configured
/// * `500 Internal Server Error` - If database query or token generation fails
pub async fn login(
    State(pool): State<Option<PgPool>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, (StatusCode, String)> {
    let pool = pool.ok_or_else(|| {
        tracing::error!("Database not configured");
        (StatusCode::SERVICE_UNAVAILABLE, "Database not configured".to_string())
    })?;
    tracing::info!("Login request for: {}", request.username);

    // Try email lookup when the identifier looks like one, otherwise username
    let user = if request.username.contains('@') {
        get_user_by_email(&pool, &request.username).await
    } else {
        get_user_by_username(&pool, &request.username).await
    };

    let user = user
        .map_err(|e| {
            tracing::error!("Database error: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Server error".to_string())
        })?
        .ok_or_else(|| {
            tracing::warn!("User not found: {}", request.username);
            (StatusCode::UNAUTHORIZED, "Invalid credentials".to_string())
        })?;

    // Verify password
    let valid = verify(&request.password, &user.password_hash)
        .map_err(|e| {
            tracing::error!("Password verification error: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Server error".to_string())
        })?;

    if !valid {
        tracing::warn!("Invalid password for user: {}", request.username);
        return Err((StatusCode::UNAUTHORIZED, "Invalid credentials".to_string()));
    }

    // Create token
    let token = create_token(user.id, user.email.clone())
        .map_err(|e| {
            tracing::error!("Failed to create token: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Server error".to_string())
        })?;

    tracing::info!("User logged in successfully: {} ({})", user.username, user.email);

    Ok(Json(AuthResponse {
        token,
        user: UserResponse {
            id: user.id.to_string(),
            username: user.username,
            email: user.email,
        },
    }))
}
