/**
 * API Route Handlers
 *
 * This module defines route handlers for API endpoints, including:
 * - Authentication endpoints (signup, login, get current user)
 * - Reward ledger endpoints (earn, check-in, transfer, balance,
 *   history, streak)
 *
 * # Routes
 *
 * ## Authentication
 * - `POST /api/auth/signup` - User registration
 * - `POST /api/auth/login` - User login
 * - `GET /api/auth/me` - Get current user info
 *
 * ## Rewards
 * - `POST /api/rewards/earn` - Earn a reward for an action
 * - `POST /api/rewards/checkin` - Claim the daily check-in bonus
 * - `POST /api/rewards/transfer` - Transfer balance to another user
 * - `GET /api/rewards/balance` - Current balance
 * - `GET /api/rewards/history` - Paginated reward history
 * - `GET /api/rewards/streak` - Current check-in streak
 */

use axum::Router;

use crate::auth::{signup, login, get_me};
use crate::middleware::auth::auth_middleware;
use crate::rewards::handlers::{
    checkin, earn, get_balance, get_history, get_streak, transfer_tokens,
};
use crate::server::state::AppState;

/// Configure API routes
///
/// # Authentication
///
/// The reward routes and `/api/auth/me` require a JWT token in the
/// `Authorization` header; the auth middleware verifies it and attaches
/// the caller identity. Signup and login are public.
///
/// # Arguments
///
/// * `router` - The router to add routes to
/// * `app_state` - Application state, needed to build the auth layer
///
/// # Returns
///
/// Router with API routes configured
pub fn configure_api_routes(router: Router<AppState>, app_state: &AppState) -> Router<AppState> {
    // Routes behind the auth middleware
    let protected = Router::new()
        .route(
            "/api/auth/me",
            axum::routing::get(get_me),
        )
        .route(
            "/api/rewards/earn",
            axum::routing::post(earn),
        )
        .route(
            "/api/rewards/checkin",
            axum::routing::post(checkin),
        )
        .route(
            "/api/rewards/transfer",
            axum::routing::post(transfer_tokens),
        )
        .route(
            "/api/rewards/balance",
            axum::routing::get(get_balance),
        )
        .route(
            "/api/rewards/history",
            axum::routing::get(get_history),
        )
        .route(
            "/api/rewards/streak",
            axum::routing::get(get_streak),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            app_state.clone(),
            auth_middleware,
        ));

    router
        // Authentication endpoints (public)
        .route(
            "/api/auth/signup",
            axum::routing::post(signup),
        )
        .route(
            "/api/auth/login",
            axum::routing::post(login),
        )
        .merge(protected)
}
