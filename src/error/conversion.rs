/**
 * Error Conversion
 *
 * This module provides conversion implementations for reward ledger
 * errors, allowing them to be returned directly from Axum handlers.
 *
 * # Response Format
 *
 * Error responses are returned as JSON with the following structure:
 * ```json
 * {
 *   "error": "already checked in today, try again at 2026-01-02 00:00:00 UTC",
 *   "code": "already_claimed_today",
 *   "status": 409
 * }
 * ```
 *
 * The `code` field is stable and machine-readable; the `error` field is
 * the human-readable explanation of why the operation was rejected.
 */

use axum::{
    body::Body,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::error::types::RewardError;

impl IntoResponse for RewardError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();
        let message = self.message();

        if status.is_server_error() {
            tracing::error!("reward ledger error: {:?}", self);
        } else {
            tracing::debug!("reward ledger rejection: {}", message);
        }

        let body = serde_json::json!({
            "error": message,
            "code": code,
            "status": status.as_u16(),
        });

        Response::builder()
            .status(status)
            .header("Content-Type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap_or_else(|_| {
                format!(r#"{{"error":"{}","code":"{}","status":{}}}"#, message, code, status.as_u16())
            })))
            .unwrap_or_else(|_| {
                Response::builder()
                    .status(StatusCode::INTERNAL_SERVER_ERROR)
                    .body(Body::from("Internal Server Error"))
                    .unwrap()
            })
    }
}
