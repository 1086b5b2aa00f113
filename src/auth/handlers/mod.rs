/**
 * Authentication Handlers
 *
 * HTTP handlers for the authentication endpoints.
 */

/// Request/response types
pub mod types;

/// User registration handler
pub mod signup;

/// User authentication handler
pub mod login;

/// Get current user handler
pub mod me;

pub use signup::signup;
pub use login::login;
pub use me::get_me;
