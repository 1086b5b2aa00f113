/**
 * Routes Module
 *
 * HTTP route configuration and router assembly.
 */

/// Main router creation
pub mod router;

/// API route configuration
pub mod api_routes;

pub use router::create_router;
