//! Shared test utilities

pub mod database;
