//! Storage layer for the league database
//!
//! This module provides a thin abstraction over an in-memory SQLite database,
//! organized into logical components:
//! - `schema`: Table, index and foreign-key definitions
//! - `models`: Typed records and their column mapping
//! - `store`: Connection lifecycle, bulk loading and export

pub mod models;
pub mod schema;
pub mod store;

#[cfg(test)]
mod tests;

// Re-export the main types and database struct for easy access
pub use models::*;
pub use store::LeagueDatabase;
