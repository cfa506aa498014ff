//! # Quill Infrastructure
//!
//! Concrete implementations of the ports defined in `quill-core`.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory store only
//! - `postgres` - PostgreSQL storage via SeaORM
//! - `auth` - JWT token service

pub mod memory;

#[cfg(feature = "postgres")]
pub mod database;

#[cfg(feature = "auth")]
pub mod auth;

// Re-exports - In-Memory
pub use memory::{InMemoryCategoryRepository, InMemoryPostRepository, InMemoryStore};

#[cfg(feature = "postgres")]
pub use database::{
    DatabaseConfig, DatabaseConnections, PostgresCategoryRepository, PostgresPostRepository,
};

#[cfg(feature = "auth")]
pub use auth::{JwtConfig, JwtTokenService};
