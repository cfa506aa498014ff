//! PostgreSQL storage via SeaORM.

mod connections;
mod postgres_base;
mod postgres_repo;

pub mod entity;

pub use connections::{DatabaseConfig, DatabaseConnections};
pub use postgres_base::{PostgresBaseRepository, map_db_err};
pub use postgres_repo::{PostgresCategoryRepository, PostgresPostRepository};
