//! Migration CLI tool.
//!
//! `migration seed` replaces the categories with the default set; every
//! other invocation is handed to the SeaORM migration CLI.

use anyhow::Context;
use sea_orm_migration::prelude::*;

use quill_core::domain::Category;
use quill_core::ports::CategoryRepository;
use quill_infra::{DatabaseConfig, DatabaseConnections, PostgresCategoryRepository};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt().with_env_filter("info").init();

    if std::env::args().nth(1).as_deref() == Some("seed") {
        return seed().await;
    }

    cli::run_cli(migration::Migrator).await;
    Ok(())
}

async fn seed() -> anyhow::Result<()> {
    let url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set to seed")?;
    let connections = DatabaseConnections::init(&DatabaseConfig {
        url,
        max_connections: 1,
        min_connections: 1,
    })
    .await
    .context("connecting to the database")?;

    let categories = Category::defaults();
    let count = categories.len();
    PostgresCategoryRepository::new(connections.main)
        .replace_all(categories)
        .await
        .context("Error seeding categories")?;

    tracing::info!(count, "Categories seeded successfully");
    Ok(())
}
