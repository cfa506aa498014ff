//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::domain::Category;
use quill_core::ports::{CategoryRepository, PostRepository};
use quill_infra::memory::{InMemoryCategoryRepository, InMemoryPostRepository, InMemoryStore};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    /// Backend name reported by the health check.
    pub storage: &'static str,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    ///
    /// Falls back to an in-memory store, seeded with the default categories,
    /// when no database is configured or it cannot be reached.
    pub async fn new(config: &AppConfig) -> Self {
        #[cfg(feature = "postgres")]
        {
            if let Some(db_config) = config.database_config() {
                match quill_infra::DatabaseConnections::init(&db_config).await {
                    Ok(connections) => {
                        tracing::info!("Application state initialized (postgres)");
                        return Self::postgres(&connections);
                    }
                    Err(e) => {
                        tracing::error!(
                            "Failed to connect to database: {}. Using in-memory fallback.",
                            e
                        );
                    }
                }
            } else {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            }
        }

        #[cfg(not(feature = "postgres"))]
        {
            if config.database_url.is_some() {
                tracing::warn!("DATABASE_URL ignored: built without the postgres feature");
            }
        }

        tracing::info!("Application state initialized (memory)");
        Self::in_memory(InMemoryStore::with_categories(Category::defaults()))
    }

    /// State backed by the given in-memory store.
    pub fn in_memory(store: Arc<InMemoryStore>) -> Self {
        Self {
            posts: Arc::new(InMemoryPostRepository::new(store.clone())),
            categories: Arc::new(InMemoryCategoryRepository::new(store)),
            storage: "memory",
        }
    }

    #[cfg(feature = "postgres")]
    fn postgres(connections: &quill_infra::DatabaseConnections) -> Self {
        use quill_infra::{PostgresCategoryRepository, PostgresPostRepository};

        Self {
            posts: Arc::new(PostgresPostRepository::new(connections.main.clone())),
            categories: Arc::new(PostgresCategoryRepository::new(connections.main.clone())),
            storage: "postgres",
        }
    }
}
