//! Client-side working set of posts and categories.

use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use quill_core::domain::{Category, PostView};
use quill_core::query::ListParams;
use quill_shared::dto::PostPayload;

use crate::api::{BlogApi, PostList};
use crate::error::ClientError;

/// Snapshot of everything the store holds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostState {
    pub posts: Vec<PostView>,
    pub categories: Vec<Category>,
    pub loading: bool,
    pub error: Option<String>,
}

/// Session-lifetime store. Every mutation is applied only after the server
/// acknowledges it; a failed request leaves the state untouched.
pub struct PostStore {
    api: Arc<dyn BlogApi>,
    state: RwLock<PostState>,
}

impl PostStore {
    pub fn new(api: Arc<dyn BlogApi>) -> Self {
        Self {
            api,
            state: RwLock::new(PostState::default()),
        }
    }

    pub async fn snapshot(&self) -> PostState {
        self.state.read().await.clone()
    }

    /// Replace the held posts with the page matching `params`.
    pub async fn fetch_posts(&self, params: &ListParams) -> Result<PostList, ClientError> {
        self.state.write().await.loading = true;

        let result = self.api.list_posts(params).await;

        let mut state = self.state.write().await;
        state.loading = false;
        match &result {
            Ok(list) => {
                state.posts = list.posts.clone();
                state.error = None;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Fetching posts failed");
                state.error = Some(
                    e.server_message()
                        .unwrap_or("Error fetching posts")
                        .to_string(),
                );
            }
        }
        result
    }

    pub async fn fetch_categories(&self) -> Result<(), ClientError> {
        match self.api.list_categories().await {
            Ok(categories) => {
                self.state.write().await.categories = categories;
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "Error fetching categories");
                Err(e)
            }
        }
    }

    /// Create a post and put it at the front of the list.
    pub async fn create_post(&self, payload: &PostPayload) -> Result<PostView, ClientError> {
        let created = self.api.create_post(payload).await?;
        self.state.write().await.posts.insert(0, created.clone());
        Ok(created)
    }

    /// Update a post and swap the stored copy for the server's.
    pub async fn update_post(
        &self,
        id: Uuid,
        payload: &PostPayload,
    ) -> Result<PostView, ClientError> {
        let updated = self.api.update_post(id, payload).await?;

        let mut state = self.state.write().await;
        if let Some(slot) = state.posts.iter_mut().find(|p| p.id == id) {
            *slot = updated.clone();
        }
        Ok(updated)
    }

    pub async fn delete_post(&self, id: Uuid) -> Result<(), ClientError> {
        self.api.delete_post(id).await?;
        self.state.write().await.posts.retain(|p| p.id != id);
        Ok(())
    }
}
