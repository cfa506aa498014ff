use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Category, Comment, Post, PostDraft, PostView};
use crate::error::RepoError;
use crate::query::{Page, PostQuery};

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Persist a new entity.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;

    /// Replace a stored entity. Fails with `NotFound` if it does not exist.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID. Fails with `NotFound` if it does not exist.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// One page of posts matching the query, newest first, with each
    /// category populated as `{id, name, slug}`.
    async fn list(&self, query: &PostQuery) -> Result<Page<PostView>, RepoError>;

    /// A single post with its category populated including the description.
    async fn find_view(&self, id: Uuid) -> Result<Option<PostView>, RepoError>;

    /// Overwrite the fields carried by `draft` in one write, leaving the
    /// comment thread untouched. Fails with `NotFound` if the post does not exist.
    async fn update_fields(&self, id: Uuid, draft: PostDraft) -> Result<(), RepoError>;

    /// Atomically append a comment. Fails with `NotFound` if the post does not exist.
    async fn append_comment(&self, id: Uuid, comment: Comment) -> Result<(), RepoError>;
}

/// Category repository.
#[async_trait]
pub trait CategoryRepository: BaseRepository<Category, Uuid> {
    /// All categories ordered by name ascending.
    async fn list_by_name(&self) -> Result<Vec<Category>, RepoError>;

    /// Drop every category and install `categories` in their place.
    async fn replace_all(&self, categories: Vec<Category>) -> Result<(), RepoError>;
}
