//! In-memory store - used when no database is configured.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use quill_core::domain::{Category, Comment, Post, PostDraft, PostView};
use quill_core::error::RepoError;
use quill_core::ports::{BaseRepository, CategoryRepository, PostRepository};
use quill_core::query::{Page, PostQuery};

/// Posts and categories held in insertion order behind async RwLocks.
///
/// Note: Data is lost on process restart.
#[derive(Default)]
pub struct InMemoryStore {
    posts: RwLock<Vec<Post>>,
    categories: RwLock<Vec<Category>>,
}

impl InMemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// A store pre-populated with `categories`.
    pub fn with_categories(categories: Vec<Category>) -> Arc<Self> {
        Arc::new(Self {
            posts: RwLock::default(),
            categories: RwLock::new(categories),
        })
    }

    async fn populate(&self, post: Post, detail: bool) -> PostView {
        let categories = self.categories.read().await;
        let category = categories
            .iter()
            .find(|c| c.id == post.category_id)
            .map(|c| if detail { c.detail() } else { c.summary() });
        post.into_view(category)
    }
}

/// Post repository over an [`InMemoryStore`].
#[derive(Clone)]
pub struct InMemoryPostRepository {
    store: Arc<InMemoryStore>,
}

impl InMemoryPostRepository {
    pub fn new(store: Arc<InMemoryStore>) -> Self {
        Self { store }
    }
}

/// Category repository over an [`InMemoryStore`].
#[derive(Clone)]
pub struct InMemoryCategoryRepository {
    store: Arc<InMemoryStore>,
}

impl InMemoryCategoryRepository {
    pub fn new(store: Arc<InMemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let posts = self.store.posts.read().await;
        Ok(posts.iter().find(|p| p.id == id).cloned())
    }

    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        let mut posts = self.store.posts.write().await;
        if posts.iter().any(|p| p.id == post.id) {
            return Err(RepoError::Constraint("Post already exists".to_string()));
        }
        posts.push(post.clone());
        Ok(post)
    }

    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        let mut posts = self.store.posts.write().await;
        let slot = posts
            .iter_mut()
            .find(|p| p.id == post.id)
            .ok_or(RepoError::NotFound)?;
        *slot = post.clone();
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut posts = self.store.posts.write().await;
        let index = posts
            .iter()
            .position(|p| p.id == id)
            .ok_or(RepoError::NotFound)?;
        posts.remove(index);
        Ok(())
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn list(&self, query: &PostQuery) -> Result<Page<PostView>, RepoError> {
        if query.filter.is_unsatisfiable() {
            return Ok(Page::empty());
        }

        let mut matching: Vec<Post> = {
            let posts = self.store.posts.read().await;
            posts
                .iter()
                .filter(|p| query.filter.matches(p))
                .cloned()
                .collect()
        };
        // Stable sort keeps insertion order among equal timestamps.
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = matching.len() as u64;
        let skip = usize::try_from(query.skip()).unwrap_or(usize::MAX);
        let limit = usize::try_from(query.limit).unwrap_or(usize::MAX);

        let mut items = Vec::new();
        for post in matching.into_iter().skip(skip).take(limit) {
            items.push(self.store.populate(post, false).await);
        }

        Ok(Page { items, total })
    }

    async fn find_view(&self, id: Uuid) -> Result<Option<PostView>, RepoError> {
        match self.find_by_id(id).await? {
            Some(post) => Ok(Some(self.store.populate(post, true).await)),
            None => Ok(None),
        }
    }

    async fn update_fields(&self, id: Uuid, draft: PostDraft) -> Result<(), RepoError> {
        let mut posts = self.store.posts.write().await;
        let post = posts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(RepoError::NotFound)?;
        post.apply(draft);
        Ok(())
    }

    async fn append_comment(&self, id: Uuid, comment: Comment) -> Result<(), RepoError> {
        let mut posts = self.store.posts.write().await;
        let post = posts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(RepoError::NotFound)?;
        post.comments.push(comment);
        post.updated_at = chrono::Utc::now();
        Ok(())
    }
}

#[async_trait]
impl BaseRepository<Category, Uuid> for InMemoryCategoryRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, RepoError> {
        let categories = self.store.categories.read().await;
        Ok(categories.iter().find(|c| c.id == id).cloned())
    }

    async fn insert(&self, category: Category) -> Result<Category, RepoError> {
        let mut categories = self.store.categories.write().await;
        if categories.iter().any(|c| c.name == category.name) {
            return Err(RepoError::Constraint(format!(
                "duplicate category name `{}`",
                category.name
            )));
        }
        categories.push(category.clone());
        Ok(category)
    }

    async fn update(&self, category: Category) -> Result<Category, RepoError> {
        let mut categories = self.store.categories.write().await;
        if categories
            .iter()
            .any(|c| c.name == category.name && c.id != category.id)
        {
            return Err(RepoError::Constraint(format!(
                "duplicate category name `{}`",
                category.name
            )));
        }
        let slot = categories
            .iter_mut()
            .find(|c| c.id == category.id)
            .ok_or(RepoError::NotFound)?;
        *slot = category.clone();
        Ok(category)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut categories = self.store.categories.write().await;
        let index = categories
            .iter()
            .position(|c| c.id == id)
            .ok_or(RepoError::NotFound)?;
        categories.remove(index);
        Ok(())
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn list_by_name(&self) -> Result<Vec<Category>, RepoError> {
        let mut categories = self.store.categories.read().await.clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn replace_all(&self, categories: Vec<Category>) -> Result<(), RepoError> {
        *self.store.categories.write().await = categories;
        Ok(())
    }
}
