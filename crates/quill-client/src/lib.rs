//! # Quill Client
//!
//! Typed access to the Quill REST API plus a client-side [`PostStore`]
//! that keeps the working set of posts and categories for a session.

pub mod api;
pub mod error;
pub mod store;

pub use api::{ApiClient, BlogApi, DEFAULT_BASE_URL, PostList};
pub use error::ClientError;
pub use store::{PostState, PostStore};
