//! # Quill Core
//!
//! The domain layer of the Quill blog.
//! Posts, categories, payload validation and the listing query builder live
//! here, with zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod query;
pub mod validation;

pub use error::{RepoError, ValidationError};
pub use query::{ListParams, Page, Pagination, PostFilter, PostQuery};
