//! # Quill API Server
//!
//! REST backend for the Quill blog: posts, comments and categories under `/api`.

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod state;
pub mod telemetry;
