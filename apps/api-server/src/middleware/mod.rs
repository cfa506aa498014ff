//! Middleware modules.

pub mod cors;
pub mod error;

#[cfg(feature = "auth")]
pub mod auth;
