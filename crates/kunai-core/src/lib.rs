//! Shared configuration and error types for the kunai `WebDAV` engine.

pub mod config;
pub mod error;
