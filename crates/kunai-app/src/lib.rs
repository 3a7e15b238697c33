//! HTTP front end for the Kunai `WebDAV` engine.

pub mod app;
pub mod config;
pub mod engine_handler;
pub mod error;
