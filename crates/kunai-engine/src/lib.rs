//! The `WebDAV` protocol engine.
//!
//! Turns method invocations into operations on an abstract resource
//! hierarchy supplied by a [`resource::Backend`], and produces the
//! status records the response serializer renders.

pub mod engine;
pub mod error;
pub mod memory;
pub mod props;
pub mod registry;
pub mod reporter;
pub mod resource;
pub mod traverse;
