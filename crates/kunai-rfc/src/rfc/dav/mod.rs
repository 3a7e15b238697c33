//! `WebDAV` (RFC 4918, RFC 3253) types, parsing, and serialization.

pub mod build;
pub mod core;
pub mod parse;
