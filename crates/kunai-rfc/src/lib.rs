//! `WebDAV` wire types, XML parsing, and XML serialization.

pub mod error;
pub mod rfc;
