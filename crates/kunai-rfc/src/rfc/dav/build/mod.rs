//! `WebDAV` XML serialization.

mod multistatus;

pub use multistatus::{RenderedResponse, render_single, serialize_multistatus};
