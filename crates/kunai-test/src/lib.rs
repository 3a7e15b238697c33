//! Kunai `WebDAV` server - integration test support.
//!
//! This crate re-exports the workspace crates to support integration
//! tests that use `kunai::` paths.

#![allow(ambiguous_glob_reexports)]

pub mod component {
    // Re-export core and engine modules at the component level
    pub use kunai_core::*;
    pub use kunai_engine::*;

    // Re-export config from both core and app
    pub mod config {
        pub use kunai_app::config::ConfigHandler;
        pub use kunai_core::config::*;
    }
}

// Re-export top-level modules for convenience
pub mod app {
    pub use kunai_app::*;

    pub mod api {
        pub use kunai_app::app::api::*;
    }
}

pub use kunai_rfc as rfc;
