//! RFC implementations.

pub mod dav;
