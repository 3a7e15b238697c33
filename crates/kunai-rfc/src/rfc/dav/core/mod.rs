//! `WebDAV` XML types.
//!
//! This module defines the core types for `WebDAV` XML elements
//! used in `PROPFIND`, `PROPPATCH`, `REPORT`, and multistatus responses.

mod depth;
mod etag;
mod href;
mod lock;
mod multistatus;
mod namespace;
pub mod property;
mod propfind;
mod proppatch;
mod report;

pub use depth::Depth;
pub use etag::etag_matches;
pub use href::Href;
pub use lock::{ActiveLock, LockEntry, LockScope, LockType};
pub use multistatus::{
    DavErrorBody, Multistatus, NeedsMultistatus, PropOutcome, Status, StatusLine,
};
pub use namespace::{DAV_NS, Namespace, QName, dav_props};
pub use property::{DavProperty, ExpandedNode, PropertyValue};
pub use propfind::{PropfindRequest, PropfindType};
pub use proppatch::{PropertyUpdate, ProppatchRequest, SetOrRemove};
pub use report::{ExpandProperty, ExpandPropertyItem};
