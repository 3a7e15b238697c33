//! Capability traits for backend resources.
//!
//! A backend object implements [`Resource`] and, when it supports the
//! corresponding capability, surfaces [`Collection`] or [`Principal`]
//! through the `as_*` hooks. The engine gates property and method
//! availability on these hooks instead of on concrete types.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use kunai_rfc::rfc::dav::core::{ActiveLock, LockEntry, QName};

use crate::error::{EngineError, EngineResult};

/// Resource type tag for collections.
#[must_use]
pub fn collection_type() -> QName {
    QName::dav("collection")
}

/// Resource type tag for principals.
#[must_use]
pub fn principal_type() -> QName {
    QName::dav("principal")
}

/// An addressable `WebDAV` object.
///
/// Resources are produced on demand by the [`Backend`] per request; the
/// engine never caches them across requests.
pub trait Resource: Send + Sync {
    /// Resource type tags, e.g. `DAV:collection`.
    fn resource_types(&self) -> Vec<QName>;

    /// Display name, if the resource has one.
    fn display_name(&self) -> Option<String>;

    /// Updates the display name.
    ///
    /// ## Errors
    /// Returns an error if the backend does not support renaming.
    fn set_display_name(&self, name: &str) -> EngineResult<()>;

    /// Creation timestamp.
    fn creation_date(&self) -> Option<DateTime<Utc>>;

    /// Content type of the body.
    fn content_type(&self) -> Option<String>;

    /// Content length of the body.
    fn content_length(&self) -> Option<u64>;

    /// Opaque ETag. Changes whenever the body changes.
    fn etag(&self) -> Option<String>;

    /// Owner principal href, if known.
    fn owner_href(&self) -> Option<String> {
        None
    }

    /// The resource body.
    ///
    /// ## Errors
    /// Returns an error if the backend cannot produce the body.
    fn body(&self) -> EngineResult<Vec<u8>>;

    /// Replaces the resource body.
    ///
    /// ## Errors
    /// Returns an error if the backend cannot store the body.
    fn set_body(&self, body: Vec<u8>, content_type: Option<String>) -> EngineResult<()>;

    /// Lock kinds this resource supports.
    fn supported_locks(&self) -> Vec<LockEntry> {
        Vec::new()
    }

    /// Locks currently held on this resource.
    fn active_locks(&self) -> Vec<ActiveLock> {
        Vec::new()
    }

    /// Collection capability, if present.
    fn as_collection(&self) -> Option<&dyn Collection> {
        None
    }

    /// Principal capability, if present.
    fn as_principal(&self) -> Option<&dyn Principal> {
        None
    }

    /// Returns whether this resource is a collection.
    fn is_collection(&self) -> bool {
        self.as_collection().is_some()
    }
}

/// A resource that contains members.
pub trait Collection: Resource {
    /// Enumerates (name, resource) pairs for all members.
    ///
    /// ## Errors
    /// Returns an error if the backend cannot enumerate members.
    fn members(&self) -> EngineResult<Vec<(String, Arc<dyn Resource>)>>;

    /// Fetches one member by name.
    ///
    /// ## Errors
    /// Returns an error if the backend lookup fails.
    fn member(&self, name: &str) -> EngineResult<Option<Arc<dyn Resource>>>;

    /// Creates or replaces a non-collection member.
    ///
    /// ## Errors
    /// Returns an error if the backend cannot create the member.
    fn create_member(
        &self,
        name: &str,
        body: Vec<u8>,
        content_type: Option<String>,
    ) -> EngineResult<Arc<dyn Resource>>;

    /// Deletes a member.
    ///
    /// ## Errors
    /// Returns an error if the member cannot be deleted.
    fn delete_member(&self, name: &str) -> EngineResult<()>;

    /// Creates a sub-collection.
    ///
    /// ## Errors
    /// Returns an error if the sub-collection cannot be created.
    fn create_collection(&self, name: &str) -> EngineResult<()>;

    /// Opaque token identifying the collection's current state.
    ///
    /// ## Errors
    /// Errors by default; backends that track changes override this.
    fn sync_token(&self) -> EngineResult<String> {
        Err(EngineError::Backend(
            "backend does not track collection changes".to_owned(),
        ))
    }

    /// Members changed since the state identified by the given token,
    /// as (name, resource) pairs with `None` marking a deleted member.
    ///
    /// ## Errors
    /// Errors by default; backends that track changes override this.
    fn differences_since(
        &self,
        _token: &str,
    ) -> EngineResult<Vec<(String, Option<Arc<dyn Resource>>)>> {
        Err(EngineError::Backend(
            "backend does not track collection changes".to_owned(),
        ))
    }
}

/// A resource describing a user or group.
pub trait Principal: Resource {
    /// The canonical principal URL.
    fn principal_url(&self) -> String;
}

/// The storage collaborator that maps URL paths to resources.
pub trait Backend: Send + Sync {
    /// Resolves a path to a resource, or `None` if nothing is there.
    fn resolve(&self, path: &str) -> Option<Arc<dyn Resource>>;
}
