//! The property registry.
//!
//! Handlers are registered once at engine construction and shared
//! read-only across requests, so lookups need no synchronization.

use std::collections::HashMap;
use std::sync::Arc;

use kunai_rfc::rfc::dav::core::{DavProperty, PropOutcome, PropertyValue, QName};

use crate::error::{EngineError, EngineResult};
use crate::resource::Resource;

/// Reads and optionally writes one named property on any resource
/// whose type tags satisfy [`PropertyHandler::resource_type`].
pub trait PropertyHandler: Send + Sync {
    /// The property's qualified name.
    fn name(&self) -> QName;

    /// Whether this property is part of an allprop enumeration.
    fn in_allprop(&self) -> bool {
        true
    }

    /// Whether this property is read-only.
    fn protected(&self) -> bool {
        true
    }

    /// Restricts the property to resources carrying this type tag.
    fn resource_type(&self) -> Option<QName> {
        None
    }

    /// Reads the value. `Ok(None)` means not found on this resource.
    ///
    /// ## Errors
    /// Any error is fatal to the request, never folded into a 404.
    fn get(&self, resource: &dyn Resource) -> EngineResult<Option<PropertyValue>>;

    /// Writes the value.
    ///
    /// ## Errors
    /// Returns [`EngineError::PropertyNotWritable`] unless overridden.
    fn set(&self, resource: &dyn Resource, value: &PropertyValue) -> EngineResult<()> {
        let _ = (resource, value);
        Err(EngineError::PropertyNotWritable(self.name()))
    }

    /// Removes the property.
    ///
    /// ## Errors
    /// Returns [`EngineError::PropertyNotWritable`] unless overridden.
    fn remove(&self, resource: &dyn Resource) -> EngineResult<()> {
        let _ = resource;
        Err(EngineError::PropertyNotWritable(self.name()))
    }
}

/// Name-keyed catalog of property handlers.
#[derive(Default)]
pub struct PropertyRegistry {
    by_name: HashMap<QName, Arc<dyn PropertyHandler>>,
}

impl PropertyRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler. A duplicate name overwrites the previous one.
    pub fn register(&mut self, handler: Arc<dyn PropertyHandler>) {
        self.by_name.insert(handler.name(), handler);
    }

    /// Returns the handler for a name, if registered.
    #[must_use]
    pub fn handler(&self, name: &QName) -> Option<&Arc<dyn PropertyHandler>> {
        self.by_name.get(name)
    }

    /// Returns all registered property names.
    #[must_use]
    pub fn names(&self) -> Vec<QName> {
        self.by_name.keys().cloned().collect()
    }

    /// ## Summary
    /// Reads one property on one resource.
    ///
    /// Unknown names, resource-type filter mismatches, and per-resource
    /// absence all yield a 404 outcome. Handler failures are engine
    /// errors and propagate.
    ///
    /// ## Errors
    /// Returns an error when the handler's read operation fails.
    pub fn get(&self, resource: &dyn Resource, name: &QName) -> EngineResult<PropOutcome> {
        let Some(handler) = self.by_name.get(name) else {
            tracing::warn!(property = %name, "Client requested unknown property");
            return Ok(PropOutcome::not_found(name.clone()));
        };

        if let Some(required) = handler.resource_type()
            && !resource.resource_types().contains(&required)
        {
            return Ok(PropOutcome::not_found(name.clone()));
        }

        match handler.get(resource)? {
            Some(value) => Ok(PropOutcome::found(DavProperty {
                name: name.clone(),
                value: Some(value),
            })),
            None => Ok(PropOutcome::not_found(name.clone())),
        }
    }

    /// ## Summary
    /// Reads a list of properties, preserving input order.
    ///
    /// ## Errors
    /// Returns an error when any handler's read operation fails.
    pub fn get_all(
        &self,
        resource: &dyn Resource,
        names: &[QName],
    ) -> EngineResult<Vec<PropOutcome>> {
        names.iter().map(|name| self.get(resource, name)).collect()
    }
}
