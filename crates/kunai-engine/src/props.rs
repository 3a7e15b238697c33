//! Standard `DAV:` property handlers.

use std::sync::Arc;

use kunai_rfc::rfc::dav::core::{PropertyValue, QName, dav_props};

use crate::error::{EngineError, EngineResult};
use crate::registry::{PropertyHandler, PropertyRegistry};
use crate::resource::{Resource, collection_type, principal_type};

/// `DAV:resourcetype`
pub struct ResourceTypeProperty;

impl PropertyHandler for ResourceTypeProperty {
    fn name(&self) -> QName {
        dav_props::resourcetype()
    }

    fn get(&self, resource: &dyn Resource) -> EngineResult<Option<PropertyValue>> {
        Ok(Some(PropertyValue::ResourceType(resource.resource_types())))
    }
}

/// `DAV:displayname`
///
/// The only writable standard property. Backends that cannot rename
/// surface the write failure, which the PROPPATCH handler reports as a
/// per-property conflict.
pub struct DisplayNameProperty;

impl PropertyHandler for DisplayNameProperty {
    fn name(&self) -> QName {
        dav_props::displayname()
    }

    fn protected(&self) -> bool {
        false
    }

    fn get(&self, resource: &dyn Resource) -> EngineResult<Option<PropertyValue>> {
        Ok(resource.display_name().map(PropertyValue::Text))
    }

    fn set(&self, resource: &dyn Resource, value: &PropertyValue) -> EngineResult<()> {
        let name = match value {
            PropertyValue::Text(text) => text.as_str(),
            PropertyValue::Empty => "",
            _ => return Err(EngineError::PropertyNotWritable(self.name())),
        };
        resource.set_display_name(name)
    }

    fn remove(&self, resource: &dyn Resource) -> EngineResult<()> {
        resource.set_display_name("")
    }
}

/// `DAV:getetag`
pub struct GetEtagProperty;

impl PropertyHandler for GetEtagProperty {
    fn name(&self) -> QName {
        dav_props::getetag()
    }

    fn get(&self, resource: &dyn Resource) -> EngineResult<Option<PropertyValue>> {
        Ok(resource.etag().map(PropertyValue::Text))
    }
}

/// `DAV:getcontenttype`
pub struct GetContentTypeProperty;

impl PropertyHandler for GetContentTypeProperty {
    fn name(&self) -> QName {
        dav_props::getcontenttype()
    }

    fn get(&self, resource: &dyn Resource) -> EngineResult<Option<PropertyValue>> {
        Ok(resource.content_type().map(PropertyValue::Text))
    }
}

/// `DAV:getcontentlength`
pub struct GetContentLengthProperty;

impl PropertyHandler for GetContentLengthProperty {
    fn name(&self) -> QName {
        dav_props::getcontentlength()
    }

    fn get(&self, resource: &dyn Resource) -> EngineResult<Option<PropertyValue>> {
        Ok(resource
            .content_length()
            .and_then(|length| i64::try_from(length).ok())
            .map(PropertyValue::Integer))
    }
}

/// `DAV:creationdate`
pub struct CreationDateProperty;

impl PropertyHandler for CreationDateProperty {
    fn name(&self) -> QName {
        dav_props::creationdate()
    }

    fn get(&self, resource: &dyn Resource) -> EngineResult<Option<PropertyValue>> {
        Ok(resource
            .creation_date()
            .map(|created| PropertyValue::Text(created.format("%Y%m%dT%H%M%SZ").to_string())))
    }
}

/// `DAV:owner`
pub struct OwnerProperty;

impl PropertyHandler for OwnerProperty {
    fn name(&self) -> QName {
        dav_props::owner()
    }

    fn get(&self, resource: &dyn Resource) -> EngineResult<Option<PropertyValue>> {
        Ok(resource.owner_href().map(PropertyValue::Href))
    }
}

/// `DAV:current-user-principal`
///
/// Reports the configured principal href on every resource.
pub struct CurrentUserPrincipalProperty {
    href: String,
}

impl CurrentUserPrincipalProperty {
    #[must_use]
    pub fn new(href: impl Into<String>) -> Self {
        Self { href: href.into() }
    }
}

impl PropertyHandler for CurrentUserPrincipalProperty {
    fn name(&self) -> QName {
        dav_props::current_user_principal()
    }

    fn in_allprop(&self) -> bool {
        false
    }

    fn get(&self, _resource: &dyn Resource) -> EngineResult<Option<PropertyValue>> {
        Ok(Some(PropertyValue::Href(self.href.clone())))
    }
}

/// `DAV:principal-URL`, available on principal resources only.
pub struct PrincipalUrlProperty;

impl PropertyHandler for PrincipalUrlProperty {
    fn name(&self) -> QName {
        dav_props::principal_url()
    }

    fn in_allprop(&self) -> bool {
        false
    }

    fn resource_type(&self) -> Option<QName> {
        Some(principal_type())
    }

    fn get(&self, resource: &dyn Resource) -> EngineResult<Option<PropertyValue>> {
        Ok(resource
            .as_principal()
            .map(|principal| PropertyValue::Href(principal.principal_url())))
    }
}

/// `DAV:supported-report-set`
pub struct SupportedReportSetProperty {
    reports: Vec<QName>,
}

impl SupportedReportSetProperty {
    #[must_use]
    pub fn new(reports: Vec<QName>) -> Self {
        Self { reports }
    }
}

impl PropertyHandler for SupportedReportSetProperty {
    fn name(&self) -> QName {
        dav_props::supported_report_set()
    }

    fn in_allprop(&self) -> bool {
        false
    }

    fn resource_type(&self) -> Option<QName> {
        Some(collection_type())
    }

    fn get(&self, _resource: &dyn Resource) -> EngineResult<Option<PropertyValue>> {
        Ok(Some(PropertyValue::SupportedReports(self.reports.clone())))
    }
}

/// `DAV:supportedlock`
pub struct SupportedLockProperty;

impl PropertyHandler for SupportedLockProperty {
    fn name(&self) -> QName {
        dav_props::supportedlock()
    }

    fn get(&self, resource: &dyn Resource) -> EngineResult<Option<PropertyValue>> {
        Ok(Some(PropertyValue::LockEntries(resource.supported_locks())))
    }
}

/// `DAV:lockdiscovery`
pub struct LockDiscoveryProperty;

impl PropertyHandler for LockDiscoveryProperty {
    fn name(&self) -> QName {
        dav_props::lockdiscovery()
    }

    fn get(&self, resource: &dyn Resource) -> EngineResult<Option<PropertyValue>> {
        Ok(Some(PropertyValue::ActiveLocks(resource.active_locks())))
    }
}

/// ## Summary
/// Registers the standard `DAV:` property set.
///
/// `current_user_principal` is the configured principal href;
/// `reports` is the list of report names for `supported-report-set`.
pub fn register_standard_properties(
    registry: &mut PropertyRegistry,
    current_user_principal: &str,
    reports: Vec<QName>,
) {
    registry.register(Arc::new(ResourceTypeProperty));
    registry.register(Arc::new(DisplayNameProperty));
    registry.register(Arc::new(GetEtagProperty));
    registry.register(Arc::new(GetContentTypeProperty));
    registry.register(Arc::new(GetContentLengthProperty));
    registry.register(Arc::new(CreationDateProperty));
    registry.register(Arc::new(OwnerProperty));
    registry.register(Arc::new(CurrentUserPrincipalProperty::new(
        current_user_principal,
    )));
    registry.register(Arc::new(PrincipalUrlProperty));
    registry.register(Arc::new(SupportedReportSetProperty::new(reports)));
    registry.register(Arc::new(SupportedLockProperty));
    registry.register(Arc::new(LockDiscoveryProperty));
}
