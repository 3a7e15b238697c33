//! DAV property types.

use super::lock::{ActiveLock, LockEntry};
use super::multistatus::Status;
use super::namespace::QName;

/// A DAV property with name and optional value.
#[derive(Debug, Clone)]
pub struct DavProperty {
    /// The property name.
    pub name: QName,
    /// The property value (if known).
    pub value: Option<PropertyValue>,
}

impl DavProperty {
    /// Creates a property with no value (for 404 responses).
    #[must_use]
    pub fn not_found(name: QName) -> Self {
        Self { name, value: None }
    }

    /// Creates a property with a text value.
    #[must_use]
    pub fn text(name: QName, value: impl Into<String>) -> Self {
        Self {
            name,
            value: Some(PropertyValue::Text(value.into())),
        }
    }

    /// Creates a property with an href value.
    #[must_use]
    pub fn href(name: QName, href: impl Into<String>) -> Self {
        Self {
            name,
            value: Some(PropertyValue::Href(href.into())),
        }
    }

    /// Creates a property with multiple href values.
    #[must_use]
    pub fn href_set(name: QName, hrefs: Vec<String>) -> Self {
        Self {
            name,
            value: Some(PropertyValue::HrefSet(hrefs)),
        }
    }

    /// Creates a property with an integer value.
    #[must_use]
    pub fn integer(name: QName, value: i64) -> Self {
        Self {
            name,
            value: Some(PropertyValue::Integer(value)),
        }
    }

    /// Creates a resourcetype property for a collection.
    #[must_use]
    pub fn collection_resourcetype(types: Vec<QName>) -> Self {
        Self {
            name: QName::dav("resourcetype"),
            value: Some(PropertyValue::ResourceType(types)),
        }
    }

    /// Creates a resourcetype property for a non-collection.
    #[must_use]
    pub fn resource_resourcetype() -> Self {
        Self {
            name: QName::dav("resourcetype"),
            value: Some(PropertyValue::ResourceType(Vec::new())),
        }
    }

    /// Creates an empty property.
    #[must_use]
    pub fn empty(name: QName) -> Self {
        Self {
            name,
            value: Some(PropertyValue::Empty),
        }
    }

    /// Creates a property with raw XML content.
    #[must_use]
    pub fn xml(name: QName, xml: impl Into<String>) -> Self {
        Self {
            name,
            value: Some(PropertyValue::Xml(xml.into())),
        }
    }

    /// Returns the hrefs referenced by this property's value, if any.
    ///
    /// Used by the expand-property report to find expansion targets.
    #[must_use]
    pub fn hrefs(&self) -> Vec<&str> {
        match &self.value {
            Some(PropertyValue::Href(href)) => vec![href.as_str()],
            Some(PropertyValue::HrefSet(hrefs)) => hrefs.iter().map(String::as_str).collect(),
            _ => Vec::new(),
        }
    }
}

/// A property value.
#[derive(Debug, Clone)]
pub enum PropertyValue {
    /// Empty element.
    Empty,
    /// Text content.
    Text(String),
    /// Single href.
    Href(String),
    /// Multiple hrefs.
    HrefSet(Vec<String>),
    /// Integer value.
    Integer(i64),
    /// Resource types (collection, principal, etc.).
    ResourceType(Vec<QName>),
    /// Supported report set.
    SupportedReports(Vec<QName>),
    /// Supported lock entries.
    LockEntries(Vec<LockEntry>),
    /// Currently held locks.
    ActiveLocks(Vec<ActiveLock>),
    /// Expanded href values produced by the expand-property report.
    Expanded(Vec<ExpandedNode>),
    /// Raw XML content.
    Xml(String),
}

impl PropertyValue {
    /// Returns the value as text if applicable.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) | Self::Xml(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the value as an href if applicable.
    #[must_use]
    pub fn as_href(&self) -> Option<&str> {
        match self {
            Self::Href(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the value as an integer if applicable.
    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }
}

/// One node inside an expanded href-valued property.
///
/// Hrefs that did not resolve to a resource stay as bare hrefs. Hrefs
/// that resolved carry the nested property tree for that resource.
#[derive(Debug, Clone)]
pub enum ExpandedNode {
    /// An unexpanded href.
    Href(String),
    /// A nested response for a resolved href.
    Response(Box<Status>),
}
