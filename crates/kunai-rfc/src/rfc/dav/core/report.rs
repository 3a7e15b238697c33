//! REPORT request types (RFC 3253).

use super::namespace::QName;

/// An expand-property report request.
#[derive(Debug, Clone, Default)]
pub struct ExpandProperty {
    /// Top-level properties to expand.
    pub items: Vec<ExpandPropertyItem>,
}

/// One `DAV:property` element of an expand-property request.
///
/// The nested items apply to every resource found behind an href in
/// this property's value.
#[derive(Debug, Clone)]
pub struct ExpandPropertyItem {
    /// The property to look up.
    pub name: QName,
    /// Properties to expand on each resolved href target.
    pub nested: Vec<ExpandPropertyItem>,
}

impl ExpandPropertyItem {
    /// Creates a leaf item with no nested expansion.
    #[must_use]
    pub fn leaf(name: QName) -> Self {
        Self {
            name,
            nested: Vec::new(),
        }
    }

    /// Creates an item with nested expansion.
    #[must_use]
    pub fn nested(name: QName, nested: Vec<ExpandPropertyItem>) -> Self {
        Self { name, nested }
    }
}
