//! REPORT request XML parsing.

use quick_xml::Reader;
use quick_xml::events::Event;

use super::error::{ParseError, ParseResult};
use crate::rfc::dav::core::{ExpandProperty, ExpandPropertyItem, Namespace, QName};

/// Reads the root element name of a REPORT request body.
///
/// ## Summary
/// The root element's qualified name selects which reporter handles
/// the request. The body itself is handed to the reporter unparsed.
///
/// ## Errors
/// Returns an error if the XML is malformed or has no root element.
pub fn report_root_name(xml: &[u8]) -> ParseResult<QName> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut namespaces: Vec<(String, String)> = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e) | Event::Empty(ref e)) => {
                collect_namespaces(e, &mut namespaces)?;
                return resolve_qname(e, &namespaces);
            }
            Ok(Event::Eof) => {
                return Err(ParseError::missing_element("report root element"));
            }
            Err(e) => return Err(ParseError::xml(e.to_string())),
            _ => {}
        }
        buf.clear();
    }
}

/// Parses an expand-property report body (RFC 3253 §3.8).
///
/// ## Summary
/// Each `DAV:property` element names a property via its `name` and
/// optional `namespace` attributes (defaulting to `DAV:`). Nested
/// `DAV:property` elements give the properties to expand on every
/// resource an href in the outer property's value resolves to.
///
/// ## Errors
/// Returns an error if the XML is malformed or a `property` element
/// lacks a `name` attribute.
pub fn parse_expand_property(xml: &[u8]) -> ParseResult<ExpandProperty> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut roots: Vec<ExpandPropertyItem> = Vec::new();
    // One frame per open <property> element.
    let mut stack: Vec<(QName, Vec<ExpandPropertyItem>)> = Vec::new();

    loop {
        buf.clear();
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let local_name_bytes = e.local_name();
                let local_name = std::str::from_utf8(local_name_bytes.as_ref())?;

                if local_name == "property" {
                    stack.push((property_qname(e)?, Vec::new()));
                }
            }
            Ok(Event::Empty(ref e)) => {
                let local_name_bytes = e.local_name();
                let local_name = std::str::from_utf8(local_name_bytes.as_ref())?;

                if local_name == "property" {
                    let item = ExpandPropertyItem::leaf(property_qname(e)?);
                    match stack.last_mut() {
                        Some((_, children)) => children.push(item),
                        None => roots.push(item),
                    }
                }
            }
            Ok(Event::End(ref e)) => {
                let local_name_bytes = e.local_name();
                let local_name = std::str::from_utf8(local_name_bytes.as_ref())?;

                if local_name == "property" {
                    let Some((name, nested)) = stack.pop() else {
                        return Err(ParseError::unexpected_element("property"));
                    };
                    let item = ExpandPropertyItem::nested(name, nested);
                    match stack.last_mut() {
                        Some((_, children)) => children.push(item),
                        None => roots.push(item),
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ParseError::xml(e.to_string())),
            _ => {}
        }
    }

    Ok(ExpandProperty { items: roots })
}

/// Reads the property name from a `DAV:property` element's attributes.
fn property_qname(e: &quick_xml::events::BytesStart<'_>) -> ParseResult<QName> {
    let mut name: Option<String> = None;
    let mut namespace: Option<String> = None;

    for attr in e.attributes().flatten() {
        let key = std::str::from_utf8(attr.key.as_ref())?;
        let value = std::str::from_utf8(&attr.value)?;
        match key {
            "name" => name = Some(value.to_owned()),
            "namespace" => namespace = Some(value.to_owned()),
            _ => {}
        }
    }

    let name = name.ok_or_else(|| ParseError::missing_attribute("name"))?;
    let namespace = namespace.unwrap_or_else(|| "DAV:".to_owned());

    Ok(QName::new(Namespace::new(namespace), name))
}

/// Collects namespace declarations from an element's attributes.
pub(crate) fn collect_namespaces(
    e: &quick_xml::events::BytesStart<'_>,
    namespaces: &mut Vec<(String, String)>,
) -> ParseResult<()> {
    for attr in e.attributes().flatten() {
        let key = std::str::from_utf8(attr.key.as_ref())?;
        let value = std::str::from_utf8(&attr.value)?;
        if let Some(prefix) = key.strip_prefix("xmlns:") {
            namespaces.push((prefix.to_string(), value.to_string()));
        } else if key == "xmlns" {
            namespaces.push((String::new(), value.to_string()));
        } else {
            // Other attributes ignored
        }
    }
    Ok(())
}

/// Resolves a `QName` from an element, using namespace declarations.
pub(crate) fn resolve_qname(
    e: &quick_xml::events::BytesStart<'_>,
    namespaces: &[(String, String)],
) -> ParseResult<QName> {
    let name_bytes = e.name();
    let name = std::str::from_utf8(name_bytes.as_ref())?.to_owned();

    let (prefix, local_name) = if let Some(colon_pos) = name.find(':') {
        (
            name[..colon_pos].to_owned(),
            name[colon_pos + 1..].to_owned(),
        )
    } else {
        (String::new(), name)
    };

    // Look up namespace, defaulting to DAV:
    let namespace = namespaces
        .iter()
        .rev()
        .find(|(p, _)| *p == prefix)
        .map_or("DAV:", |(_, ns)| ns.as_str());

    Ok(QName::new(
        Namespace::new(namespace.to_string()),
        local_name,
    ))
}
