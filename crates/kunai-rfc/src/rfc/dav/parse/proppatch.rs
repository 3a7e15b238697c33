//! PROPPATCH request XML parsing.

use quick_xml::Reader;
use quick_xml::events::Event;

use super::error::{ParseError, ParseResult};
use super::report::{collect_namespaces, resolve_qname};
use super::validate_numeric_char_refs;
use crate::rfc::dav::core::{DavProperty, PropertyValue, ProppatchRequest, QName, SetOrRemove};

/// Parses a PROPPATCH request body.
///
/// ## Summary
/// Parses the XML body of a PROPPATCH request and returns the
/// parsed request structure. Update order is preserved.
///
/// ## Errors
/// Returns an error if the XML is malformed.
///
/// ## Panics
/// This function does not panic. Internal unwraps are guarded by
/// prior conditional checks ensuring the values are present.
#[expect(
    clippy::too_many_lines,
    clippy::unwrap_used,
    clippy::cognitive_complexity
)]
pub fn parse_proppatch(xml: &[u8]) -> ParseResult<ProppatchRequest> {
    validate_numeric_char_refs(xml)?;
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut namespaces: Vec<(String, String)> = Vec::new();

    let mut request = ProppatchRequest::new();
    let mut current_operation: Option<SetOrRemove> = None;
    let mut in_prop = false;
    let mut current_prop_name: Option<QName> = None;
    let mut property_depth = 0;
    let mut property_content = String::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let local_name_bytes = e.local_name();
                let local_name = std::str::from_utf8(local_name_bytes.as_ref())?.to_owned();

                collect_namespaces(e, &mut namespaces)?;

                match local_name.as_str() {
                    "set" => {
                        current_operation = Some(SetOrRemove::Set);
                    }
                    "remove" => {
                        current_operation = Some(SetOrRemove::Remove);
                    }
                    "prop" if current_operation.is_some() => {
                        in_prop = true;
                    }
                    _ if in_prop => {
                        if current_prop_name.is_none() {
                            // This is the property element
                            current_prop_name = Some(resolve_qname(e, &namespaces)?);
                            property_depth = 1;
                            property_content.clear();
                        } else {
                            // Nested element within property, captured as raw XML
                            property_depth += 1;
                            let name_bytes = e.name();
                            let name = std::str::from_utf8(name_bytes.as_ref())?;
                            property_content.push('<');
                            property_content.push_str(name);
                            property_content.push('>');
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::Empty(ref e)) => {
                collect_namespaces(e, &mut namespaces)?;

                if in_prop {
                    if current_prop_name.is_none() {
                        // Empty property element (for remove or empty set)
                        let qname = resolve_qname(e, &namespaces)?;

                        match current_operation {
                            Some(SetOrRemove::Set) => {
                                request.set(DavProperty::empty(qname));
                            }
                            Some(SetOrRemove::Remove) => {
                                request.remove(qname);
                            }
                            None => {}
                        }
                    } else {
                        // Nested empty element within property
                        let name_bytes = e.name();
                        let name = std::str::from_utf8(name_bytes.as_ref())?;
                        property_content.push('<');
                        property_content.push_str(name);
                        for attr in e.attributes().flatten() {
                            let key = std::str::from_utf8(attr.key.as_ref())?;
                            let value = std::str::from_utf8(&attr.value)?;
                            property_content.push(' ');
                            property_content.push_str(key);
                            property_content.push_str("=\"");
                            property_content.push_str(value);
                            property_content.push('"');
                        }
                        property_content.push_str("/>");
                    }
                }
            }
            Ok(Event::Text(ref e)) => {
                if current_prop_name.is_some() {
                    let decoded = reader.decoder().decode(e.as_ref())?;
                    property_content.push_str(&decoded);
                }
            }
            Ok(Event::CData(ref e)) => {
                if current_prop_name.is_some() {
                    let text = std::str::from_utf8(e.as_ref())?;
                    property_content.push_str(text);
                }
            }
            Ok(Event::End(ref e)) => {
                let local_name_bytes = e.local_name();
                let local_name = std::str::from_utf8(local_name_bytes.as_ref())?.to_owned();

                match local_name.as_str() {
                    "set" | "remove" => {
                        current_operation = None;
                    }
                    "prop" if current_operation.is_some() => {
                        in_prop = false;
                    }
                    _ if in_prop && current_prop_name.is_some() => {
                        property_depth -= 1;

                        if property_depth == 0
                            && let Some(qname) = current_prop_name.take()
                        {
                            match current_operation {
                                Some(SetOrRemove::Set) => {
                                    let value = if property_content.trim().is_empty() {
                                        PropertyValue::Empty
                                    } else if property_content.contains('<') {
                                        PropertyValue::Xml(property_content.clone())
                                    } else {
                                        PropertyValue::Text(property_content.clone())
                                    };

                                    request.set(DavProperty {
                                        name: qname,
                                        value: Some(value),
                                    });
                                }
                                Some(SetOrRemove::Remove) => {
                                    request.remove(qname);
                                }
                                None => {}
                            }

                            property_content.clear();
                        } else {
                            // End of nested element
                            let name_bytes = e.name();
                            let name = std::str::from_utf8(name_bytes.as_ref())?;
                            property_content.push_str("</");
                            property_content.push_str(name);
                            property_content.push('>');
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ParseError::xml(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Ok(request)
}
