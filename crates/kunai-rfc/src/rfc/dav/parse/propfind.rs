//! PROPFIND request XML parsing.

use quick_xml::Reader;
use quick_xml::events::Event;

use super::error::{ParseError, ParseResult};
use crate::rfc::dav::core::{PropfindRequest, PropfindType, QName};

/// Parses a PROPFIND request body.
///
/// ## Summary
/// Parses the XML body of a PROPFIND request and returns the
/// parsed request structure. An empty body means allprop.
///
/// ## Errors
/// Returns an error if the XML is malformed.
#[tracing::instrument(skip(xml), fields(xml_len = xml.len()))]
pub fn parse_propfind(xml: &[u8]) -> ParseResult<PropfindRequest> {
    if xml.is_empty() {
        tracing::debug!("Empty PROPFIND body, returning allprop");
        return Ok(PropfindRequest::allprop());
    }

    tracing::debug!("Parsing PROPFIND XML request");

    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut namespaces: Vec<(String, String)> = Vec::new();
    let mut in_propfind = false;
    let mut propfind_type: Option<PropfindType> = None;
    let mut properties: Vec<QName> = Vec::new();
    let mut include: Vec<QName> = Vec::new();
    let mut in_prop = false;
    let mut in_include = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e) | Event::Empty(ref e)) => {
                let local_name_bytes = e.local_name();
                let local_name = std::str::from_utf8(local_name_bytes.as_ref())?.to_owned();

                super::report::collect_namespaces(e, &mut namespaces)?;

                match local_name.as_str() {
                    "propfind" => {
                        in_propfind = true;
                    }
                    "allprop" if in_propfind => {
                        propfind_type = Some(PropfindType::AllProp {
                            include: Vec::new(),
                        });
                    }
                    "propname" if in_propfind => {
                        propfind_type = Some(PropfindType::PropName);
                    }
                    "prop" if in_propfind => {
                        in_prop = true;
                        if propfind_type.is_none() {
                            propfind_type = Some(PropfindType::Prop(Vec::new()));
                        }
                    }
                    "include" if in_propfind => {
                        in_include = true;
                    }
                    _ if in_prop || in_include => {
                        // This is a property element
                        let qname = super::report::resolve_qname(e, &namespaces)?;
                        if in_prop {
                            properties.push(qname);
                        } else {
                            include.push(qname);
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::End(ref e)) => {
                let local_name_bytes = e.local_name();
                let local_name = std::str::from_utf8(local_name_bytes.as_ref())?;

                match local_name {
                    "propfind" => {
                        in_propfind = false;
                    }
                    "prop" => {
                        in_prop = false;
                    }
                    "include" => {
                        in_include = false;
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

    let request = match propfind_type {
        Some(PropfindType::AllProp { .. }) => PropfindRequest::allprop_with_include(include),
        Some(PropfindType::PropName) => PropfindRequest::propname(),
        Some(PropfindType::Prop(_)) => PropfindRequest::prop(properties),
        None => PropfindRequest::allprop(),
    };

    Ok(request)
}
