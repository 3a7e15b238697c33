//! Multistatus response serialization.
//!
//! A response is rendered either as a single-resource body (when every
//! property outcome shares one status) or as a full 207 multistatus
//! document. Namespace prefixes are assigned per document: `DAV:` is
//! always `D`, other namespaces get `ns0`, `ns1`, ... in order of first
//! appearance.

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::rfc::dav::core::{
    ActiveLock, DavErrorBody, DavProperty, ExpandedNode, Multistatus, Namespace, NeedsMultistatus,
    PropertyValue, QName, Status, StatusLine,
};

/// A rendered single-resource response body.
#[derive(Debug, Clone)]
pub struct RenderedResponse {
    /// HTTP status code.
    pub status: u16,
    /// Content type of the body.
    pub content_type: &'static str,
    /// The body itself.
    pub body: String,
}

/// ## Summary
/// Renders one [`Status`] as a single-resource response.
///
/// A status without property outcomes renders its description as plain
/// text under its coarse status code, or a standalone `<D:error>`
/// document when an error body is attached. A status whose outcomes all
/// share one (code, description) group renders that sole propstat block
/// as `text/xml` under the group's code.
///
/// ## Errors
/// Returns [`NeedsMultistatus`] when the outcomes span more than one
/// group, so the caller must re-render as a multistatus document.
pub fn render_single(status: &Status) -> Result<RenderedResponse, NeedsMultistatus> {
    let line = status.single_status()?;

    if status.outcomes.is_empty() {
        if let Some(error) = &status.error {
            let body = render_error_document(status, error).map_err(log_write_error)?;
            return Ok(RenderedResponse {
                status: line.code(),
                content_type: "text/xml",
                body,
            });
        }
        return Ok(RenderedResponse {
            status: line.code(),
            content_type: "text/plain",
            body: status.description.clone().unwrap_or_default(),
        });
    }

    let body = render_propstat_fragment(status).map_err(log_write_error)?;
    Ok(RenderedResponse {
        status: line.code(),
        content_type: "text/xml",
        body,
    })
}

// Writing into a Vec cannot fail in practice; fall back to the full
// multistatus path if it somehow does.
fn log_write_error(err: quick_xml::Error) -> NeedsMultistatus {
    tracing::error!(error = %err, "Failed to write single-resource body");
    NeedsMultistatus
}

/// ## Summary
/// Serializes a full multistatus document for a 207 response.
///
/// ## Errors
/// Returns an error if XML writing fails or if the generated XML is not
/// valid UTF-8 (which should never happen with well-formed input).
pub fn serialize_multistatus(multistatus: &Multistatus) -> Result<String, quick_xml::Error> {
    let prefixes = PrefixMap::for_statuses(&multistatus.responses);
    let mut writer = Writer::new(Vec::new());

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

    let mut elem = BytesStart::new("D:multistatus");
    prefixes.declare(&mut elem);
    writer.write_event(Event::Start(elem))?;

    for status in &multistatus.responses {
        write_response(&mut writer, status, &prefixes)?;
    }

    writer.write_event(Event::End(BytesEnd::new("D:multistatus")))?;

    into_string(writer)
}

fn render_error_document(status: &Status, error: &DavErrorBody) -> Result<String, quick_xml::Error> {
    let prefixes = PrefixMap::for_statuses(std::slice::from_ref(status));
    let mut writer = Writer::new(Vec::new());

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

    let mut elem = BytesStart::new("D:error");
    prefixes.declare(&mut elem);
    writer.write_event(Event::Start(elem))?;
    write_error_body(&mut writer, error, &prefixes)?;
    writer.write_event(Event::End(BytesEnd::new("D:error")))?;

    into_string(writer)
}

fn render_propstat_fragment(status: &Status) -> Result<String, quick_xml::Error> {
    let prefixes = PrefixMap::for_statuses(std::slice::from_ref(status));
    let mut writer = Writer::new(Vec::new());

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

    // Sole group, checked by single_status in the caller.
    for ((code, description), props) in status.propstat_groups() {
        let mut elem = BytesStart::new("D:propstat");
        prefixes.declare(&mut elem);
        writer.write_event(Event::Start(elem))?;

        writer.write_event(Event::Start(BytesStart::new("D:prop")))?;
        for prop in props {
            write_property(&mut writer, prop, &prefixes)?;
        }
        writer.write_event(Event::End(BytesEnd::new("D:prop")))?;

        write_text_element(&mut writer, "D:status", &StatusLine(code).to_string())?;
        if let Some(description) = description {
            write_text_element(&mut writer, "D:responsedescription", &description)?;
        }

        writer.write_event(Event::End(BytesEnd::new("D:propstat")))?;
    }

    into_string(writer)
}

fn into_string(writer: Writer<Vec<u8>>) -> Result<String, quick_xml::Error> {
    String::from_utf8(writer.into_inner()).map_err(|e| {
        tracing::error!(error = %e, "Generated invalid UTF-8 in response XML");
        quick_xml::Error::Io(std::sync::Arc::new(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "Invalid UTF-8 in XML output",
        )))
    })
}

/// Writes a single response element.
fn write_response<W: std::io::Write>(
    writer: &mut Writer<W>,
    status: &Status,
    prefixes: &PrefixMap,
) -> Result<(), quick_xml::Error> {
    writer.write_event(Event::Start(BytesStart::new("D:response")))?;

    write_text_element(writer, "D:href", &status.href)?;

    if let Some(line) = status.status {
        write_text_element(writer, "D:status", &line.to_string())?;
    }

    if let Some(error) = &status.error {
        writer.write_event(Event::Start(BytesStart::new("D:error")))?;
        write_error_body(writer, error, prefixes)?;
        writer.write_event(Event::End(BytesEnd::new("D:error")))?;
    }

    if let Some(description) = &status.description {
        write_text_element(writer, "D:responsedescription", description)?;
    }

    for ((code, description), props) in status.propstat_groups() {
        writer.write_event(Event::Start(BytesStart::new("D:propstat")))?;

        writer.write_event(Event::Start(BytesStart::new("D:prop")))?;
        for prop in props {
            write_property(writer, prop, prefixes)?;
        }
        writer.write_event(Event::End(BytesEnd::new("D:prop")))?;

        write_text_element(writer, "D:status", &StatusLine(code).to_string())?;
        if let Some(description) = description {
            write_text_element(writer, "D:responsedescription", &description)?;
        }

        writer.write_event(Event::End(BytesEnd::new("D:propstat")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("D:response")))?;

    Ok(())
}

fn write_error_body<W: std::io::Write>(
    writer: &mut Writer<W>,
    error: &DavErrorBody,
    prefixes: &PrefixMap,
) -> Result<(), quick_xml::Error> {
    match error {
        DavErrorBody::SupportedReport(reports) => {
            if reports.is_empty() {
                writer.write_event(Event::Empty(BytesStart::new("D:supported-report")))?;
                return Ok(());
            }
            writer.write_event(Event::Start(BytesStart::new("D:supported-report")))?;
            for report in reports {
                writer.write_event(Event::Start(BytesStart::new("D:report")))?;
                write_empty_element(writer, report, prefixes)?;
                writer.write_event(Event::End(BytesEnd::new("D:report")))?;
            }
            writer.write_event(Event::End(BytesEnd::new("D:supported-report")))?;
        }
    }
    Ok(())
}

/// Writes a property element.
fn write_property<W: std::io::Write>(
    writer: &mut Writer<W>,
    prop: &DavProperty,
    prefixes: &PrefixMap,
) -> Result<(), quick_xml::Error> {
    let tag = prefixes.qualify(&prop.name);

    // A bare name (no value) is used in 404 propstat blocks.
    let Some(value) = &prop.value else {
        writer.write_event(Event::Empty(BytesStart::new(tag.as_str())))?;
        return Ok(());
    };

    match value {
        PropertyValue::Empty => {
            writer.write_event(Event::Empty(BytesStart::new(tag.as_str())))?;
        }
        PropertyValue::Text(text) => {
            write_text_element(writer, &tag, text)?;
        }
        PropertyValue::Href(href) => {
            writer.write_event(Event::Start(BytesStart::new(tag.as_str())))?;
            write_text_element(writer, "D:href", href)?;
            writer.write_event(Event::End(BytesEnd::new(tag.as_str())))?;
        }
        PropertyValue::HrefSet(hrefs) => {
            writer.write_event(Event::Start(BytesStart::new(tag.as_str())))?;
            for href in hrefs {
                write_text_element(writer, "D:href", href)?;
            }
            writer.write_event(Event::End(BytesEnd::new(tag.as_str())))?;
        }
        PropertyValue::Integer(value) => {
            write_text_element(writer, &tag, &value.to_string())?;
        }
        PropertyValue::ResourceType(types) => {
            if types.is_empty() {
                writer.write_event(Event::Empty(BytesStart::new(tag.as_str())))?;
            } else {
                writer.write_event(Event::Start(BytesStart::new(tag.as_str())))?;
                for qname in types {
                    write_empty_element(writer, qname, prefixes)?;
                }
                writer.write_event(Event::End(BytesEnd::new(tag.as_str())))?;
            }
        }
        PropertyValue::SupportedReports(reports) => {
            writer.write_event(Event::Start(BytesStart::new(tag.as_str())))?;
            for report in reports {
                writer.write_event(Event::Start(BytesStart::new("D:supported-report")))?;
                writer.write_event(Event::Start(BytesStart::new("D:report")))?;
                write_empty_element(writer, report, prefixes)?;
                writer.write_event(Event::End(BytesEnd::new("D:report")))?;
                writer.write_event(Event::End(BytesEnd::new("D:supported-report")))?;
            }
            writer.write_event(Event::End(BytesEnd::new(tag.as_str())))?;
        }
        PropertyValue::LockEntries(entries) => {
            writer.write_event(Event::Start(BytesStart::new(tag.as_str())))?;
            for entry in entries {
                writer.write_event(Event::Start(BytesStart::new("D:lockentry")))?;
                write_lock_kind(writer, entry.scope.as_element_name(), entry.lock_type.as_element_name())?;
                writer.write_event(Event::End(BytesEnd::new("D:lockentry")))?;
            }
            writer.write_event(Event::End(BytesEnd::new(tag.as_str())))?;
        }
        PropertyValue::ActiveLocks(locks) => {
            writer.write_event(Event::Start(BytesStart::new(tag.as_str())))?;
            for lock in locks {
                write_active_lock(writer, lock)?;
            }
            writer.write_event(Event::End(BytesEnd::new(tag.as_str())))?;
        }
        PropertyValue::Expanded(nodes) => {
            writer.write_event(Event::Start(BytesStart::new(tag.as_str())))?;
            for node in nodes {
                match node {
                    ExpandedNode::Href(href) => {
                        write_text_element(writer, "D:href", href)?;
                    }
                    ExpandedNode::Response(status) => {
                        write_response(writer, status, prefixes)?;
                    }
                }
            }
            writer.write_event(Event::End(BytesEnd::new(tag.as_str())))?;
        }
        PropertyValue::Xml(xml) => {
            // Raw fragment, already serialized; must be well-formed.
            writer.write_event(Event::Start(BytesStart::new(tag.as_str())))?;
            writer
                .get_mut()
                .write_all(xml.as_bytes())
                .map_err(|e| quick_xml::Error::Io(std::sync::Arc::new(std::io::Error::other(e))))?;
            writer.write_event(Event::End(BytesEnd::new(tag.as_str())))?;
        }
    }

    Ok(())
}

fn write_active_lock<W: std::io::Write>(
    writer: &mut Writer<W>,
    lock: &ActiveLock,
) -> Result<(), quick_xml::Error> {
    writer.write_event(Event::Start(BytesStart::new("D:activelock")))?;

    write_lock_kind(
        writer,
        lock.scope.as_element_name(),
        lock.lock_type.as_element_name(),
    )?;
    write_text_element(writer, "D:depth", lock.depth.as_str())?;

    if let Some(owner) = &lock.owner {
        write_text_element(writer, "D:owner", owner)?;
    }
    if let Some(timeout) = &lock.timeout {
        write_text_element(writer, "D:timeout", timeout)?;
    }
    if let Some(token) = &lock.token {
        writer.write_event(Event::Start(BytesStart::new("D:locktoken")))?;
        write_text_element(writer, "D:href", token)?;
        writer.write_event(Event::End(BytesEnd::new("D:locktoken")))?;
    }
    if let Some(root) = &lock.root {
        writer.write_event(Event::Start(BytesStart::new("D:lockroot")))?;
        write_text_element(writer, "D:href", root)?;
        writer.write_event(Event::End(BytesEnd::new("D:lockroot")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("D:activelock")))?;
    Ok(())
}

fn write_lock_kind<W: std::io::Write>(
    writer: &mut Writer<W>,
    scope: &str,
    lock_type: &str,
) -> Result<(), quick_xml::Error> {
    writer.write_event(Event::Start(BytesStart::new("D:lockscope")))?;
    writer.write_event(Event::Empty(BytesStart::new(format!("D:{scope}"))))?;
    writer.write_event(Event::End(BytesEnd::new("D:lockscope")))?;

    writer.write_event(Event::Start(BytesStart::new("D:locktype")))?;
    writer.write_event(Event::Empty(BytesStart::new(format!("D:{lock_type}"))))?;
    writer.write_event(Event::End(BytesEnd::new("D:locktype")))?;
    Ok(())
}

fn write_empty_element<W: std::io::Write>(
    writer: &mut Writer<W>,
    qname: &QName,
    prefixes: &PrefixMap,
) -> Result<(), quick_xml::Error> {
    let tag = prefixes.qualify(qname);
    writer.write_event(Event::Empty(BytesStart::new(tag.as_str())))?;
    Ok(())
}

/// Writes a simple text element.
fn write_text_element<W: std::io::Write>(
    writer: &mut Writer<W>,
    name: &str,
    text: &str,
) -> Result<(), quick_xml::Error> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// Namespace prefix assignment for one document.
struct PrefixMap {
    // (namespace, prefix) in declaration order, DAV: first
    entries: Vec<(Namespace, String)>,
}

impl PrefixMap {
    fn for_statuses(statuses: &[Status]) -> Self {
        let mut map = Self {
            entries: vec![(Namespace::DAV, "D".to_owned())],
        };
        for status in statuses {
            map.collect_status(status);
        }
        map
    }

    fn collect_status(&mut self, status: &Status) {
        if let Some(DavErrorBody::SupportedReport(reports)) = &status.error {
            for report in reports {
                self.intern(&report.namespace);
            }
        }
        for outcome in &status.outcomes {
            self.collect_prop(&outcome.prop);
        }
    }

    fn collect_prop(&mut self, prop: &DavProperty) {
        self.intern(&prop.name.namespace);
        match &prop.value {
            Some(PropertyValue::ResourceType(types) | PropertyValue::SupportedReports(types)) => {
                for qname in types {
                    self.intern(&qname.namespace);
                }
            }
            Some(PropertyValue::Expanded(nodes)) => {
                for node in nodes {
                    if let ExpandedNode::Response(status) = node {
                        self.collect_status(status);
                    }
                }
            }
            _ => {}
        }
    }

    fn intern(&mut self, namespace: &Namespace) {
        if self.entries.iter().any(|(ns, _)| ns == namespace) {
            return;
        }
        let prefix = format!("ns{}", self.entries.len() - 1);
        self.entries.push((namespace.clone(), prefix));
    }

    fn prefix(&self, namespace: &Namespace) -> &str {
        self.entries
            .iter()
            .find(|(ns, _)| ns == namespace)
            .map_or("D", |(_, prefix)| prefix.as_str())
    }

    fn qualify(&self, qname: &QName) -> String {
        format!("{}:{}", self.prefix(&qname.namespace), qname.local_name())
    }

    fn declare(&self, elem: &mut BytesStart<'_>) {
        for (namespace, prefix) in &self.entries {
            elem.push_attribute((format!("xmlns:{prefix}").as_str(), namespace.as_str()));
        }
    }
}
