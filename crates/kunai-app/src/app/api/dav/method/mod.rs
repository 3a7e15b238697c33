pub mod delete;
pub mod get_head;
pub mod mkcol;
pub mod options;
pub mod propfind;
pub mod proppatch;
pub mod put;
pub mod report;

use salvo::Request;

use kunai_rfc::rfc::dav::core::Depth;

/// Parses the Depth header, defaulting to 0 when absent.
///
/// Returns `None` for a header value that is not `0`, `1`, or
/// `infinity`.
pub(crate) fn parse_depth(req: &Request) -> Option<Depth> {
    match req.headers().get("Depth").map(|h| h.to_str()) {
        None => Some(Depth::Zero),
        Some(Ok(value)) => Depth::from_header(value),
        Some(Err(_)) => None,
    }
}

/// Reads a conditional header as a string, if present.
pub(crate) fn conditional_header(req: &Request, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|h| h.to_str().ok())
        .map(String::from)
}
