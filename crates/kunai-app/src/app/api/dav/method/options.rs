//! OPTIONS method handler for `WebDAV` resources.

use salvo::http::HeaderValue;
use salvo::{Request, Response, handler};

/// ## Summary
/// Handles OPTIONS requests for `WebDAV` resources.
///
/// Advertises the supported methods and DAV compliance classes. The
/// response carries an explicit zero Content-Length so clients do not
/// wait for a body.
///
/// ## Side Effects
/// Sets the `Allow`, `DAV`, and `Content-Length` headers on the response.
#[handler]
#[tracing::instrument(skip_all, fields(path = %req.uri().path()))]
pub async fn options(req: &mut Request, res: &mut Response) {
    tracing::info!("Handling OPTIONS request");

    let allow_methods = "OPTIONS, GET, HEAD, PUT, DELETE, MKCOL, PROPFIND, PROPPATCH, REPORT";
    let dav_header = "1";

    #[expect(
        clippy::let_underscore_must_use,
        reason = "Header addition failure is non-fatal"
    )]
    let _ = res.add_header("Allow", HeaderValue::from_static(allow_methods), true);
    #[expect(
        clippy::let_underscore_must_use,
        reason = "Header addition failure is non-fatal"
    )]
    let _ = res.add_header("DAV", HeaderValue::from_static(dav_header), true);
    #[expect(
        clippy::let_underscore_must_use,
        reason = "Header addition failure is non-fatal"
    )]
    let _ = res.add_header("Content-Length", HeaderValue::from_static("0"), true);
    res.status_code(salvo::http::StatusCode::OK);
}
