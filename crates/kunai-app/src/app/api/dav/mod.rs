// WebDAV method dispatch.
//
// This module is intentionally "glue-only": header parsing, XML body
// extraction, and shared response builders (e.g., 207 Multi-Status).

use salvo::Router;

pub mod method;
pub mod response;

#[must_use]
pub fn routes() -> Router {
    Router::with_path("{**dav_path}")
        .options(method::options::options)
        .get(method::get_head::get)
        .head(method::get_head::head)
        .put(method::put::put)
        .delete(method::delete::delete)
        .push(
            // PROPFIND method
            Router::new()
                .filter_fn(|req, _| req.method().as_str() == "PROPFIND")
                .goal(method::propfind::propfind),
        )
        .push(
            // PROPPATCH method
            Router::new()
                .filter_fn(|req, _| req.method().as_str() == "PROPPATCH")
                .goal(method::proppatch::proppatch),
        )
        .push(
            // MKCOL method
            Router::new()
                .filter_fn(|req, _| req.method().as_str() == "MKCOL")
                .goal(method::mkcol::mkcol),
        )
        .push(
            // REPORT method
            Router::new()
                .filter_fn(|req, _| req.method().as_str() == "REPORT")
                .goal(method::report::report),
        )
}
