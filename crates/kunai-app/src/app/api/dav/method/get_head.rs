//! GET and HEAD method handlers for `WebDAV` resources.

use salvo::http::StatusCode;
use salvo::{Depot, Request, Response, handler};

use kunai_engine::engine::GetOutcome;

use crate::app::api::dav::method::conditional_header;
use crate::app::api::dav::response::{send_engine_error, set_header};
use crate::engine_handler::get_engine_from_depot;

/// ## Summary
/// Handles GET requests for `WebDAV` resources.
///
/// Serves the resource body with its ETag and content type. An
/// `If-None-Match` header matching the current ETag short-circuits to
/// 304 with no body.
///
/// ## Errors
/// Returns 404 if the resource is not found, 500 for backend errors.
#[handler]
#[tracing::instrument(skip_all, fields(
    method = "GET",
    path = %req.uri().path()
))]
pub async fn get(req: &mut Request, res: &mut Response, depot: &Depot) {
    tracing::info!("Handling GET request");
    handle_get(req, res, depot, true);
}

/// ## Summary
/// Handles HEAD requests for `WebDAV` resources.
///
/// Identical to GET but never writes a body.
#[handler]
#[tracing::instrument(skip_all, fields(
    method = "HEAD",
    path = %req.uri().path()
))]
pub async fn head(req: &mut Request, res: &mut Response, depot: &Depot) {
    tracing::info!("Handling HEAD request");
    handle_get(req, res, depot, false);
}

fn handle_get(req: &Request, res: &mut Response, depot: &Depot, with_body: bool) {
    let path = req.uri().path().to_string();

    let engine = match get_engine_from_depot(depot) {
        Ok(engine) => engine,
        Err(e) => {
            tracing::error!(error = %e, "Failed to get engine");
            res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
            return;
        }
    };

    let if_none_match = conditional_header(req, "If-None-Match");

    match engine.get(&path, if_none_match.as_deref()) {
        Ok(GetOutcome::NotFound) => {
            tracing::debug!("Resource not found");
            res.status_code(StatusCode::NOT_FOUND);
        }
        Ok(GetOutcome::NotModified { etag }) => {
            tracing::debug!("ETag matched, returning 304");
            set_header(res, "ETag", &etag);
            res.status_code(StatusCode::NOT_MODIFIED);
        }
        Ok(GetOutcome::Ok {
            etag,
            content_type,
            body,
        }) => {
            if let Some(etag) = etag {
                set_header(res, "ETag", &etag);
            }
            if let Some(content_type) = content_type {
                set_header(res, "Content-Type", &content_type);
            }
            res.status_code(StatusCode::OK);
            if with_body {
                #[expect(
                    clippy::let_underscore_must_use,
                    reason = "Write body failure is non-fatal"
                )]
                let _ = res.write_body(body);
            }
        }
        Err(e) => send_engine_error(res, &path, &e),
    }
}
