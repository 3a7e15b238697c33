//! PUT method handler for `WebDAV` resources.

use salvo::http::StatusCode;
use salvo::{Depot, Request, Response, handler};

use kunai_engine::engine::PutOutcome;

use crate::app::api::dav::method::conditional_header;
use crate::app::api::dav::response::{send_engine_error, set_header};
use crate::engine_handler::get_engine_from_depot;

/// ## Summary
/// Handles PUT requests for `WebDAV` resources.
///
/// Overwrites an existing resource or creates a new member in the parent
/// collection. An `If-Match` header that does not match the current ETag
/// fails the request with 412 and leaves the stored body untouched.
///
/// ## Errors
/// Returns 404 if neither the target nor its parent exists, 412 for a
/// failed precondition, 413 when the body exceeds the configured limit,
/// 500 for backend errors.
#[handler]
#[tracing::instrument(skip_all, fields(
    method = "PUT",
    path = %req.uri().path()
))]
pub async fn put(req: &mut Request, res: &mut Response, depot: &Depot) {
    tracing::info!("Handling PUT request");

    let path = req.uri().path().to_string();

    let engine = match get_engine_from_depot(depot) {
        Ok(engine) => engine,
        Err(e) => {
            tracing::error!(error = %e, "Failed to get engine");
            res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
            return;
        }
    };

    let if_match = conditional_header(req, "If-Match");
    let content_type = conditional_header(req, "Content-Type");

    let body = match req.payload().await {
        Ok(bytes) => bytes.to_vec(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to read request body");
            res.status_code(StatusCode::BAD_REQUEST);
            return;
        }
    };

    tracing::debug!(bytes = body.len(), "Request body read successfully");

    match engine.put(&path, body, content_type, if_match.as_deref()) {
        Ok(PutOutcome::Created { etag }) => {
            tracing::info!("Resource created");
            if let Some(etag) = etag {
                set_header(res, "ETag", &etag);
            }
            res.status_code(StatusCode::CREATED);
        }
        Ok(PutOutcome::Updated { etag }) => {
            tracing::info!("Resource updated");
            if let Some(etag) = etag {
                set_header(res, "ETag", &etag);
            }
            res.status_code(StatusCode::NO_CONTENT);
        }
        Ok(PutOutcome::NotFound) => {
            tracing::debug!("Parent collection not found");
            res.status_code(StatusCode::NOT_FOUND);
        }
        Ok(PutOutcome::PreconditionFailed) => {
            tracing::warn!("Precondition failed: ETag mismatch");
            res.status_code(StatusCode::PRECONDITION_FAILED);
        }
        Ok(PutOutcome::TooLarge) => {
            tracing::warn!("Request body exceeds configured limit");
            res.status_code(StatusCode::PAYLOAD_TOO_LARGE);
        }
        Err(e) => send_engine_error(res, &path, &e),
    }
}
