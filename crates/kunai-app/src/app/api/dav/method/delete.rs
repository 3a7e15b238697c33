//! DELETE method handler for `WebDAV` resources.

use salvo::http::StatusCode;
use salvo::{Depot, Request, Response, handler};

use kunai_engine::engine::DeleteOutcome;

use crate::app::api::dav::method::conditional_header;
use crate::app::api::dav::response::send_engine_error;
use crate::engine_handler::get_engine_from_depot;

/// ## Summary
/// Handles DELETE requests for `WebDAV` resources.
///
/// Removes the resource from its parent collection. An `If-Match` header
/// that does not match the current ETag fails the request with 412.
///
/// ## Errors
/// Returns 404 if the resource is not found, 412 for a failed
/// precondition, 500 for backend errors.
#[handler]
#[tracing::instrument(skip_all, fields(
    method = "DELETE",
    path = %req.uri().path()
))]
pub async fn delete(req: &mut Request, res: &mut Response, depot: &Depot) {
    tracing::info!("Handling DELETE request");

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

    match engine.delete(&path, if_match.as_deref()) {
        Ok(DeleteOutcome::Deleted) => {
            tracing::info!("Resource deleted successfully");
            res.status_code(StatusCode::NO_CONTENT);
        }
        Ok(DeleteOutcome::NotFound) => {
            tracing::debug!("Resource not found");
            res.status_code(StatusCode::NOT_FOUND);
        }
        Ok(DeleteOutcome::PreconditionFailed) => {
            tracing::warn!("Precondition failed: ETag mismatch");
            res.status_code(StatusCode::PRECONDITION_FAILED);
        }
        Err(e) => send_engine_error(res, &path, &e),
    }
}
