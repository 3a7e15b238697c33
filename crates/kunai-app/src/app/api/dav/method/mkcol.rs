//! MKCOL method handler for `WebDAV` collection creation.

use salvo::http::StatusCode;
use salvo::{Depot, Request, Response, handler};

use kunai_engine::engine::MkcolOutcome;

use crate::app::api::dav::response::send_engine_error;
use crate::engine_handler::get_engine_from_depot;

/// ## Summary
/// Handles MKCOL requests to create `WebDAV` collections.
///
/// Creates an empty collection under an existing parent. Request bodies
/// are not supported.
///
/// ## Errors
/// Returns 405 if a resource already exists at the path, 409 if the
/// parent collection is missing, 415 for a request with a body,
/// 500 for backend errors.
#[handler]
#[tracing::instrument(skip_all, fields(
    method = "MKCOL",
    path = %req.uri().path()
))]
pub async fn mkcol(req: &mut Request, res: &mut Response, depot: &Depot) {
    tracing::info!("Handling MKCOL request");

    let path = req.uri().path().to_string();

    let engine = match get_engine_from_depot(depot) {
        Ok(engine) => engine,
        Err(e) => {
            tracing::error!(error = %e, "Failed to get engine");
            res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
            return;
        }
    };

    // Extended MKCOL bodies are not handled
    match req.payload().await {
        Ok(bytes) if !bytes.is_empty() => {
            tracing::warn!(bytes = bytes.len(), "MKCOL request bodies are not supported");
            res.status_code(StatusCode::UNSUPPORTED_MEDIA_TYPE);
            return;
        }
        Ok(_) => {}
        Err(e) => {
            tracing::error!(error = %e, "Failed to read request body");
            res.status_code(StatusCode::BAD_REQUEST);
            return;
        }
    }

    match engine.mkcol(&path) {
        Ok(MkcolOutcome::Created) => {
            tracing::info!("Collection created");
            res.status_code(StatusCode::CREATED);
        }
        Ok(MkcolOutcome::AlreadyExists) => {
            tracing::debug!("Resource already exists at path");
            res.status_code(StatusCode::METHOD_NOT_ALLOWED);
        }
        Ok(MkcolOutcome::MissingParent) => {
            tracing::debug!("Parent collection not found");
            res.status_code(StatusCode::CONFLICT);
        }
        Err(e) => send_engine_error(res, &path, &e),
    }
}
