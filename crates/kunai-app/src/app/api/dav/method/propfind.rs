//! PROPFIND method handler for `WebDAV` resources.

use salvo::http::StatusCode;
use salvo::{Depot, Request, Response, handler};

use kunai_engine::engine::DavOutcome;
use kunai_engine::error::EngineError;
use kunai_rfc::rfc::dav::parse::parse_propfind;

use crate::app::api::dav::method::parse_depth;
use crate::app::api::dav::response::{send_engine_error, send_multistatus};
use crate::engine_handler::get_engine_from_depot;

/// ## Summary
/// Handles PROPFIND requests for `WebDAV` resources.
///
/// Parses the request body to determine which properties to return,
/// walks the resource tree to the requested depth, and builds a 207
/// Multi-Status response with one `response` element per visited
/// resource.
///
/// ## Errors
/// Returns 400 for an unparseable Depth header, 404 for missing
/// resources, 500 for unsupported request shapes and backend errors.
#[handler]
#[tracing::instrument(skip_all, fields(
    method = "PROPFIND",
    path = %req.uri().path()
))]
pub async fn propfind(req: &mut Request, res: &mut Response, depot: &Depot) {
    tracing::info!("Handling PROPFIND request");

    let path = req.uri().path().to_string();

    let Some(depth) = parse_depth(req) else {
        tracing::warn!("Invalid Depth header");
        res.status_code(StatusCode::BAD_REQUEST);
        return;
    };
    tracing::debug!(depth = %depth, "Depth header parsed");

    let engine = match get_engine_from_depot(depot) {
        Ok(engine) => engine,
        Err(e) => {
            tracing::error!(error = %e, "Failed to get engine");
            res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
            return;
        }
    };

    let body = match req.payload().await {
        Ok(bytes) => bytes.to_vec(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to read request body");
            res.status_code(StatusCode::BAD_REQUEST);
            return;
        }
    };

    tracing::debug!(bytes = body.len(), "Request body read successfully");

    // Empty body parses as allprop, which the engine rejects below.
    let propfind_req = match parse_propfind(&body) {
        Ok(req) => req,
        Err(e) => {
            tracing::error!(error = %e, "Failed to parse PROPFIND request");
            send_engine_error(res, &path, &EngineError::MalformedBody(e.to_string()));
            return;
        }
    };

    match engine.propfind(&path, depth, &propfind_req) {
        Ok(DavOutcome::NotFound) => {
            tracing::debug!("Resource not found");
            res.status_code(StatusCode::NOT_FOUND);
        }
        Ok(DavOutcome::Statuses(statuses)) => {
            tracing::debug!(responses = statuses.len(), "Multistatus response built");
            send_multistatus(res, statuses);
        }
        Err(e) => send_engine_error(res, &path, &e),
    }
}
