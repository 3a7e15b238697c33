//! REPORT method handler for `WebDAV` resources.

use salvo::http::StatusCode;
use salvo::{Depot, Request, Response, handler};

use kunai_engine::engine::ReportOutcome;

use crate::app::api::dav::method::parse_depth;
use crate::app::api::dav::response::{send_engine_error, send_multistatus, send_statuses};
use crate::engine_handler::get_engine_from_depot;

/// ## Summary
/// Handles REPORT requests for `WebDAV` resources.
///
/// Dispatches on the body's root element name to a registered reporter.
/// An unregistered report name yields a 403 response whose body carries
/// the `DAV:supported-report` error listing the registered reports.
///
/// ## Errors
/// Returns 400 for an unparseable Depth header, 404 for missing
/// resources, 500 for a body without a well-formed root element and
/// backend errors.
#[handler]
#[tracing::instrument(skip_all, fields(
    method = "REPORT",
    path = %req.uri().path()
))]
pub async fn report(req: &mut Request, res: &mut Response, depot: &Depot) {
    tracing::info!("Handling REPORT request");

    let path = req.uri().path().to_string();

    let Some(depth) = parse_depth(req) else {
        tracing::warn!("Invalid Depth header");
        res.status_code(StatusCode::BAD_REQUEST);
        return;
    };

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

    match engine.report(&path, depth, &body) {
        Ok(ReportOutcome::NotFound) => {
            tracing::debug!("Resource not found");
            res.status_code(StatusCode::NOT_FOUND);
        }
        Ok(ReportOutcome::Unsupported(status)) => send_statuses(res, vec![*status]),
        Ok(ReportOutcome::Statuses(statuses)) => send_multistatus(res, statuses),
        Err(e) => send_engine_error(res, &path, &e),
    }
}
