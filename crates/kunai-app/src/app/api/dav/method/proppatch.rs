//! PROPPATCH method handler for `WebDAV` resources.

use salvo::http::StatusCode;
use salvo::{Depot, Request, Response, handler};

use kunai_engine::engine::DavOutcome;
use kunai_engine::error::EngineError;
use kunai_rfc::rfc::dav::parse::parse_proppatch;

use crate::app::api::dav::response::{send_engine_error, send_statuses};
use crate::engine_handler::get_engine_from_depot;

/// ## Summary
/// Handles PROPPATCH requests for `WebDAV` resources.
///
/// Applies the set/remove operations in document order. Unknown
/// properties report 404 and protected properties report 409, without
/// preventing the remaining operations from being applied. When all
/// outcomes share one status the response collapses to that status,
/// otherwise a 207 Multi-Status document is sent.
///
/// ## Errors
/// Returns 404 for missing resources, 500 for a malformed body and
/// backend errors.
#[handler]
#[tracing::instrument(skip_all, fields(
    method = "PROPPATCH",
    path = %req.uri().path()
))]
pub async fn proppatch(req: &mut Request, res: &mut Response, depot: &Depot) {
    tracing::info!("Handling PROPPATCH request");

    let path = req.uri().path().to_string();

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

    let proppatch_req = match parse_proppatch(&body) {
        Ok(req) => req,
        Err(e) => {
            tracing::error!(error = %e, "Failed to parse PROPPATCH request");
            send_engine_error(res, &path, &EngineError::MalformedBody(e.to_string()));
            return;
        }
    };

    tracing::debug!(
        updates = proppatch_req.updates.len(),
        "PROPPATCH request parsed successfully"
    );

    match engine.proppatch(&path, &proppatch_req.updates) {
        Ok(DavOutcome::NotFound) => {
            tracing::debug!("Resource not found");
            res.status_code(StatusCode::NOT_FOUND);
        }
        Ok(DavOutcome::Statuses(statuses)) => send_statuses(res, statuses),
        Err(e) => send_engine_error(res, &path, &e),
    }
}
