//! Shared response builders for the DAV method handlers.

use salvo::Response;
use salvo::http::{HeaderValue, StatusCode};

use kunai_rfc::rfc::dav::build::{render_single, serialize_multistatus};
use kunai_rfc::rfc::dav::core::{Multistatus, Status, StatusLine};

/// ## Summary
/// Sends a list of per-resource statuses, collapsing to a single-resource
/// body when possible.
///
/// A sole status whose property outcomes all share one (status,
/// description) group is sent under that status code directly. Anything
/// else becomes a 207 Multi-Status document.
pub fn send_statuses(res: &mut Response, statuses: Vec<Status>) {
    if let [status] = statuses.as_slice()
        && let Ok(rendered) = render_single(status)
    {
        res.status_code(
            StatusCode::from_u16(rendered.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        );
        let content_type = if rendered.content_type == "text/xml" {
            "text/xml; charset=utf-8"
        } else {
            "text/plain; charset=utf-8"
        };
        set_header(res, "Content-Type", content_type);
        write_body(res, rendered.body);
        return;
    }

    send_multistatus(res, statuses);
}

/// ## Summary
/// Sends per-resource statuses as a 207 Multi-Status document.
pub fn send_multistatus(res: &mut Response, statuses: Vec<Status>) {
    match serialize_multistatus(&Multistatus::from_responses(statuses)) {
        Ok(xml) => {
            res.status_code(StatusCode::MULTI_STATUS);
            set_header(res, "Content-Type", "text/xml; charset=utf-8");
            write_body(res, xml);
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize multistatus document");
            res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
        }
    }
}

/// ## Summary
/// Logs an engine failure and reports it as a 500 with the failure
/// description in a plain-text body.
pub fn send_engine_error(res: &mut Response, path: &str, err: &kunai_engine::error::EngineError) {
    tracing::error!(path, error = %err, "DAV operation failed");
    send_statuses(
        res,
        vec![Status::new(path, StatusLine::INTERNAL_SERVER_ERROR).description(err.to_string())],
    );
}

/// Sets a header, ignoring values that are not valid header text.
pub fn set_header(res: &mut Response, name: &'static str, value: &str) {
    match HeaderValue::from_str(value) {
        Ok(value) => {
            #[expect(
                clippy::let_underscore_must_use,
                reason = "Header addition failure is non-fatal"
            )]
            let _ = res.add_header(name, value, true);
        }
        Err(e) => {
            tracing::warn!(header = name, error = %e, "Skipping invalid header value");
        }
    }
}

/// Writes a response body, logging failures.
pub fn write_body(res: &mut Response, body: impl Into<String>) {
    #[expect(
        clippy::let_underscore_must_use,
        reason = "Write body failure is non-fatal"
    )]
    let _ = res.write_body(body.into());
}
