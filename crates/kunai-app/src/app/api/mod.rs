mod dav;

use salvo::Router;

/// ## Summary
/// Constructs the main API router with all protocol handlers.
///
/// Every path in the served URL space is handled by the DAV method
/// dispatcher.
#[must_use]
pub fn routes() -> Router {
    dav::routes()
}
