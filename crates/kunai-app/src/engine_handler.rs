use std::sync::Arc;

use kunai_engine::engine::DavEngine;
use salvo::async_trait;

use crate::error::{AppError, AppResult};

/// Injects the shared [`DavEngine`] into each request's depot.
pub struct EngineHandler {
    pub engine: Arc<DavEngine>,
}

#[async_trait]
impl salvo::Handler for EngineHandler {
    #[tracing::instrument(skip(self, _req, depot, _res, _ctrl))]
    async fn handle(
        &self,
        _req: &mut salvo::Request,
        depot: &mut salvo::Depot,
        _res: &mut salvo::Response,
        _ctrl: &mut salvo::FlowCtrl,
    ) {
        depot.inject(Arc::clone(&self.engine));
    }
}

/// ## Summary
/// Retrieves the protocol engine from the depot.
///
/// ## Errors
/// Returns an error if the engine is not found in the depot.
pub fn get_engine_from_depot(depot: &salvo::Depot) -> AppResult<Arc<DavEngine>> {
    depot.obtain::<Arc<DavEngine>>().cloned().map_err(|_err| {
        AppError::CoreError(kunai_core::error::CoreError::InvariantViolation(
            "Engine not found in depot",
        ))
    })
}
