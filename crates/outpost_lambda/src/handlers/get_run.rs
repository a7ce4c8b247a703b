use outpost_core::contract::RunEnvelope;
use outpost_core::error::ApiError;
use serde_json::Value;

use crate::adapters::record_store::RecordStore;
use crate::config::ApiContext;
use crate::handlers::gateway::{ApiGatewayResponse, GatewayRequest};
use crate::handlers::ownership::{authorize_owner, fetch_run};
use crate::handlers::{caller_for, dispatch, required_run_id};

pub fn handle_get_run<S: RecordStore>(event: Value, context: &ApiContext<S>) -> ApiGatewayResponse {
    dispatch(event, context, "get_run", 200, get_run)
}

/// Existence is checked before identity, so an unknown ID is a 404 for any
/// caller, including one without a usable identity.
pub(crate) fn get_run<S: RecordStore>(
    request: &GatewayRequest,
    context: &ApiContext<S>,
) -> Result<RunEnvelope, ApiError> {
    let run_id = required_run_id(request)?;
    let run = fetch_run(&context.store, &context.config, run_id)?;
    let caller = caller_for(request, context)?;
    let run = authorize_owner(run, &caller)?;
    Ok(RunEnvelope { run })
}
