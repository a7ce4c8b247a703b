use chrono::{SecondsFormat, Utc};
use outpost_core::contract::{validate_create_run, CreateRunRequest, CreateRunResponse};
use outpost_core::error::ApiError;
use outpost_core::records::RunRecord;
use serde_json::Value;
use uuid::Uuid;

use crate::adapters::record_store::RecordStore;
use crate::config::ApiContext;
use crate::handlers::gateway::{ApiGatewayResponse, GatewayRequest};
use crate::handlers::{caller_for, dispatch};

pub fn handle_create_run<S: RecordStore>(
    event: Value,
    context: &ApiContext<S>,
) -> ApiGatewayResponse {
    dispatch(event, context, "create_run", 201, create_run)
}

pub(crate) fn create_run<S: RecordStore>(
    request: &GatewayRequest,
    context: &ApiContext<S>,
) -> Result<CreateRunResponse, ApiError> {
    let body: CreateRunRequest = request.json_body()?;
    let validated = validate_create_run(body)?;
    let caller = caller_for(request, context)?;

    let run_id = Uuid::new_v4().to_string();
    tracing::Span::current().record("run_id", run_id.as_str());

    let run = RunRecord::new_pending(
        run_id.clone(),
        caller.as_str(),
        validated.query,
        validated.location,
        Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    );
    context
        .store
        .put_item(&context.config.runs_table, run.to_item()?)?;

    tracing::info!(query = %run.query, "run created");
    Ok(CreateRunResponse::created(run_id))
}
