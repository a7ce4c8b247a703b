use outpost_core::contract::RunsEnvelope;
use outpost_core::error::ApiError;
use outpost_core::records::{RunRecord, ATTR_ENTITY_TYPE, ATTR_OWNER_ID, ENTITY_TYPE_RUN};
use serde_json::Value;

use crate::adapters::record_store::{AttributeEquals, IndexQuery, RecordStore, ScanDirection};
use crate::config::ApiContext;
use crate::handlers::gateway::{ApiGatewayResponse, GatewayRequest};
use crate::handlers::{caller_for, dispatch};

pub fn handle_list_runs<S: RecordStore>(
    event: Value,
    context: &ApiContext<S>,
) -> ApiGatewayResponse {
    dispatch(event, context, "list_runs", 200, list_runs)
}

/// The caller's runs, newest first. Ordering comes from scanning the
/// creation-time index backwards, not from sorting here.
pub(crate) fn list_runs<S: RecordStore>(
    request: &GatewayRequest,
    context: &ApiContext<S>,
) -> Result<RunsEnvelope, ApiError> {
    let caller = caller_for(request, context)?;

    let items = context.store.query(&IndexQuery {
        table: context.config.runs_table.clone(),
        index: context.config.runs_index.clone(),
        partition: AttributeEquals::new(ATTR_ENTITY_TYPE, ENTITY_TYPE_RUN),
        filter: Some(AttributeEquals::new(ATTR_OWNER_ID, caller.as_str())),
        direction: ScanDirection::Backward,
    })?;

    let runs = items
        .into_iter()
        .map(RunRecord::from_item)
        .collect::<Result<Vec<_>, _>>()?;
    tracing::debug!(count = runs.len(), "listed runs");
    Ok(RunsEnvelope { runs })
}
