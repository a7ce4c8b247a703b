use outpost_core::contract::LeadsEnvelope;
use outpost_core::error::ApiError;
use outpost_core::records::{LeadRecord, ATTR_RUN_ID};
use serde_json::Value;

use crate::adapters::record_store::{AttributeEquals, IndexQuery, RecordStore, ScanDirection};
use crate::config::ApiContext;
use crate::handlers::gateway::{ApiGatewayResponse, GatewayRequest};
use crate::handlers::ownership::load_owned_run;
use crate::handlers::{caller_for, dispatch, required_run_id};

pub fn handle_list_leads<S: RecordStore>(
    event: Value,
    context: &ApiContext<S>,
) -> ApiGatewayResponse {
    dispatch(event, context, "list_leads", 200, list_leads)
}

/// The leads query only runs after the ownership check has passed.
pub(crate) fn list_leads<S: RecordStore>(
    request: &GatewayRequest,
    context: &ApiContext<S>,
) -> Result<LeadsEnvelope, ApiError> {
    let run_id = required_run_id(request)?;
    let caller = caller_for(request, context)?;
    load_owned_run(&context.store, &context.config, run_id, &caller)?;

    let leads_table = context.config.leads_table.as_ref().ok_or_else(|| {
        ApiError::Internal("LEADS_TABLE_NAME must be configured".to_string())
    })?;
    let items = context.store.query(&IndexQuery {
        table: leads_table.clone(),
        index: context.config.leads_index.clone(),
        partition: AttributeEquals::new(ATTR_RUN_ID, run_id),
        filter: None,
        direction: ScanDirection::Forward,
    })?;

    let leads = items
        .into_iter()
        .map(LeadRecord::from_item)
        .collect::<Result<Vec<_>, _>>()?;
    tracing::debug!(count = leads.len(), "listed leads");
    Ok(LeadsEnvelope { leads })
}
