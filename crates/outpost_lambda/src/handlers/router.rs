use outpost_core::error::ApiError;
use serde_json::Value;

use crate::adapters::record_store::RecordStore;
use crate::config::ApiContext;
use crate::handlers::gateway::{ApiGatewayResponse, GatewayRequest};
use crate::handlers::{create_run, get_run, list_leads, list_runs, run_operation};

/// Routes an event for the combined runtime by method and API resource
/// (`routeKey` on HTTP APIs, `resource` on REST APIs).
pub fn route_request<S: RecordStore>(event: Value, context: &ApiContext<S>) -> ApiGatewayResponse {
    let request = match GatewayRequest::from_event(event) {
        Ok(value) => value,
        Err(error) => return context.responses.error(&error),
    };
    if request.is_preflight() {
        return context.responses.preflight();
    }

    match (request.method.as_deref(), request.route.as_deref()) {
        (Some("POST"), Some("/runs")) => {
            run_operation(&request, context, "create_run", 201, create_run::create_run)
        }
        (Some("GET"), Some("/runs")) => {
            run_operation(&request, context, "list_runs", 200, list_runs::list_runs)
        }
        (Some("GET"), Some("/runs/{id}")) => {
            run_operation(&request, context, "get_run", 200, get_run::get_run)
        }
        (Some("GET"), Some("/runs/{id}/leads")) => {
            run_operation(&request, context, "list_leads", 200, list_leads::list_leads)
        }
        (method, route) => {
            tracing::warn!(?method, ?route, "no handler for route");
            context
                .responses
                .error(&ApiError::NotFound("Route not found".to_string()))
        }
    }
}
