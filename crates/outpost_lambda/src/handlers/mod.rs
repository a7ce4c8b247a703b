pub mod create_run;
pub mod gateway;
pub mod get_run;
pub mod list_leads;
pub mod list_runs;
pub mod ownership;
pub mod router;

#[cfg(test)]
mod test_support;

use outpost_core::error::ApiError;
use outpost_core::identity::{resolve_caller, CallerIdentity};
use serde::Serialize;
use serde_json::Value;
use tracing::field;

use crate::adapters::record_store::RecordStore;
use crate::config::ApiContext;
use gateway::{ApiGatewayResponse, GatewayRequest};

/// Decodes the event, answers CORS preflight, and otherwise runs `operation`
/// inside a span carrying the operation name.
pub(crate) fn dispatch<S, T, F>(
    event: Value,
    context: &ApiContext<S>,
    operation: &'static str,
    success_status: u16,
    handler: F,
) -> ApiGatewayResponse
where
    S: RecordStore,
    T: Serialize,
    F: FnOnce(&GatewayRequest, &ApiContext<S>) -> Result<T, ApiError>,
{
    match GatewayRequest::from_event(event) {
        Ok(request) => run_operation(&request, context, operation, success_status, handler),
        Err(error) => {
            tracing::warn!(operation, error = %error, "rejected undecodable event");
            context.responses.error(&error)
        }
    }
}

pub(crate) fn run_operation<S, T, F>(
    request: &GatewayRequest,
    context: &ApiContext<S>,
    operation: &'static str,
    success_status: u16,
    handler: F,
) -> ApiGatewayResponse
where
    S: RecordStore,
    T: Serialize,
    F: FnOnce(&GatewayRequest, &ApiContext<S>) -> Result<T, ApiError>,
{
    if request.is_preflight() {
        return context.responses.preflight();
    }

    let span = tracing::info_span!(
        "request",
        operation,
        run_id = field::Empty,
        caller = field::Empty
    );
    let _entered = span.enter();

    match handler(request, context) {
        Ok(payload) => context.responses.json(success_status, &payload),
        Err(error) => {
            match &error {
                ApiError::Internal(_) => {
                    tracing::error!(status = error.status_code(), error = %error, "request failed")
                }
                _ => {
                    tracing::warn!(status = error.status_code(), error = %error, "request rejected")
                }
            }
            context.responses.error(&error)
        }
    }
}

pub(crate) fn caller_for<S>(
    request: &GatewayRequest,
    context: &ApiContext<S>,
) -> Result<CallerIdentity, ApiError> {
    let caller = resolve_caller(request.subject.as_deref(), context.config.identity_policy)?;
    tracing::Span::current().record("caller", caller.as_str());
    Ok(caller)
}

pub(crate) fn required_run_id(request: &GatewayRequest) -> Result<&str, ApiError> {
    let run_id = request
        .path_parameter("id")
        .ok_or_else(|| ApiError::BadRequest("Missing run ID".to_string()))?;
    tracing::Span::current().record("run_id", run_id);
    Ok(run_id)
}
