use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;

use crate::adapters::dynamodb::DynamoRecordStore;
use crate::config::{init_tracing, ApiConfig, ApiContext};
use crate::handlers::gateway::ApiGatewayResponse;

/// Resolves configuration and the DynamoDB client once per container.
pub async fn dynamo_context() -> Result<ApiContext<DynamoRecordStore>, Error> {
    let config = ApiConfig::from_env()?;
    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let store = DynamoRecordStore::new(aws_sdk_dynamodb::Client::new(&aws_config));
    tracing::info!(
        runs_table = %config.runs_table,
        leads_table = config.leads_table.as_deref().unwrap_or(""),
        identity_policy = ?config.identity_policy,
        "api context initialized"
    );
    Ok(ApiContext::new(store, config))
}

/// Runs `handler` for every invocation against a context built at cold start.
pub async fn serve<H>(handler: H) -> Result<(), Error>
where
    H: Fn(Value, &ApiContext<DynamoRecordStore>) -> ApiGatewayResponse,
{
    init_tracing();
    let context = dynamo_context().await?;
    let context = &context;
    let handler = &handler;

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| async move {
        Ok::<ApiGatewayResponse, Error>(handler(event.payload, context))
    }))
    .await
}
