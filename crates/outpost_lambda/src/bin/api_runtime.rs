use lambda_runtime::Error;
use outpost_lambda::adapters::dynamodb::DynamoRecordStore;
use outpost_lambda::handlers::router::route_request;

#[tokio::main]
async fn main() -> Result<(), Error> {
    outpost_lambda::runtime::serve(route_request::<DynamoRecordStore>).await
}
