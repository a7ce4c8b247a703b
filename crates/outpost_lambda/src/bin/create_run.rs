use lambda_runtime::Error;
use outpost_lambda::adapters::dynamodb::DynamoRecordStore;
use outpost_lambda::handlers::create_run::handle_create_run;

#[tokio::main]
async fn main() -> Result<(), Error> {
    outpost_lambda::runtime::serve(handle_create_run::<DynamoRecordStore>).await
}
