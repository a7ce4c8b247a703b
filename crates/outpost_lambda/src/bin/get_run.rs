use lambda_runtime::Error;
use outpost_lambda::adapters::dynamodb::DynamoRecordStore;
use outpost_lambda::handlers::get_run::handle_get_run;

#[tokio::main]
async fn main() -> Result<(), Error> {
    outpost_lambda::runtime::serve(handle_get_run::<DynamoRecordStore>).await
}
