use lambda_runtime::Error;
use outpost_lambda::adapters::dynamodb::DynamoRecordStore;
use outpost_lambda::handlers::list_leads::handle_list_leads;

#[tokio::main]
async fn main() -> Result<(), Error> {
    outpost_lambda::runtime::serve(handle_list_leads::<DynamoRecordStore>).await
}
