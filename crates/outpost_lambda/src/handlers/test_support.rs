use outpost_core::records::{
    Item, LeadRecord, RunRecord, RunStatus, ATTR_CREATED_AT, ATTR_ENTITY_TYPE, ATTR_RUN_ID,
    ENTITY_TYPE_RUN,
};
use serde_json::{json, Value};

use crate::adapters::memory::InMemoryRecordStore;
use crate::config::{ApiConfig, ApiContext};
use crate::handlers::gateway::ApiGatewayResponse;

pub const RUNS_TABLE: &str = "runs";
pub const LEADS_TABLE: &str = "leads";

pub fn test_config() -> ApiConfig {
    ApiConfig::from_lookup(|name| match name {
        "RUNS_TABLE_NAME" => Some(RUNS_TABLE.to_string()),
        "LEADS_TABLE_NAME" => Some(LEADS_TABLE.to_string()),
        _ => None,
    })
    .expect("test config should load")
}

pub fn test_store(config: &ApiConfig) -> InMemoryRecordStore {
    InMemoryRecordStore::new()
        .with_index(
            RUNS_TABLE,
            &config.runs_index,
            ATTR_ENTITY_TYPE,
            Some(ATTR_CREATED_AT),
        )
        .with_index(LEADS_TABLE, &config.leads_index, ATTR_RUN_ID, None)
}

pub fn test_context() -> ApiContext<InMemoryRecordStore> {
    let config = test_config();
    ApiContext::new(test_store(&config), config)
}

pub fn seed_run(
    context: &ApiContext<InMemoryRecordStore>,
    run_id: &str,
    owner: Option<&str>,
    created_at: &str,
) {
    let run = RunRecord {
        id: run_id.to_string(),
        owner_id: owner.map(str::to_string),
        entity_type: ENTITY_TYPE_RUN.to_string(),
        query: format!("query for {run_id}"),
        location: None,
        status: RunStatus::Pending,
        created_at: created_at.to_string(),
        leads_count: None,
        updated_at: None,
        error: None,
    };
    context
        .store
        .seed(RUNS_TABLE, run.to_item().expect("run should encode"));
}

pub fn seed_lead(context: &ApiContext<InMemoryRecordStore>, run_id: &str, index: usize) {
    let lead = LeadRecord {
        id: format!("{run_id}#1767225600000#{index}"),
        run_id: run_id.to_string(),
        company_name: format!("Company {index}"),
        domain: format!("company{index}.example"),
        description: "Found via search".to_string(),
        status: "NEW".to_string(),
        source: "google-serp".to_string(),
        created_at: "2026-01-01T00:00:00.000Z".to_string(),
        summary: None,
        email_draft: None,
    };
    let mut item: Item = lead.to_item().expect("lead should encode");
    item.insert("websiteText".to_string(), json!("scraped page text"));
    context.store.seed(LEADS_TABLE, item);
}

pub fn rest_event(
    method: &str,
    run_id: Option<&str>,
    body: Option<&str>,
    sub: Option<&str>,
) -> Value {
    let authorizer = match sub {
        Some(sub) => json!({"claims": {"sub": sub}}),
        None => json!({}),
    };
    json!({
        "httpMethod": method,
        "pathParameters": run_id.map(|id| json!({"id": id})).unwrap_or(Value::Null),
        "body": body,
        "requestContext": {"authorizer": authorizer}
    })
}

pub fn body_json(response: &ApiGatewayResponse) -> Value {
    serde_json::from_str(&response.body).expect("response body should be JSON")
}
