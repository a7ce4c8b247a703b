use std::collections::HashMap;

use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::primitives::Blob;
use aws_sdk_dynamodb::types::AttributeValue;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use outpost_core::records::Item;
use serde_json::{Number, Value};

use crate::adapters::record_store::{IndexQuery, RecordStore, ScanDirection, StoreError};

type AttributeMap = HashMap<String, AttributeValue>;

pub struct DynamoRecordStore {
    client: aws_sdk_dynamodb::Client,
}

impl DynamoRecordStore {
    pub fn new(client: aws_sdk_dynamodb::Client) -> Self {
        Self { client }
    }
}

impl RecordStore for DynamoRecordStore {
    fn put_item(&self, table: &str, item: Item) -> Result<(), StoreError> {
        let client = self.client.clone();
        let table_name = table.to_string();
        let attributes = item_to_attributes(item);

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                client
                    .put_item()
                    .table_name(&table_name)
                    .set_item(Some(attributes))
                    .send()
                    .await
                    .map(|_| ())
                    .map_err(|error| request_error("PutItem", &table_name, &error))
            })
        })
    }

    fn get_item(
        &self,
        table: &str,
        key_attribute: &str,
        key_value: &str,
    ) -> Result<Option<Item>, StoreError> {
        let request = get_request(&self.client, table, key_attribute, key_value);
        let table_name = table.to_string();

        let output = tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                request
                    .send()
                    .await
                    .map_err(|error| request_error("GetItem", &table_name, &error))
            })
        })?;

        output.item.map(attributes_to_item).transpose()
    }

    fn query(&self, query: &IndexQuery) -> Result<Vec<Item>, StoreError> {
        let client = self.client.clone();
        let query = query.clone();

        let pages = tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                let mut items = Vec::new();
                let mut start_key: Option<AttributeMap> = None;
                loop {
                    let output = query_page(&client, &query, start_key.take())
                        .send()
                        .await
                        .map_err(|error| request_error("Query", &query.table, &error))?;

                    items.extend(output.items.unwrap_or_default());
                    match output.last_evaluated_key {
                        Some(key) if !key.is_empty() => start_key = Some(key),
                        _ => break,
                    }
                }
                Ok::<_, StoreError>(items)
            })
        })?;

        pages.into_iter().map(attributes_to_item).collect()
    }
}

/// Strongly consistent, so a run is readable right after its PutItem.
fn get_request(
    client: &aws_sdk_dynamodb::Client,
    table: &str,
    key_attribute: &str,
    key_value: &str,
) -> aws_sdk_dynamodb::operation::get_item::builders::GetItemFluentBuilder {
    client
        .get_item()
        .table_name(table)
        .key(key_attribute, AttributeValue::S(key_value.to_string()))
        .consistent_read(true)
}

fn query_page(
    client: &aws_sdk_dynamodb::Client,
    query: &IndexQuery,
    start_key: Option<AttributeMap>,
) -> aws_sdk_dynamodb::operation::query::builders::QueryFluentBuilder {
    let mut request = client
        .query()
        .table_name(&query.table)
        .index_name(&query.index)
        .key_condition_expression("#pk = :pk")
        .expression_attribute_names("#pk", &query.partition.attribute)
        .expression_attribute_values(":pk", AttributeValue::S(query.partition.value.clone()))
        .scan_index_forward(query.direction == ScanDirection::Forward)
        .set_exclusive_start_key(start_key);

    if let Some(filter) = &query.filter {
        request = request
            .filter_expression("#filter = :filter")
            .expression_attribute_names("#filter", &filter.attribute)
            .expression_attribute_values(":filter", AttributeValue::S(filter.value.clone()));
    }

    request
}

fn request_error<E>(operation: &'static str, table: &str, error: &E) -> StoreError
where
    E: std::error::Error,
{
    StoreError::Request {
        operation,
        table: table.to_string(),
        message: DisplayErrorContext(error).to_string(),
    }
}

pub fn item_to_attributes(item: Item) -> AttributeMap {
    item.into_iter()
        .map(|(name, value)| (name, json_to_attribute(value)))
        .collect()
}

pub fn attributes_to_item(attributes: AttributeMap) -> Result<Item, StoreError> {
    attributes
        .into_iter()
        .map(|(name, value)| {
            let decoded = attribute_to_json(&name, value)?;
            Ok((name, decoded))
        })
        .collect()
}

fn json_to_attribute(value: Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(flag) => AttributeValue::Bool(flag),
        Value::Number(number) => AttributeValue::N(number.to_string()),
        Value::String(text) => AttributeValue::S(text),
        Value::Array(values) => {
            AttributeValue::L(values.into_iter().map(json_to_attribute).collect())
        }
        Value::Object(map) => AttributeValue::M(item_to_attributes(map)),
    }
}

fn attribute_to_json(name: &str, value: AttributeValue) -> Result<Value, StoreError> {
    match value {
        AttributeValue::S(text) => Ok(Value::String(text)),
        AttributeValue::N(number) => parse_number(name, &number),
        AttributeValue::Bool(flag) => Ok(Value::Bool(flag)),
        AttributeValue::Null(_) => Ok(Value::Null),
        AttributeValue::Ss(values) => Ok(Value::Array(
            values.into_iter().map(Value::String).collect(),
        )),
        AttributeValue::Ns(values) => values
            .iter()
            .map(|number| parse_number(name, number))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        AttributeValue::B(blob) => Ok(blob_to_json(&blob)),
        AttributeValue::Bs(blobs) => Ok(Value::Array(blobs.iter().map(blob_to_json).collect())),
        AttributeValue::L(values) => values
            .into_iter()
            .map(|value| attribute_to_json(name, value))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        AttributeValue::M(map) => attributes_to_item(map).map(Value::Object),
        other => Err(StoreError::Decode {
            attribute: name.to_string(),
            message: format!("unsupported attribute type {other:?}"),
        }),
    }
}

/// Binary attributes surface as standard base64 text.
fn blob_to_json(blob: &Blob) -> Value {
    Value::String(STANDARD.encode(blob.as_ref()))
}

fn parse_number(name: &str, text: &str) -> Result<Value, StoreError> {
    if let Ok(value) = text.parse::<i64>() {
        return Ok(Value::from(value));
    }
    if let Ok(value) = text.parse::<u64>() {
        return Ok(Value::from(value));
    }
    text.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .ok_or_else(|| StoreError::Decode {
            attribute: name.to_string(),
            message: format!("'{text}' is not a number"),
        })
}

#[cfg(test)]
mod tests {
    use outpost_core::records::LeadRecord;
    use serde_json::json;

    use super::*;
    use crate::adapters::record_store::AttributeEquals;

    #[test]
    fn numbers_become_n_attributes_and_decode_back_to_integers() {
        let item = match json!({"leadsCount": 12, "query": "dentists"}) {
            Value::Object(item) => item,
            _ => unreachable!(),
        };

        let attributes = item_to_attributes(item);
        assert_eq!(
            attributes.get("leadsCount"),
            Some(&AttributeValue::N("12".to_string()))
        );

        let decoded = attributes_to_item(attributes).expect("attributes should decode");
        assert_eq!(decoded["leadsCount"], json!(12));
        assert_eq!(decoded["query"], json!("dentists"));
    }

    #[test]
    fn nested_maps_and_lists_decode() {
        let attributes = HashMap::from([(
            "meta".to_string(),
            AttributeValue::M(HashMap::from([(
                "tags".to_string(),
                AttributeValue::L(vec![
                    AttributeValue::S("local".to_string()),
                    AttributeValue::N("2.5".to_string()),
                ]),
            )])),
        )]);

        let decoded = attributes_to_item(attributes).expect("attributes should decode");
        assert_eq!(decoded["meta"], json!({"tags": ["local", 2.5]}));
    }

    #[test]
    fn malformed_number_is_a_decode_error() {
        let attributes = HashMap::from([(
            "leadsCount".to_string(),
            AttributeValue::N("twelve".to_string()),
        )]);

        let error = attributes_to_item(attributes).expect_err("number should not parse");
        assert!(error.to_string().contains("leadsCount"));
    }

    #[test]
    fn number_and_binary_sets_decode_to_arrays() {
        let attributes = HashMap::from([
            (
                "scores".to_string(),
                AttributeValue::Ns(vec!["1".to_string(), "2.5".to_string()]),
            ),
            ("blob".to_string(), AttributeValue::B(Blob::new(vec![1, 2, 3]))),
            (
                "blobs".to_string(),
                AttributeValue::Bs(vec![Blob::new(b"hi".to_vec())]),
            ),
        ]);

        let decoded = attributes_to_item(attributes).expect("attributes should decode");
        assert_eq!(decoded["scores"], json!([1, 2.5]));
        assert_eq!(decoded["blob"], json!("AQID"));
        assert_eq!(decoded["blobs"], json!(["aGk="]));
    }

    #[test]
    fn lead_with_extra_set_attributes_still_decodes() {
        let mut attributes: AttributeMap = [
            ("id", "run-1#1#0"),
            ("runId", "run-1"),
            ("companyName", "Acme Roofing"),
            ("domain", "acme.example"),
            ("description", "Roofing in Austin"),
            ("status", "NEW"),
            ("source", "google-serp"),
            ("createdAt", "2026-01-02T03:04:05.000Z"),
        ]
        .into_iter()
        .map(|(name, value)| (name.to_string(), AttributeValue::S(value.to_string())))
        .collect();
        attributes.insert(
            "scores".to_string(),
            AttributeValue::Ns(vec!["1".to_string()]),
        );
        attributes.insert(
            "screenshot".to_string(),
            AttributeValue::B(Blob::new(vec![0xff])),
        );

        let item = attributes_to_item(attributes).expect("attributes should decode");
        let lead = LeadRecord::from_item(item).expect("lead should decode");
        assert_eq!(lead.company_name, "Acme Roofing");
    }

    #[test]
    fn malformed_number_in_a_set_is_a_decode_error() {
        let attributes = HashMap::from([(
            "scores".to_string(),
            AttributeValue::Ns(vec!["one".to_string()]),
        )]);

        let error = attributes_to_item(attributes).expect_err("number should not parse");
        assert!(error.to_string().contains("scores"));
    }

    fn offline_client() -> aws_sdk_dynamodb::Client {
        aws_sdk_dynamodb::Client::from_conf(
            aws_sdk_dynamodb::Config::builder()
                .behavior_version_latest()
                .build(),
        )
    }

    #[test]
    fn run_lookup_is_a_consistent_read() {
        let client = offline_client();
        let request = get_request(&client, "runs", "id", "run-1");
        let input = request.as_input();

        assert_eq!(*input.get_consistent_read(), Some(true));
        assert_eq!(input.get_table_name().as_deref(), Some("runs"));
        assert_eq!(
            input.get_key().as_ref().and_then(|key| key.get("id")),
            Some(&AttributeValue::S("run-1".to_string()))
        );
    }

    #[test]
    fn backward_filtered_query_reverses_the_index_scan() {
        let client = offline_client();
        let query = IndexQuery {
            table: "runs".to_string(),
            index: "byEntityTypeAndCreatedAt".to_string(),
            partition: AttributeEquals::new("entityType", "RUN"),
            filter: Some(AttributeEquals::new("ownerId", "user-a")),
            direction: ScanDirection::Backward,
        };
        let start_key = HashMap::from([(
            "id".to_string(),
            AttributeValue::S("run-9".to_string()),
        )]);

        let request = query_page(&client, &query, Some(start_key.clone()));
        let input = request.as_input();

        assert_eq!(input.get_table_name().as_deref(), Some("runs"));
        assert_eq!(
            input.get_index_name().as_deref(),
            Some("byEntityTypeAndCreatedAt")
        );
        assert_eq!(*input.get_scan_index_forward(), Some(false));
        assert_eq!(
            input.get_key_condition_expression().as_deref(),
            Some("#pk = :pk")
        );
        assert_eq!(
            input.get_filter_expression().as_deref(),
            Some("#filter = :filter")
        );

        let names = input
            .get_expression_attribute_names()
            .as_ref()
            .expect("names should be bound");
        assert_eq!(names.get("#pk").map(String::as_str), Some("entityType"));
        assert_eq!(names.get("#filter").map(String::as_str), Some("ownerId"));

        let values = input
            .get_expression_attribute_values()
            .as_ref()
            .expect("values should be bound");
        assert_eq!(values.get(":pk"), Some(&AttributeValue::S("RUN".to_string())));
        assert_eq!(
            values.get(":filter"),
            Some(&AttributeValue::S("user-a".to_string()))
        );
        assert_eq!(input.get_exclusive_start_key().as_ref(), Some(&start_key));
    }

    #[test]
    fn forward_unfiltered_query_binds_only_the_partition() {
        let client = offline_client();
        let query = IndexQuery {
            table: "leads".to_string(),
            index: "runId-index".to_string(),
            partition: AttributeEquals::new("runId", "run-1"),
            filter: None,
            direction: ScanDirection::Forward,
        };

        let request = query_page(&client, &query, None);
        let input = request.as_input();

        assert_eq!(*input.get_scan_index_forward(), Some(true));
        assert_eq!(*input.get_filter_expression(), None);
        assert_eq!(*input.get_exclusive_start_key(), None);
        let names = input
            .get_expression_attribute_names()
            .as_ref()
            .expect("names should be bound");
        assert_eq!(names.len(), 1);
        assert_eq!(names.get("#pk").map(String::as_str), Some("runId"));
    }
}
