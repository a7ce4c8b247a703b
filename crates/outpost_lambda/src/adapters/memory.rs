use std::collections::HashMap;
use std::sync::Mutex;

use outpost_core::records::Item;
use serde_json::Value;

use crate::adapters::record_store::{IndexQuery, RecordStore, ScanDirection, StoreError};

#[derive(Debug, Clone)]
struct IndexDefinition {
    partition_attribute: String,
    sort_attribute: Option<String>,
}

/// Process-local store with declared secondary indexes, for tests and local
/// runs. Items are keyed by their `id` attribute.
#[derive(Default)]
pub struct InMemoryRecordStore {
    tables: Mutex<HashMap<String, Vec<Item>>>,
    indexes: HashMap<(String, String), IndexDefinition>,
    put_log: Mutex<Vec<(String, Item)>>,
    query_log: Mutex<Vec<IndexQuery>>,
    failing: Mutex<bool>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_index(
        mut self,
        table: &str,
        index: &str,
        partition_attribute: &str,
        sort_attribute: Option<&str>,
    ) -> Self {
        self.indexes.insert(
            (table.to_string(), index.to_string()),
            IndexDefinition {
                partition_attribute: partition_attribute.to_string(),
                sort_attribute: sort_attribute.map(str::to_string),
            },
        );
        self
    }

    /// Inserts an item without recording it as a handler write.
    pub fn seed(&self, table: &str, item: Item) {
        upsert(
            self.tables
                .lock()
                .expect("poisoned mutex")
                .entry(table.to_string())
                .or_default(),
            item,
        );
    }

    /// Makes every subsequent operation fail as if the store were unreachable.
    pub fn fail_requests(&self) {
        *self.failing.lock().expect("poisoned mutex") = true;
    }

    pub fn puts(&self) -> Vec<(String, Item)> {
        self.put_log.lock().expect("poisoned mutex").clone()
    }

    pub fn queries(&self) -> Vec<IndexQuery> {
        self.query_log.lock().expect("poisoned mutex").clone()
    }

    fn check_available(&self, operation: &'static str, table: &str) -> Result<(), StoreError> {
        if *self.failing.lock().expect("poisoned mutex") {
            return Err(StoreError::Request {
                operation,
                table: table.to_string(),
                message: "store unavailable".to_string(),
            });
        }
        Ok(())
    }
}

impl RecordStore for InMemoryRecordStore {
    fn put_item(&self, table: &str, item: Item) -> Result<(), StoreError> {
        self.check_available("PutItem", table)?;
        self.put_log
            .lock()
            .expect("poisoned mutex")
            .push((table.to_string(), item.clone()));
        upsert(
            self.tables
                .lock()
                .expect("poisoned mutex")
                .entry(table.to_string())
                .or_default(),
            item,
        );
        Ok(())
    }

    fn get_item(
        &self,
        table: &str,
        key_attribute: &str,
        key_value: &str,
    ) -> Result<Option<Item>, StoreError> {
        self.check_available("GetItem", table)?;
        let tables = self.tables.lock().expect("poisoned mutex");
        Ok(tables.get(table).and_then(|items| {
            items
                .iter()
                .find(|item| string_attribute(item, key_attribute) == Some(key_value))
                .cloned()
        }))
    }

    fn query(&self, query: &IndexQuery) -> Result<Vec<Item>, StoreError> {
        self.check_available("Query", &query.table)?;
        self.query_log
            .lock()
            .expect("poisoned mutex")
            .push(query.clone());

        let definition = self
            .indexes
            .get(&(query.table.clone(), query.index.clone()))
            .ok_or_else(|| StoreError::Request {
                operation: "Query",
                table: query.table.clone(),
                message: format!("index {} does not exist", query.index),
            })?;
        if definition.partition_attribute != query.partition.attribute {
            return Err(StoreError::Request {
                operation: "Query",
                table: query.table.clone(),
                message: format!(
                    "key condition must use partition attribute {}",
                    definition.partition_attribute
                ),
            });
        }

        let tables = self.tables.lock().expect("poisoned mutex");
        let mut matches: Vec<Item> = tables
            .get(&query.table)
            .map(|items| {
                items
                    .iter()
                    .filter(|item| {
                        string_attribute(item, &query.partition.attribute)
                            == Some(query.partition.value.as_str())
                    })
                    .filter(|item| match &query.filter {
                        Some(filter) => {
                            string_attribute(item, &filter.attribute)
                                == Some(filter.value.as_str())
                        }
                        None => true,
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if let Some(sort_attribute) = &definition.sort_attribute {
            matches.sort_by(|left, right| {
                string_attribute(left, sort_attribute).cmp(&string_attribute(right, sort_attribute))
            });
        }
        if query.direction == ScanDirection::Backward {
            matches.reverse();
        }
        Ok(matches)
    }
}

fn upsert(items: &mut Vec<Item>, item: Item) {
    let id = string_attribute(&item, "id").map(str::to_string);
    match items
        .iter_mut()
        .find(|existing| id.is_some() && string_attribute(existing, "id") == id.as_deref())
    {
        Some(existing) => *existing = item,
        None => items.push(item),
    }
}

fn string_attribute<'a>(item: &'a Item, attribute: &str) -> Option<&'a str> {
    item.get(attribute).and_then(Value::as_str)
}
