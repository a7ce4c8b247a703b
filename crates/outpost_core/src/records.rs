use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

pub const ENTITY_TYPE_RUN: &str = "RUN";

pub const ATTR_ID: &str = "id";
pub const ATTR_OWNER_ID: &str = "ownerId";
pub const ATTR_ENTITY_TYPE: &str = "entityType";
pub const ATTR_RUN_ID: &str = "runId";
pub const ATTR_CREATED_AT: &str = "createdAt";

/// A schemaless store record in transport-neutral form.
pub type Item = Map<String, Value>;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStatus {
    Pending,
    Queued,
    Processing,
    Completed,
    Failed,
}

/// A tracked unit of work started by a search query.
///
/// `status`, `leads_count`, `updated_at` and `error` advance outside this
/// service; only `new_pending` writes a run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunRecord {
    pub id: String,
    #[serde(rename = "ownerId", default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    #[serde(rename = "entityType")]
    pub entity_type: String,
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub status: RunStatus,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "leadsCount", default, skip_serializing_if = "Option::is_none")]
    pub leads_count: Option<u64>,
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RunRecord {
    pub fn new_pending(
        id: impl Into<String>,
        owner_id: impl Into<String>,
        query: impl Into<String>,
        location: Option<String>,
        created_at: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            owner_id: Some(owner_id.into()),
            entity_type: ENTITY_TYPE_RUN.to_string(),
            query: query.into(),
            location,
            status: RunStatus::Pending,
            created_at: created_at.into(),
            leads_count: None,
            updated_at: None,
            error: None,
        }
    }

    /// Returns true when `caller` is the identity captured at creation.
    /// Runs without an owner belong to nobody.
    pub fn is_owned_by(&self, caller: &str) -> bool {
        self.owner_id.as_deref() == Some(caller)
    }

    pub fn to_item(&self) -> Result<Item, RecordError> {
        to_item(self)
    }

    pub fn from_item(item: Item) -> Result<Self, RecordError> {
        from_item(item, "run")
    }
}

/// A discovered company associated with exactly one run.
///
/// Attributes outside this shape (for example scraped page text) are dropped
/// on decode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LeadRecord {
    pub id: String,
    #[serde(rename = "runId")]
    pub run_id: String,
    #[serde(rename = "companyName")]
    pub company_name: String,
    pub domain: String,
    pub description: String,
    pub status: String,
    pub source: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_draft: Option<String>,
}

impl LeadRecord {
    pub fn to_item(&self) -> Result<Item, RecordError> {
        to_item(self)
    }

    pub fn from_item(item: Item) -> Result<Self, RecordError> {
        from_item(item, "lead")
    }
}

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("failed to decode {kind} record: {source}")]
    Decode {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode record: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("record did not encode to an attribute map")]
    NotAnObject,
}

fn to_item(record: &impl Serialize) -> Result<Item, RecordError> {
    match serde_json::to_value(record).map_err(RecordError::Encode)? {
        Value::Object(item) => Ok(item),
        _ => Err(RecordError::NotAnObject),
    }
}

fn from_item<T: DeserializeOwned>(item: Item, kind: &'static str) -> Result<T, RecordError> {
    serde_json::from_value(Value::Object(item))
        .map_err(|source| RecordError::Decode { kind, source })
}
