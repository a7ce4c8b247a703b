use outpost_core::error::ApiError;
use outpost_core::records::Item;
use thiserror::Error;

/// Index scan order. `Backward` returns the newest sort keys first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanDirection {
    Forward,
    Backward,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeEquals {
    pub attribute: String,
    pub value: String,
}

impl AttributeEquals {
    pub fn new(attribute: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            value: value.into(),
        }
    }
}

/// A range query against a secondary index: one partition, an optional
/// post-read equality filter, and a scan direction over the index sort key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexQuery {
    pub table: String,
    pub index: String,
    pub partition: AttributeEquals,
    pub filter: Option<AttributeEquals>,
    pub direction: ScanDirection,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{operation} failed on table {table}: {message}")]
    Request {
        operation: &'static str,
        table: String,
        message: String,
    },
    #[error("failed to decode attribute {attribute}: {message}")]
    Decode { attribute: String, message: String },
}

impl From<StoreError> for ApiError {
    fn from(error: StoreError) -> Self {
        ApiError::Internal(error.to_string())
    }
}

/// The four store operations the handlers consume. Implementations block until
/// the store answers; timeouts belong to the underlying client configuration.
pub trait RecordStore {
    fn put_item(&self, table: &str, item: Item) -> Result<(), StoreError>;

    fn get_item(
        &self,
        table: &str,
        key_attribute: &str,
        key_value: &str,
    ) -> Result<Option<Item>, StoreError>;

    fn query(&self, query: &IndexQuery) -> Result<Vec<Item>, StoreError>;
}

impl<T: RecordStore + ?Sized> RecordStore for &T {
    fn put_item(&self, table: &str, item: Item) -> Result<(), StoreError> {
        (**self).put_item(table, item)
    }

    fn get_item(
        &self,
        table: &str,
        key_attribute: &str,
        key_value: &str,
    ) -> Result<Option<Item>, StoreError> {
        (**self).get_item(table, key_attribute, key_value)
    }

    fn query(&self, query: &IndexQuery) -> Result<Vec<Item>, StoreError> {
        (**self).query(query)
    }
}
