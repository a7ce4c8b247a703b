pub mod dynamodb;
#[cfg(any(test, feature = "test-helpers"))]
pub mod memory;
pub mod record_store;
