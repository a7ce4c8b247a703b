//! Shared lead-generation run primitives.
//!
//! This crate owns record shapes, the request/response contract, the error
//! taxonomy, and the caller identity policy. It intentionally excludes AWS SDK
//! and Lambda runtime concerns.

pub mod contract;
pub mod error;
pub mod identity;
pub mod records;
