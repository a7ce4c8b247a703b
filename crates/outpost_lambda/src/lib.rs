//! AWS-oriented adapters and handlers for the run/lead HTTP API.
//!
//! This crate owns runtime integration details (Lambda handlers, API Gateway
//! event decoding, and the DynamoDB adapter). Record shapes and policy live in
//! `outpost_core`.

pub mod adapters;
pub mod config;
pub mod handlers;
pub mod runtime;

pub use config::ApiContext;
