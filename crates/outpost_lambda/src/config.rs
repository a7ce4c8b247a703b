use std::env;

use outpost_core::identity::IdentityPolicy;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::adapters::record_store::RecordStore;
use crate::handlers::gateway::ResponseBuilder;

pub const DEFAULT_RUNS_INDEX: &str = "byEntityTypeAndCreatedAt";
pub const DEFAULT_LEADS_INDEX: &str = "runId-index";
pub const DEFAULT_ALLOWED_ORIGIN: &str = "*";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("{0} must not be empty")]
    Empty(&'static str),
}

/// Table, index and policy settings resolved once per container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub runs_table: String,
    pub leads_table: Option<String>,
    pub runs_index: String,
    pub leads_index: String,
    pub allowed_origin: String,
    pub identity_policy: IdentityPolicy,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let runs_table = required_non_empty(&lookup, "RUNS_TABLE_NAME")?;
        let leads_table = optional_non_empty(&lookup, "LEADS_TABLE_NAME");
        let runs_index = optional_non_empty(&lookup, "RUNS_GSI_NAME")
            .unwrap_or_else(|| DEFAULT_RUNS_INDEX.to_string());
        let leads_index = optional_non_empty(&lookup, "LEADS_GSI_NAME")
            .unwrap_or_else(|| DEFAULT_LEADS_INDEX.to_string());
        let allowed_origin = optional_non_empty(&lookup, "ALLOWED_ORIGIN")
            .unwrap_or_else(|| DEFAULT_ALLOWED_ORIGIN.to_string());
        let identity_policy = if lookup("ALLOW_ANONYMOUS_CALLERS")
            .unwrap_or_default()
            .trim()
            .eq_ignore_ascii_case("true")
        {
            IdentityPolicy::AnonymousFallback
        } else {
            IdentityPolicy::Required
        };

        Ok(Self {
            runs_table,
            leads_table,
            runs_index,
            leads_index,
            allowed_origin,
            identity_policy,
        })
    }
}

/// Everything a handler needs, built once in `main` and shared read-only by
/// every invocation.
pub struct ApiContext<S> {
    pub store: S,
    pub config: ApiConfig,
    pub responses: ResponseBuilder,
}

impl<S: RecordStore> ApiContext<S> {
    pub fn new(store: S, config: ApiConfig) -> Self {
        let responses = ResponseBuilder::new(config.allowed_origin.clone());
        Self {
            store,
            config,
            responses,
        }
    }
}

/// JSON lines on stderr so CloudWatch can index the structured fields.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .json()
        .with_writer(std::io::stderr)
        .init();
}

fn required_non_empty(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<String, ConfigError> {
    let value = lookup(name).ok_or(ConfigError::Missing(name))?;
    if value.trim().is_empty() {
        return Err(ConfigError::Empty(name));
    }
    Ok(value)
}

fn optional_non_empty(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(name).filter(|value| !value.trim().is_empty())
}
