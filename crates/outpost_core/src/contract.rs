use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::records::{LeadRecord, RunRecord};

pub const RUN_CREATED_MESSAGE: &str = "Run created successfully";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateRunRequest {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedCreateRun {
    pub query: String,
    pub location: Option<String>,
}

/// A whitespace-only query counts as missing. Accepted values are stored as
/// sent.
pub fn validate_create_run(request: CreateRunRequest) -> Result<ValidatedCreateRun, ApiError> {
    let query = request
        .query
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("Missing required field: query".to_string()))?;

    let location = request
        .location
        .filter(|value| !value.trim().is_empty());

    Ok(ValidatedCreateRun { query, location })
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateRunResponse {
    pub message: String,
    #[serde(rename = "runId")]
    pub run_id: String,
}

impl CreateRunResponse {
    pub fn created(run_id: impl Into<String>) -> Self {
        Self {
            message: RUN_CREATED_MESSAGE.to_string(),
            run_id: run_id.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunEnvelope {
    pub run: RunRecord,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunsEnvelope {
    pub runs: Vec<RunRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LeadsEnvelope {
    pub leads: Vec<LeadRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
}

impl From<&ApiError> for ErrorBody {
    fn from(error: &ApiError) -> Self {
        Self {
            error: error.public_message().to_string(),
        }
    }
}
