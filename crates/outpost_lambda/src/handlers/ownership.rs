//! The authorization gate shared by the run and lead read paths.
//!
//! Existence is confirmed before ownership, so a non-owner holding a valid
//! run ID learns that the run exists (403) but never sees its contents.

use outpost_core::error::ApiError;
use outpost_core::identity::CallerIdentity;
use outpost_core::records::{RunRecord, ATTR_ID};

use crate::adapters::record_store::RecordStore;
use crate::config::ApiConfig;

pub fn fetch_run(
    store: &impl RecordStore,
    config: &ApiConfig,
    run_id: &str,
) -> Result<RunRecord, ApiError> {
    let item = store
        .get_item(&config.runs_table, ATTR_ID, run_id)?
        .ok_or_else(|| ApiError::NotFound("Run not found".to_string()))?;
    Ok(RunRecord::from_item(item)?)
}

pub fn authorize_owner(run: RunRecord, caller: &CallerIdentity) -> Result<RunRecord, ApiError> {
    if run.is_owned_by(caller.as_str()) {
        return Ok(run);
    }
    tracing::warn!(
        owner = run.owner_id.as_deref().unwrap_or(""),
        anonymous = caller.is_anonymous(),
        "caller does not own run"
    );
    Err(ApiError::Forbidden("Forbidden".to_string()))
}

/// Loads `run_id` and returns it only when `caller` owns it.
pub fn load_owned_run(
    store: &impl RecordStore,
    config: &ApiConfig,
    run_id: &str,
    caller: &CallerIdentity,
) -> Result<RunRecord, ApiError> {
    authorize_owner(fetch_run(store, config, run_id)?, caller)
}
