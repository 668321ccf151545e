//! Shape checks for the decoded status payload.

use crate::{
    error::HomeworkError,
    homework::{ApiResponse, HomeworkRecord},
};
use serde_json::Value;
use tracing::error;

pub const HOMEWORKS_KEY: &str = "homeworks";
pub const CURRENT_DATE_KEY: &str = "current_date";

/// Validate a decoded payload and return its homework list.
pub fn validate(raw: &Value) -> Result<Vec<HomeworkRecord>, HomeworkError> {
    validate_response(raw).map(|resp| resp.homeworks)
}

/// Validate a decoded payload into an [`ApiResponse`].
///
/// Every violation is logged before it is returned.
pub fn validate_response(raw: &Value) -> Result<ApiResponse, HomeworkError> {
    let Some(map) = raw.as_object() else {
        return Err(violation("API response is not a JSON object"));
    };

    let (Some(homeworks), Some(current_date)) =
        (map.get(HOMEWORKS_KEY), map.get(CURRENT_DATE_KEY))
    else {
        return Err(violation(&format!(
            "API response is missing expected keys `{HOMEWORKS_KEY}` and/or `{CURRENT_DATE_KEY}`"
        )));
    };

    let Some(items) = homeworks.as_array() else {
        return Err(violation(&format!(
            "API response key `{HOMEWORKS_KEY}` must hold a list"
        )));
    };

    let Some(current_date) = current_date.as_i64() else {
        return Err(violation(&format!(
            "API response key `{CURRENT_DATE_KEY}` must hold an integer timestamp"
        )));
    };

    Ok(ApiResponse {
        homeworks: items.iter().cloned().map(HomeworkRecord::new).collect(),
        current_date,
    })
}

fn violation(msg: &str) -> HomeworkError {
    error!("{msg}");
    HomeworkError::SchemaViolation(msg.to_string())
}
