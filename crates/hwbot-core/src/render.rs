//! Homework record → notification text.

use crate::{
    error::HomeworkError,
    homework::{HomeworkRecord, Verdict, NAME_KEY, STATUS_KEY},
};
use serde_json::Value;
use tracing::error;

/// Render the status-change sentence for one homework record.
pub fn render(record: &HomeworkRecord) -> Result<String, HomeworkError> {
    if !record.is_object() {
        return Err(HomeworkError::SchemaViolation(format!(
            "homework record is not a JSON object: {}",
            record.raw()
        )));
    }
    let Some(name) = record.name() else {
        return Err(HomeworkError::SchemaViolation(format!(
            "homework record is missing the `{NAME_KEY}` key"
        )));
    };

    let Some(verdict) = record.status().and_then(Verdict::from_key) else {
        let status = match record.raw().get(STATUS_KEY) {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => "<missing>".to_string(),
        };
        error!("unexpected homework status: {status}");
        return Err(HomeworkError::UnknownStatus(status));
    };

    Ok(format!(
        "Changed review status of work \"{name}\". {}",
        verdict.text()
    ))
}
