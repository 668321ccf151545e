//! Homework records and the review verdict table.

use serde_json::Value;

/// Key holding the homework title inside a record.
pub const NAME_KEY: &str = "homework_name";
/// Key holding the review status inside a record.
pub const STATUS_KEY: &str = "status";

/// One homework entry from the status payload.
///
/// Only `homework_name` and `status` are interpreted; every other field the
/// API sends is carried along untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct HomeworkRecord(Value);

impl HomeworkRecord {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// The homework title, if present and a string.
    pub fn name(&self) -> Option<&str> {
        self.0.get(NAME_KEY).and_then(Value::as_str)
    }

    /// The raw status value, if present and a string.
    pub fn status(&self) -> Option<&str> {
        self.0.get(STATUS_KEY).and_then(Value::as_str)
    }

    /// Whether the record is a JSON object at all.
    pub fn is_object(&self) -> bool {
        self.0.is_object()
    }

    pub fn raw(&self) -> &Value {
        &self.0
    }
}

/// A structurally valid status payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub homeworks: Vec<HomeworkRecord>,
    /// Server time of the response; becomes the next poll watermark.
    pub current_date: i64,
}

/// Review outcome of a homework submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Approved,
    Reviewing,
    Rejected,
}

impl Verdict {
    pub const ALL: [Verdict; 3] = [Verdict::Approved, Verdict::Reviewing, Verdict::Rejected];

    /// Look up a verdict by its wire key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.key() == key)
    }

    /// Wire key as sent by the status API.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Reviewing => "reviewing",
            Self::Rejected => "rejected",
        }
    }

    /// Display sentence for notifications.
    pub fn text(&self) -> &'static str {
        match self {
            Self::Approved => "Work reviewed: the reviewer liked everything. Hooray!",
            Self::Reviewing => "Work taken for review by the reviewer.",
            Self::Rejected => "Work reviewed: the reviewer has comments.",
        }
    }
}
