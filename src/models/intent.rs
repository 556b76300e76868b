use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;

pub const CASE_TYPE: &str = "case_type";
pub const DURATION: &str = "duration";
pub const LOCATION: &str = "location";
pub const LOWER_BOUND_NUMBER: &str = "lower_bound_number";

/// Structured intent produced by the extraction interpreter, e.g.
/// `{"intent": "sum_cases_duration", "entities": {"location": "Kerala"}}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Intent {
    #[serde(rename = "intent", alias = "operation")]
    pub operation: String,
    /// `null` (sent for intents without entities) decodes as an empty map.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub entities: HashMap<String, String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<HashMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::deserialize(deserializer)?.unwrap_or_default())
}

impl Intent {
    pub fn new(operation: &str) -> Self {
        Self {
            operation: operation.to_string(),
            entities: HashMap::new(),
        }
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.entities.insert(key.to_string(), value.to_string());
        self
    }

    /// Decode the interpreter's JSON line.
    pub fn decode(raw: &str) -> AppResult<Self> {
        serde_json::from_str(raw.trim()).map_err(|e| AppError::Decode(e.to_string()))
    }

    pub fn entity(&self, key: &str) -> Option<&str> {
        self.entities.get(key).map(String::as_str)
    }

    pub fn location(&self) -> &str {
        self.entity(LOCATION).unwrap_or("")
    }

    /// Integer threshold for `date_based`; 0 when absent or unparsable.
    pub fn lower_bound(&self) -> i64 {
        self.entity(LOWER_BOUND_NUMBER)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(0)
    }
}
