use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::TurnDecodeError;

/// Discriminator of one model turn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    Plan,
    Action,
    Observe,
    Output,
    #[default]
    #[serde(other)]
    Other,
}

/// One decoded model reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnResponse {
    pub step: Step,
    pub content: String,
    pub function: Option<String>,
    pub input: Option<String>,
}

// Null and missing read as absent; other non-strings are rendered as JSON.
fn text_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    match fields.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl TurnResponse {
    pub fn parse(reply: &str) -> Result<Self, TurnDecodeError> {
        let fields = match serde_json::from_str::<Value>(reply)? {
            Value::Object(fields) => fields,
            other => return Err(TurnDecodeError::NotAnObject(kind_of(&other))),
        };

        let step = fields
            .get("step")
            .filter(|v| v.is_string())
            .and_then(|v| Step::deserialize(v).ok())
            .unwrap_or_default();

        Ok(TurnResponse {
            step,
            content: text_field(&fields, "content").unwrap_or_default(),
            function: text_field(&fields, "function"),
            input: text_field(&fields, "input"),
        })
    }
}
