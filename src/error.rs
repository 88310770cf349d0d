use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to open workbook {path}: {reason}")]
    DocumentUnreadable { path: PathBuf, reason: String },
}

#[derive(Debug, Error)]
pub enum RequirementsError {
    #[error("requirements payload must be a key/value object, found {found}")]
    NotAnObject { found: &'static str },

    #[error("requirements field `{field}` has an invalid shape: {reason}")]
    InvalidField { field: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExtractWarning {
    #[error("roadmap row {row} has no numeric amount: {text}")]
    MalformedRequirementRow { row: usize, text: String },

    #[error("sheet `{name}` not present; defaults applied")]
    MissingSheet { name: String },
}

pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
