use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur while parsing or validating rule trees and logic
/// expressions.
#[derive(Error, Debug, Clone)]
pub enum RuleError {
    #[error("Failed to parse logic expression: {0}")]
    MalformedLogic(String),

    #[error("Condition references field '{path}', which is not present in the query configuration")]
    UnknownField { path: String },

    #[error("Operator '{operator}' is not allowed for field '{path}'")]
    OperatorNotAllowed { path: String, operator: String },
}

/// Errors returned by the remote data-store client.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// A business-rule failure reported by the remote API. The display form
    /// is the server message verbatim, so callers can surface it unchanged.
    #[error("{message}")]
    Remote { status: u16, message: String },

    #[error("Unexpected response: {0}")]
    InvalidResponse(String),

    #[error("Client configuration error: {0}")]
    Config(String),
}

/// Errors that can occur while seeding dialog state from a task template.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectError {
    #[error("Task with id {0} was not found")]
    TaskNotFound(i64),

    #[error("Filter with id {0} was not found")]
    FilterNotFound(i64),

    #[error("Class with id {0} was not found")]
    ClassNotFound(i64),
}

/// Errors that can occur while composing a bulk modification payload.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    #[error("Property action references unknown property uuid {0}")]
    UnknownProperty(Uuid),
}
