use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Transport,
    Server,
    ContractViolation,
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("analysis service returned status {status}: {message}")]
    Server { status: u16, message: String },
    #[error("analysis service contract violation: {0}")]
    ContractViolation(String),
    #[error("{0} not found")]
    NotFound(String),
}

impl AnalysisError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AnalysisError::Validation(_) => ErrorKind::Validation,
            AnalysisError::Transport(_) => ErrorKind::Transport,
            AnalysisError::Server { .. } => ErrorKind::Server,
            AnalysisError::ContractViolation(_) => ErrorKind::ContractViolation,
            AnalysisError::NotFound(_) => ErrorKind::NotFound,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    pub fn contract(message: impl Into<String>) -> Self {
        Self::ContractViolation(message.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }
}

impl From<serde_json::Error> for AnalysisError {
    fn from(value: serde_json::Error) -> Self {
        Self::ContractViolation(format!("malformed payload: {value}"))
    }
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;
