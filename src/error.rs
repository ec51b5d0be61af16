//==================================================
// File: error.rs
//==================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Shared error type for traversal setup and execution
// Objective: Classify failures with stable codes callers can match on
//==================================================

use thiserror::Error;

/// Result type used across the crate.
pub type TraversalResult<T> = std::result::Result<T, TraversalError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Configuration,
    Verification,
    Selection,
    Translation,
    Execution,
    Dataset,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::Configuration => "G001",
            ErrorCode::Verification => "G002",
            ErrorCode::Selection => "G003",
            ErrorCode::Translation => "G004",
            ErrorCode::Execution => "G005",
            ErrorCode::Dataset => "G006",
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TraversalError {
    #[error("strategy ordering cycle involving {}", .0.join(", "))]
    StrategyCycle(Vec<String>),
    #[error("invalid option: {0}")]
    InvalidOption(String),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("{strategy} rejected traversal: {message}")]
    Verification { strategy: String, message: String },
    #[error("choose selector produced {count} values for one input, expected exactly one")]
    Selection { count: usize },
    #[error("cannot translate `{operator}`: {reason}")]
    Translation { operator: String, reason: String },
    #[error("execution failed: {0}")]
    Execution(String),
    #[error("dataset error: {0}")]
    Dataset(String),
}

impl TraversalError {
    pub fn code(&self) -> ErrorCode {
        match self {
            TraversalError::StrategyCycle(_)
            | TraversalError::InvalidOption(_)
            | TraversalError::Config(_) => ErrorCode::Configuration,
            TraversalError::Verification { .. } => ErrorCode::Verification,
            TraversalError::Selection { .. } => ErrorCode::Selection,
            TraversalError::Translation { .. } => ErrorCode::Translation,
            TraversalError::Execution(_) => ErrorCode::Execution,
            TraversalError::Dataset(_) => ErrorCode::Dataset,
        }
    }

    pub fn code_str(&self) -> &'static str {
        self.code().as_str()
    }

    pub(crate) fn verification(strategy: &str, message: impl Into<String>) -> Self {
        TraversalError::Verification {
            strategy: strategy.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn translation(operator: &str, reason: impl Into<String>) -> Self {
        TraversalError::Translation {
            operator: operator.to_string(),
            reason: reason.into(),
        }
    }
}
