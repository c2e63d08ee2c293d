//! Error types and handling for the vitrine CLI

use serde::Serialize;
use std::fmt;

/// Application error types. Malformed *data* never lands here — converters
/// and matchers degrade to "no match" instead; these are operator-facing
/// failures (bad arguments, unreadable inventory, timeouts).
#[derive(Debug, Serialize)]
pub enum AppError {
    InvalidInput(String),
    InventoryLoadFailed(String),
    InventoryParseFailed(String),
    IngestFailed(String),
    NotFound(String),
    Timeout(String),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            AppError::InventoryLoadFailed(msg) => write!(f, "Inventory load failed: {}", msg),
            AppError::InventoryParseFailed(msg) => write!(f, "Inventory parse failed: {}", msg),
            AppError::IngestFailed(msg) => write!(f, "Ingest failed: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::Timeout(msg) => write!(f, "Timeout: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl AppError {
    /// Get the error message
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Map to a process exit code
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::InvalidInput(_) => 1,
            AppError::InventoryLoadFailed(_) | AppError::InventoryParseFailed(_) => 2,
            AppError::NotFound(_) => 3,
            AppError::Timeout(_) => 4,
            AppError::IngestFailed(_) | AppError::Internal(_) => 5,
        }
    }
}

/// Convert anyhow::Error to AppError
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

/// Convert serde_json::Error to AppError
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InventoryParseFailed(err.to_string())
    }
}

/// Convert std::io::Error to AppError
impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InventoryLoadFailed(err.to_string())
    }
}

/// Convert ingestion errors to AppError
impl From<crate::inventory::AdapterError> for AppError {
    fn from(err: crate::inventory::AdapterError) -> Self {
        AppError::IngestFailed(err.to_string())
    }
}

/// Validation functions
pub fn validate_filter_value(name: &str, value: &str) -> Result<(), AppError> {
    if value.len() > 500 {
        return Err(AppError::InvalidInput(format!(
            "Filter '{name}' too long, maximum 500 characters"
        )));
    }
    if value.chars().any(|c| c.is_control()) {
        return Err(AppError::InvalidInput(format!(
            "Filter '{name}' contains control characters"
        )));
    }
    Ok(())
}
