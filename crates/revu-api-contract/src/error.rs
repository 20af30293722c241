// Copyright 2025 Revu Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for API contract validation and parsing

use thiserror::Error;

/// Errors that can occur during API contract validation and parsing
#[derive(Debug, Error)]
pub enum ApiContractError {
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),

    #[error("Invalid repository URL: {0}")]
    InvalidRepositoryUrl(String),
}

/// The backend's normalized error body.
///
/// Every failing endpoint resolves to this shape: `{"status": "error",
/// "message": ...}`. FastAPI-style `{"detail": ...}` bodies are folded
/// into `message` during deserialization by the client.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ErrorEnvelope {
    #[serde(default = "error_status")]
    pub status: String,
    #[serde(alias = "detail")]
    pub message: String,
}

fn error_status() -> String {
    "error".to_string()
}

impl ErrorEnvelope {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: error_status(),
            message: message.into(),
        }
    }
}
