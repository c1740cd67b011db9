/// Error handling for the room service
///
/// This module provides:
/// - The service error type wrapping engine errors
/// - Error response formatting for transports
/// - Severity-based error logging
use serde::{Deserialize, Serialize};
use std::fmt;
use svein_engine::errors::GameError;
use thiserror::Error;

use crate::settings::SettingsError;

/// Errors returned by [`crate::rooms::RoomService`].
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Game(#[from] GameError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error("Room storage poisoned")]
    StoragePoisoned,
}

/// Standard error response format handed to whatever transport sits in front
/// of the service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    /// Machine-readable error code (e.g., "room_not_found")
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details (structured data)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(
        error: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            details: Some(details),
        }
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

/// Error classification for logging levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorSeverity {
    /// Bad request from a player; the room is unchanged
    Client,
    /// Infrastructure failure inside the service
    Server,
    /// A room invariant is broken
    Critical,
}

/// Trait for converting errors to responses with proper logging
pub trait IntoErrorResponse {
    /// Get the error code string (machine-readable)
    fn error_code(&self) -> &'static str;

    /// Get the error message (human-readable)
    fn error_message(&self) -> String;

    /// Get optional error details
    fn error_details(&self) -> Option<serde_json::Value> {
        None
    }

    fn severity(&self) -> ErrorSeverity;

    fn to_error_response(&self) -> ErrorResponse {
        if let Some(details) = self.error_details() {
            ErrorResponse::with_details(self.error_code(), self.error_message(), details)
        } else {
            ErrorResponse::new(self.error_code(), self.error_message())
        }
    }

    /// Convert to a response, logging at a level chosen by severity
    fn into_error_response(self) -> ErrorResponse
    where
        Self: Sized,
    {
        let severity = self.severity();
        let response = self.to_error_response();
        match severity {
            ErrorSeverity::Client => {
                tracing::info!(error = %response.error, message = %response.message, "client error")
            }
            ErrorSeverity::Server => {
                tracing::error!(error = %response.error, message = %response.message, "server error")
            }
            ErrorSeverity::Critical => {
                tracing::error!(
                    error = %response.error,
                    message = %response.message,
                    critical = true,
                    "critical error"
                )
            }
        }
        response
    }
}

impl IntoErrorResponse for GameError {
    fn error_code(&self) -> &'static str {
        self.code()
    }

    fn error_message(&self) -> String {
        self.to_string()
    }

    fn error_details(&self) -> Option<serde_json::Value> {
        match self {
            GameError::MustPlayHigher { last } => Some(serde_json::json!({ "last_rank": last })),
            GameError::NotEnoughPlayers { found } => Some(serde_json::json!({ "found": found })),
            GameError::InvalidCardCount(count) => Some(serde_json::json!({ "count": count })),
            _ => None,
        }
    }

    fn severity(&self) -> ErrorSeverity {
        if self.is_fatal() {
            ErrorSeverity::Critical
        } else {
            ErrorSeverity::Client
        }
    }
}

impl IntoErrorResponse for SettingsError {
    fn error_code(&self) -> &'static str {
        match self {
            SettingsError::InvalidValue(_) => "invalid_settings",
            SettingsError::StoragePoisoned => "storage_poisoned",
        }
    }

    fn error_message(&self) -> String {
        self.to_string()
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            SettingsError::InvalidValue(_) => ErrorSeverity::Client,
            SettingsError::StoragePoisoned => ErrorSeverity::Server,
        }
    }
}

impl IntoErrorResponse for ServiceError {
    fn error_code(&self) -> &'static str {
        match self {
            ServiceError::Game(err) => err.error_code(),
            ServiceError::Settings(err) => err.error_code(),
            ServiceError::StoragePoisoned => "storage_poisoned",
        }
    }

    fn error_message(&self) -> String {
        self.to_string()
    }

    fn error_details(&self) -> Option<serde_json::Value> {
        match self {
            ServiceError::Game(err) => err.error_details(),
            _ => None,
        }
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            ServiceError::Game(err) => err.severity(),
            ServiceError::Settings(err) => err.severity(),
            ServiceError::StoragePoisoned => ErrorSeverity::Server,
        }
    }
}
