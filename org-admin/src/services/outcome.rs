//! Uniform result shape for every admin-API operation.

use serde::Serialize;
use thiserror::Error;

/// Why an operation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    /// The request never completed.
    Transport,
    /// The server answered with a non-2xx status.
    Rejected { status: u16 },
    /// Expected conflict: the identity provider is already linked.
    AlreadyLinked,
    /// No bearer token could be obtained.
    Token,
    /// Rejected client-side before any request was sent.
    Invalid,
    /// A 2xx response whose body could not be read.
    Decode,
}

/// Failed operation: structured reason plus a message fit for the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct Failure {
    pub reason: FailureReason,
    pub message: String,
}

impl Failure {
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            reason: FailureReason::Transport,
            message: message.into(),
        }
    }

    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self {
            reason: FailureReason::Rejected { status },
            message: message.into(),
        }
    }

    pub fn already_linked() -> Self {
        Self {
            reason: FailureReason::AlreadyLinked,
            message: "Identity Provider already linked to this org.".to_string(),
        }
    }

    pub fn token(message: impl Into<String>) -> Self {
        Self {
            reason: FailureReason::Token,
            message: message.into(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            reason: FailureReason::Invalid,
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self {
            reason: FailureReason::Decode,
            message: message.into(),
        }
    }

    /// HTTP status when the server rejected the call.
    pub fn status(&self) -> Option<u16> {
        match self.reason {
            FailureReason::Rejected { status } => Some(status),
            FailureReason::AlreadyLinked => Some(409),
            _ => None,
        }
    }
}

impl From<validator::ValidationErrors> for Failure {
    fn from(err: validator::ValidationErrors) -> Self {
        let messages: Vec<String> = err
            .field_errors()
            .values()
            .flat_map(|errors| errors.iter())
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string())
            })
            .collect();

        if messages.is_empty() {
            Failure::invalid(err.to_string())
        } else {
            Failure::invalid(messages.join("; "))
        }
    }
}

/// Successful write, with the message the UI shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Acknowledged {
    pub message: String,
}

impl Acknowledged {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub type ApiResult<T> = Result<T, Failure>;

/// Legacy `{success, message}` / `{error, message}` JSON shape for views
/// that still consume it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Outcome {
    Success { success: bool, message: String },
    Error { error: bool, message: String },
}

impl From<&ApiResult<Acknowledged>> for Outcome {
    fn from(result: &ApiResult<Acknowledged>) -> Self {
        match result {
            Ok(ack) => Outcome::Success {
                success: true,
                message: ack.message.clone(),
            },
            Err(failure) => Outcome::Error {
                error: true,
                message: failure.message.clone(),
            },
        }
    }
}

/// Message carried by an error body: the JSON `error` field when the body
/// parses, otherwise the raw text.
pub fn error_message(body: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(serde_json::Value::Object(map)) => match map.get("error") {
            Some(serde_json::Value::String(message)) => message.clone(),
            Some(other) if !other.is_null() => other.to_string(),
            _ => body.trim().to_string(),
        },
        _ => body.trim().to_string(),
    }
}
