//! Error types for the directory client.
//!
//! # Design
//! Only `ApiError` crosses the HTTP client boundary, and it has a single
//! variant: network failures, non-2xx responses and JSON failures all land
//! in `RequestFailed` with a human-readable message. Callers that need the
//! status code must look at the `HttpResponse` themselves.
//!
//! `ValidationError` is raised by the form layer before any request is
//! built, and `ConfigError` by environment loading.

use thiserror::Error;

/// Message used when a failure response carries no `message` field.
pub const GENERIC_FAILURE: &str = "request failed";

/// Errors returned by `ApiClient` and every `Transport`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("{0}")]
    RequestFailed(String),
}

impl ApiError {
    pub fn message(&self) -> &str {
        match self {
            ApiError::RequestFailed(msg) => msg,
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::RequestFailed(format!("invalid JSON: {e}"))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::RequestFailed(e.to_string())
    }
}

/// Client-side form validation failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("please fill in the {0} field")]
    MissingField(&'static str),

    #[error("please enter a valid email address")]
    InvalidEmail,
}

/// An environment variable was set but could not be parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid value for {key}: {reason}")]
pub struct ConfigError {
    pub key: &'static str,
    pub reason: String,
}
