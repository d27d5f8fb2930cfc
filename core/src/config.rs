//! Per-request options and environment-driven client configuration.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use serde::Serialize;
use tracing::info;

use crate::error::{ApiError, ConfigError};
use crate::http::HttpMethod;

/// Headers every request starts with; caller headers are merged over them.
pub const DEFAULT_HEADERS: &[(&str, &str)] = &[("Content-Type", "application/json")];

/// Options for a single `ApiClient::request` call.
///
/// `method` defaults to GET. `headers` are merged over [`DEFAULT_HEADERS`]:
/// a caller header with the same name (compared case-insensitively)
/// replaces the default. `body` is sent verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestConfig {
    pub method: HttpMethod,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl RequestConfig {
    pub fn method(method: HttpMethod) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    /// Build a config whose body is `payload` serialized as JSON.
    pub fn json<T: Serialize + ?Sized>(method: HttpMethod, payload: &T) -> Result<Self, ApiError> {
        Ok(Self {
            method,
            headers: Vec::new(),
            body: Some(serde_json::to_string(payload)?),
        })
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Default headers with the caller's overrides applied, defaults first.
    pub fn merged_headers(&self) -> Vec<(String, String)> {
        let mut merged: Vec<(String, String)> = DEFAULT_HEADERS
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        for (name, value) in &self.headers {
            match merged.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(name)) {
                Some(slot) => *slot = (name.clone(), value.clone()),
                None => merged.push((name.clone(), value.clone())),
            }
        }
        merged
    }
}

/// Client settings read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub request_timeout: Duration,
    pub search_debounce: Duration,
    pub search_min_chars: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            request_timeout: Duration::from_secs(10),
            search_debounce: Duration::from_millis(300),
            search_min_chars: 2,
        }
    }
}

impl ClientConfig {
    /// Load from `DIRECTORY_*` variables, falling back to defaults for
    /// anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`] with an injectable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let base_url = lookup("DIRECTORY_API_BASE").unwrap_or_else(|| {
            info!("DIRECTORY_API_BASE not set, using default: {}", defaults.base_url);
            defaults.base_url.clone()
        });
        let timeout_secs: u64 = try_load(&lookup, "DIRECTORY_REQUEST_TIMEOUT_SECS", defaults.request_timeout.as_secs())?;
        let debounce_ms: u64 = try_load(
            &lookup,
            "DIRECTORY_SEARCH_DEBOUNCE_MS",
            defaults.search_debounce.as_millis() as u64,
        )?;
        let min_chars: usize = try_load(&lookup, "DIRECTORY_SEARCH_MIN_CHARS", defaults.search_min_chars)?;

        Ok(Self {
            base_url,
            request_timeout: Duration::from_secs(timeout_secs),
            search_debounce: Duration::from_millis(debounce_ms),
            search_min_chars: min_chars,
        })
    }
}

fn try_load<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + std::fmt::Display,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError {
            key,
            reason: e.to_string(),
        }),
        None => {
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}
