//! Join, contact and newsletter submissions.
//!
//! # Design
//! Each submission validates locally first; a validation failure becomes a
//! `Warning` notice and no request is sent. Everything that reaches the
//! backend ends as exactly one `Notice`, so the UI layer only has to show
//! it. `ApiError` never escapes this module.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ApiError, ValidationError};
use crate::site::SiteApi;
use crate::types::Envelope;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

const JOIN_SUCCESS: &str = "Application submitted! We will be in touch soon.";
const JOIN_FAILURE: &str = "Submission failed, please try again.";
const JOIN_NETWORK_FAILURE: &str = "Submission failed, please check your network connection and try again.";
const CONTACT_SUCCESS: &str = "Message sent! We will reply as soon as possible.";
const CONTACT_FAILURE: &str = "Sending failed, please try again.";
const SUBSCRIBE_SUCCESS: &str = "Subscribed! We will send you the latest news.";
const SUBSCRIBE_FAILURE: &str = "Subscription failed, please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Danger,
}

/// A transient message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.level == NoticeLevel::Success
    }
}

impl From<ValidationError> for Notice {
    fn from(e: ValidationError) -> Self {
        Notice::new(NoticeLevel::Warning, e.to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinApplication {
    pub name: String,
    pub email: String,
    pub university: String,
    pub major: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

impl JoinApplication {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("name", &self.name)?;
        require("email", &self.email)?;
        require("university", &self.university)?;
        require("major", &self.major)?;
        validate_email(&self.email)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl ContactMessage {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("name", &self.name)?;
        require("email", &self.email)?;
        require("subject", &self.subject)?;
        require("message", &self.message)
    }
}

fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(())
}

/// Matches the value exactly as it will be sent; surrounding whitespace fails.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if EMAIL_RE.is_match(email) {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail)
    }
}

/// Turns form submissions into notices.
#[derive(Debug, Clone)]
pub struct FormHandler {
    site: SiteApi,
}

impl FormHandler {
    pub fn new(site: SiteApi) -> Self {
        Self { site }
    }

    pub async fn submit_join(&self, application: &JoinApplication) -> Notice {
        if let Err(e) = application.validate() {
            return e.into();
        }
        let result = self.site.join(application).await;
        // A successful join always shows the local wording.
        settle(result, JOIN_FAILURE, JOIN_NETWORK_FAILURE).map_or_else(
            |notice| notice,
            |_| Notice::new(NoticeLevel::Success, JOIN_SUCCESS),
        )
    }

    pub async fn submit_contact(&self, message: &ContactMessage) -> Notice {
        if let Err(e) = message.validate() {
            return e.into();
        }
        let result = self.site.contact(message).await;
        settle(result, CONTACT_FAILURE, CONTACT_FAILURE)
            .map_or_else(|notice| notice, |m| success(m, CONTACT_SUCCESS))
    }

    pub async fn subscribe(&self, email: &str) -> Notice {
        if let Err(e) = require("email", email) {
            return e.into();
        }
        let result = self.site.subscribe(email.trim()).await;
        settle(result, SUBSCRIBE_FAILURE, SUBSCRIBE_FAILURE)
            .map_or_else(|notice| notice, |m| success(m, SUBSCRIBE_SUCCESS))
    }
}

/// `Ok(server message)` for a successful envelope, otherwise the `Danger`
/// notice to show.
fn settle(
    result: Result<Envelope, ApiError>,
    rejected: &str,
    unreachable: &str,
) -> Result<Option<String>, Notice> {
    match result {
        Ok(envelope) if envelope.success => Ok(envelope.message),
        Ok(envelope) => Err(Notice::new(
            NoticeLevel::Danger,
            envelope.message.unwrap_or_else(|| rejected.to_string()),
        )),
        Err(e) => {
            warn!(error = %e, "form submission failed");
            Err(Notice::new(NoticeLevel::Danger, unreachable))
        }
    }
}

fn success(message: Option<String>, fallback: &str) -> Notice {
    Notice::new(NoticeLevel::Success, message.unwrap_or_else(|| fallback.to_string()))
}
