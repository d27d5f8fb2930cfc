//! Wire DTOs for the directory backend.
//!
//! # Design
//! These mirror the mock-server's JSON but are defined independently;
//! the integration tests catch schema drift between the two crates.
//! Unknown fields are ignored everywhere so the backend can grow.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The `{success, message, data}` shape returned by most endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// One hit from `GET /api/search`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub url: String,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: u64,
    pub name: String,
    pub university: String,
    pub major: String,
    /// ISO-8601 timestamp as sent by the backend.
    pub join_date: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub pages: u32,
    pub per_page: u32,
    pub total: u64,
}

impl Pagination {
    pub fn has_more(&self) -> bool {
        self.page < self.pages
    }

    pub fn next_page(&self) -> Option<u32> {
        self.has_more().then_some(self.page + 1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentPage {
    pub success: bool,
    pub students: Vec<Student>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSummary {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub location: String,
    pub event_date: String,
    pub category: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventPage {
    pub success: bool,
    pub events: Vec<EventSummary>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsSummary {
    pub id: u64,
    pub title: String,
    /// Excerpt; the backend truncates long articles.
    pub content: String,
    pub author: String,
    pub publish_date: String,
    pub category: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsPage {
    pub success: bool,
    pub news: Vec<NewsSummary>,
    pub pagination: Pagination,
}

/// Site-wide counters from `GET /api/stats`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteStats {
    #[serde(default)]
    pub total_students: u64,
    #[serde(default)]
    pub total_events: u64,
    #[serde(default)]
    pub total_news: u64,
    #[serde(default, alias = "total_universities")]
    pub universities: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsResponse {
    pub success: bool,
    #[serde(default)]
    pub stats: SiteStats,
}

/// Filter for the paginated event and news listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u32,
    pub per_page: u32,
    pub category: Option<String>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 10,
            category: None,
        }
    }
}
