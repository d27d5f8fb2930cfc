//! Client core for the member-directory site.
//!
//! # Overview
//! One JSON request path to the backend (`ApiClient` over a `Transport`),
//! typed endpoint wrappers (`SiteApi`), form submission (`FormHandler`),
//! HTML fragments (`render`), and a debounced search-as-you-type dispatcher
//! built on the `Debouncer`/`Throttle` timing primitives.
//!
//! # Design
//! - Requests and responses are plain data (`HttpRequest`/`HttpResponse`);
//!   the only I/O happens in a `Transport`, so everything else is tested
//!   against a recording stub.
//! - `ApiError::RequestFailed` is the only error that crosses the client.
//! - Collaborators are constructed and passed in explicitly; nothing is
//!   registered globally.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod debounce;
pub mod error;
pub mod forms;
pub mod http;
pub mod render;
pub mod search;
pub mod site;
pub mod throttle;
pub mod transport;
pub mod types;

#[cfg(test)]
mod testing;

pub use client::ApiClient;
pub use config::{ClientConfig, RequestConfig};
pub use debounce::Debouncer;
pub use error::{ApiError, ConfigError, ValidationError};
pub use forms::{ContactMessage, FormHandler, JoinApplication, Notice, NoticeLevel};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use render::HtmlResultsView;
pub use search::{ResultsView, SearchDispatcher, SearchOptions, SearchState};
pub use site::SiteApi;
pub use throttle::Throttle;
pub use transport::{ReqwestTransport, Transport};
pub use types::{Envelope, ListQuery, Pagination, SearchResult, SiteStats, Student, StudentPage};
