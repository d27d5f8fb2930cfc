//! Typed operations for each backend endpoint.

use serde::Serialize;
use urlencoding::encode;

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::types::{Envelope, EventPage, ListQuery, NewsPage, SearchResult, SiteStats, StatsResponse, StudentPage};

/// Students per page when the caller does not ask for another size.
pub const DEFAULT_STUDENTS_PER_PAGE: u32 = 12;

#[derive(Debug, Clone)]
pub struct SiteApi {
    client: ApiClient,
}

impl SiteApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>, ApiError> {
        self.client.get(&format!("/api/search?q={}", encode(query))).await
    }

    pub async fn load_students(&self, page: u32, per_page: u32) -> Result<StudentPage, ApiError> {
        self.client
            .get(&format!("/api/students?page={page}&per_page={per_page}"))
            .await
    }

    pub async fn load_events(&self, query: &ListQuery) -> Result<EventPage, ApiError> {
        self.client.get(&list_target("/api/events", query)).await
    }

    pub async fn load_news(&self, query: &ListQuery) -> Result<NewsPage, ApiError> {
        self.client.get(&list_target("/api/news", query)).await
    }

    pub async fn load_stats(&self) -> Result<SiteStats, ApiError> {
        let response: StatsResponse = self.client.get("/api/stats").await?;
        Ok(response.stats)
    }

    pub async fn subscribe(&self, email: &str) -> Result<Envelope, ApiError> {
        #[derive(Serialize)]
        struct Subscribe<'a> {
            email: &'a str,
        }
        self.client.post("/api/subscribe", &Subscribe { email }).await
    }

    pub async fn contact<P: Serialize + ?Sized>(&self, message: &P) -> Result<Envelope, ApiError> {
        self.client.post("/api/contact", message).await
    }

    pub async fn join<P: Serialize + ?Sized>(&self, application: &P) -> Result<Envelope, ApiError> {
        self.client.post("/api/join", application).await
    }
}

fn list_target(path: &str, query: &ListQuery) -> String {
    let mut target = format!("{path}?page={}&per_page={}", query.page, query.per_page);
    if let Some(category) = query.category.as_deref().filter(|c| !c.is_empty()) {
        target.push_str("&category=");
        target.push_str(&encode(category));
    }
    target
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpMethod;
    use crate::testing::StubTransport;
    use std::sync::Arc;

    fn site(transport: &Arc<StubTransport>) -> SiteApi {
        SiteApi::new(ApiClient::new("http://api", transport.clone()))
    }

    #[tokio::test]
    async fn search_encodes_query() {
        let transport = Arc::new(StubTransport::status(
            200,
            r#"[{"url": "/students/1", "title": "Li Hua", "description": "PKU"}]"#,
        ));
        let results = site(&transport).search("li hua&co").await.unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Li Hua");
        assert_eq!(transport.paths(), vec!["http://api/api/search?q=li%20hua%26co"]);
    }

    #[tokio::test]
    async fn stats_unwraps_counters() {
        let transport = Arc::new(StubTransport::status(
            200,
            r#"{"success": true, "stats": {"total_students": 3, "total_events": 1, "total_news": 2, "universities": 2}}"#,
        ));
        let stats = site(&transport).load_stats().await.unwrap();
        assert_eq!(stats.total_students, 3);
        assert_eq!(stats.universities, 2);
    }

    #[tokio::test]
    async fn students_request_carries_paging() {
        let transport = Arc::new(StubTransport::status(
            200,
            r#"{"success": true, "students": [], "pagination": {"page": 2, "pages": 2, "per_page": 12, "total": 13}}"#,
        ));
        let page = site(&transport).load_students(2, DEFAULT_STUDENTS_PER_PAGE).await.unwrap();
        assert!(!page.pagination.has_more());
        assert_eq!(transport.paths(), vec!["http://api/api/students?page=2&per_page=12"]);
    }

    #[tokio::test]
    async fn list_queries_include_category_only_when_set() {
        let transport = Arc::new(StubTransport::status(
            200,
            r#"{"success": true, "events": [], "news": [], "pagination": {"page": 1, "pages": 0, "per_page": 10, "total": 0}}"#,
        ));
        let api = site(&transport);
        api.load_events(&ListQuery::default()).await.unwrap();
        api.load_news(&ListQuery {
            category: Some("project news".to_string()),
            ..ListQuery::default()
        })
        .await
        .unwrap();

        assert_eq!(
            transport.paths(),
            vec![
                "http://api/api/events?page=1&per_page=10",
                "http://api/api/news?page=1&per_page=10&category=project%20news",
            ]
        );
    }

    #[tokio::test]
    async fn subscribe_posts_email() {
        let transport = Arc::new(StubTransport::status(200, r#"{"success": true, "message": "subscribed"}"#));
        let envelope = site(&transport).subscribe("a@b.co").await.unwrap();
        assert!(envelope.success);

        let requests = transport.requests();
        assert_eq!(requests[0].method, HttpMethod::Post);
        assert_eq!(requests[0].body.as_deref(), Some(r#"{"email":"a@b.co"}"#));
    }
}
