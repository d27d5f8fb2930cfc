//! HTML fragments for search results and student cards.
//!
//! Every interpolated value is escaped; the markup classes match the site's
//! stylesheet.

use std::fmt::Write;
use std::sync::{Mutex, PoisonError};

use chrono::{NaiveDate, NaiveDateTime};

use crate::search::ResultsView;
use crate::types::{SearchResult, Student};

pub const NO_RESULTS_HTML: &str = r#"<p class="text-muted">No matching results</p>"#;
const NO_BIO: &str = "No bio yet";

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Result list markup, or exactly [`NO_RESULTS_HTML`] when `items` is empty.
pub fn search_results_html(items: &[SearchResult]) -> String {
    if items.is_empty() {
        return NO_RESULTS_HTML.to_string();
    }
    let mut html = String::new();
    for item in items {
        let _ = write!(
            html,
            r#"<div class="search-result-item"><h6><a href="{}">{}</a></h6><p class="text-muted small">{}</p></div>"#,
            escape_html(&item.url),
            escape_html(&item.title),
            escape_html(&item.description),
        );
    }
    html
}

/// "January 15, 2024" for an ISO timestamp or date; anything else verbatim.
pub fn format_join_date(raw: &str) -> String {
    let date = raw
        .parse::<NaiveDateTime>()
        .map(|dt| dt.date())
        .or_else(|_| raw.parse::<NaiveDate>());
    match date {
        Ok(date) => date.format("%B %-d, %Y").to_string(),
        Err(_) => raw.to_string(),
    }
}

pub fn student_card_html(student: &Student) -> String {
    let name = escape_html(&student.name);
    let avatar = match student.avatar_url.as_deref().filter(|u| !u.is_empty()) {
        Some(url) => format!(
            r#"<img src="{}" alt="{name}" class="rounded-circle" style="width: 80px; height: 80px; object-fit: cover;">"#,
            escape_html(url)
        ),
        None => r#"<div class="avatar-placeholder bg-primary text-white rounded-circle d-flex align-items-center justify-content-center" style="width: 80px; height: 80px;"><i class="fas fa-user fa-2x"></i></div>"#.to_string(),
    };
    let bio = student.bio.as_deref().filter(|b| !b.is_empty()).unwrap_or(NO_BIO);

    format!(
        concat!(
            r#"<div class="col-lg-4 col-md-6 mb-4"><div class="student-card card h-100 shadow-sm"><div class="card-body text-center">"#,
            r#"<div class="student-avatar mx-auto mb-3">{avatar}</div>"#,
            r#"<h5 class="card-title fw-bold">{name}</h5>"#,
            r#"<p class="text-muted mb-2">{university}</p>"#,
            r#"<p class="text-primary mb-2">{major}</p>"#,
            r#"<p class="card-text small text-muted">{bio}</p>"#,
            r#"<div class="mt-3"><small class="text-muted">Joined: {joined}</small></div>"#,
            r#"</div></div></div>"#,
        ),
        avatar = avatar,
        name = name,
        university = escape_html(&student.university),
        major = escape_html(&student.major),
        bio = escape_html(bio),
        joined = escape_html(&format_join_date(&student.join_date)),
    )
}

/// In-memory stand-in for the results container element.
#[derive(Debug, Default)]
pub struct HtmlResultsView {
    inner: Mutex<String>,
}

impl HtmlResultsView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn html(&self) -> String {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl ResultsView for HtmlResultsView {
    fn render(&self, items: &[SearchResult]) {
        *self.inner.lock().unwrap_or_else(PoisonError::into_inner) = search_results_html(items);
    }

    fn clear(&self) {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(title: &str) -> SearchResult {
        SearchResult {
            url: format!("/students/{title}"),
            title: title.to_string(),
            description: format!("about {title}"),
        }
    }

    fn student() -> Student {
        Student {
            id: 1,
            name: "Li Hua".to_string(),
            university: "Tsinghua".to_string(),
            major: "Physics".to_string(),
            join_date: "2024-01-15T10:30:00".to_string(),
            avatar_url: None,
            bio: None,
        }
    }

    #[test]
    fn zero_results_is_exactly_the_placeholder() {
        assert_eq!(search_results_html(&[]), NO_RESULTS_HTML);
    }

    #[test]
    fn results_render_in_order() {
        let html = search_results_html(&[result("alpha"), result("beta")]);
        assert_eq!(html.matches("search-result-item").count(), 2);
        let a = html.find("alpha").unwrap();
        let b = html.find("beta").unwrap();
        assert!(a < b);
        assert!(html.contains(r#"<a href="/students/alpha">alpha</a>"#));
    }

    #[test]
    fn values_are_escaped() {
        let html = search_results_html(&[SearchResult {
            url: "/x?a=1&b=\"2\"".to_string(),
            title: "<script>".to_string(),
            description: "it's".to_string(),
        }]);
        assert!(html.contains("/x?a=1&amp;b=&quot;2&quot;"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("it&#39;s"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn join_dates_format_long_form() {
        assert_eq!(format_join_date("2024-01-15T10:30:00"), "January 15, 2024");
        assert_eq!(format_join_date("2023-11-02T08:00:00.123456"), "November 2, 2023");
        assert_eq!(format_join_date("2022-07-04"), "July 4, 2022");
        assert_eq!(format_join_date("someday"), "someday");
    }

    #[test]
    fn card_without_avatar_or_bio_uses_placeholders() {
        let html = student_card_html(&student());
        assert!(html.contains("avatar-placeholder"));
        assert!(html.contains(NO_BIO));
        assert!(html.contains("Joined: January 15, 2024"));
        assert!(html.contains(r#"<h5 class="card-title fw-bold">Li Hua</h5>"#));
    }

    #[test]
    fn card_with_avatar_uses_image() {
        let mut s = student();
        s.avatar_url = Some("/static/uploads/li.png".to_string());
        s.bio = Some("Likes <b>optics</b>".to_string());
        let html = student_card_html(&s);
        assert!(html.contains(r#"<img src="/static/uploads/li.png" alt="Li Hua""#));
        assert!(!html.contains("avatar-placeholder"));
        assert!(html.contains("Likes &lt;b&gt;optics&lt;/b&gt;"));
    }

    #[test]
    fn view_tracks_render_and_clear() {
        let view = HtmlResultsView::new();
        view.render(&[]);
        assert_eq!(view.html(), NO_RESULTS_HTML);
        view.render(&[result("x")]);
        assert!(view.html().contains("search-result-item"));
        view.clear();
        assert_eq!(view.html(), "");
    }
}
