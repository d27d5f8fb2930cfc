use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;
use tracing::info;

const NEWS_EXCERPT_CHARS: usize = 200;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Student {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub university: String,
    pub major: String,
    pub join_date: String,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub phone: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Event {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub location: String,
    pub event_date: String,
    pub category: String,
    pub image_url: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct News {
    pub id: u64,
    pub title: String,
    pub content: String,
    pub author: String,
    pub publish_date: String,
    pub category: String,
    pub image_url: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchHit {
    pub url: String,
    pub title: String,
    pub description: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ContactMessage {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Deserialize)]
pub struct JoinRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub university: String,
    #[serde(default)]
    pub major: String,
    #[serde(default)]
    pub password: String,
    pub phone: Option<String>,
    pub bio: Option<String>,
}

#[derive(Deserialize)]
pub struct SubscribeRequest {
    pub email: Option<String>,
}

#[derive(Deserialize)]
pub struct PageParams {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub category: Option<String>,
}

#[derive(Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

/// Everything the backend knows, newest first where order matters.
#[derive(Debug, Default)]
pub struct Store {
    pub students: Vec<Student>,
    pub events: Vec<Event>,
    pub news: Vec<News>,
    pub contacts: Vec<ContactMessage>,
    pub subscribers: Vec<String>,
}

impl Store {
    /// A small directory to browse and search.
    pub fn seeded() -> Self {
        let student = |id, name: &str, university: &str, major: &str, join_date: &str| Student {
            id,
            name: name.to_string(),
            email: format!("student{id}@example.edu"),
            university: university.to_string(),
            major: major.to_string(),
            join_date: join_date.to_string(),
            avatar_url: None,
            bio: None,
            phone: None,
        };
        Self {
            students: vec![
                student(1, "Li Hua", "Tsinghua University", "Physics", "2024-01-15T10:30:00"),
                student(2, "Wang Fang", "Peking University", "Economics", "2024-02-03T09:00:00"),
                student(3, "Zhang Wei", "Tsinghua University", "Computer Science", "2024-03-21T14:45:00"),
            ],
            events: vec![Event {
                id: 1,
                title: "Welcome meetup".to_string(),
                description: "Meet the new members.".to_string(),
                location: "Main hall".to_string(),
                event_date: "2024-09-01T18:00:00".to_string(),
                category: "meeting".to_string(),
                image_url: None,
            }],
            news: vec![News {
                id: 1,
                title: "Directory launched".to_string(),
                content: "The member directory is now online.".to_string(),
                author: "admin".to_string(),
                publish_date: "2024-08-20T08:00:00".to_string(),
                category: "project".to_string(),
                image_url: None,
            }],
            contacts: Vec::new(),
            subscribers: Vec::new(),
        }
    }
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    app_with(Store::seeded())
}

pub fn app_with(store: Store) -> Router {
    let db: Db = Arc::new(RwLock::new(store));
    Router::new()
        .route("/api/search", get(search))
        .route("/api/students", get(list_students))
        .route("/api/events", get(list_events))
        .route("/api/news", get(list_news))
        .route("/api/stats", get(stats))
        .route("/api/subscribe", post(subscribe))
        .route("/api/contact", post(contact))
        .route("/api/join", post(join))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "mock directory backend ready");
    }
    axum::serve(listener, app()).await
}

fn envelope(success: bool, message: &str) -> Json<Value> {
    Json(json!({ "success": success, "message": message }))
}

/// Flask-style pagination: out-of-range pages are empty, not errors.
fn paginate<T: Clone>(items: &[T], params: &PageParams, default_per_page: u32) -> (Vec<T>, Value) {
    let page = params.page.unwrap_or(1).max(1);
    let per_page = params.per_page.unwrap_or(default_per_page).max(1);
    let total = items.len() as u64;
    let pages = total.div_ceil(per_page as u64);
    let offset = (page as u64 - 1).saturating_mul(per_page as u64);
    let slice = items
        .iter()
        .skip(usize::try_from(offset).unwrap_or(usize::MAX))
        .take(per_page as usize)
        .cloned()
        .collect();
    let pagination = json!({ "page": page, "pages": pages, "per_page": per_page, "total": total });
    (slice, pagination)
}

fn matches_category(category: &str, params: &PageParams) -> bool {
    params
        .category
        .as_deref()
        .filter(|c| !c.is_empty())
        .map_or(true, |c| c == category)
}

async fn search(State(db): State<Db>, Query(params): Query<SearchParams>) -> Json<Vec<SearchHit>> {
    let needle = params.q.trim().to_lowercase();
    let store = db.read().await;
    if needle.is_empty() {
        return Json(Vec::new());
    }
    let hits = store
        .students
        .iter()
        .filter(|s| {
            [&s.name, &s.university, &s.major]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        })
        .map(|s| SearchHit {
            url: format!("/students/{}", s.id),
            title: s.name.clone(),
            description: format!("{} · {}", s.university, s.major),
        })
        .collect();
    Json(hits)
}

async fn list_students(State(db): State<Db>, Query(params): Query<PageParams>) -> Json<Value> {
    let store = db.read().await;
    let mut students = store.students.clone();
    students.sort_by(|a, b| b.join_date.cmp(&a.join_date));
    let (items, pagination) = paginate(&students, &params, 12);
    let students: Vec<Value> = items
        .into_iter()
        .map(|s| {
            json!({
                "id": s.id,
                "name": s.name,
                "university": s.university,
                "major": s.major,
                "join_date": s.join_date,
                "avatar_url": s.avatar_url,
                "bio": s.bio,
            })
        })
        .collect();
    Json(json!({ "success": true, "students": students, "pagination": pagination }))
}

async fn list_events(State(db): State<Db>, Query(params): Query<PageParams>) -> Json<Value> {
    let store = db.read().await;
    let mut events: Vec<Event> = store
        .events
        .iter()
        .filter(|e| matches_category(&e.category, &params))
        .cloned()
        .collect();
    events.sort_by(|a, b| b.event_date.cmp(&a.event_date));
    let (items, pagination) = paginate(&events, &params, 10);
    Json(json!({ "success": true, "events": items, "pagination": pagination }))
}

async fn list_news(State(db): State<Db>, Query(params): Query<PageParams>) -> Json<Value> {
    let store = db.read().await;
    let mut news: Vec<News> = store
        .news
        .iter()
        .filter(|n| matches_category(&n.category, &params))
        .cloned()
        .collect();
    news.sort_by(|a, b| b.publish_date.cmp(&a.publish_date));
    let (mut items, pagination) = paginate(&news, &params, 10);
    for item in &mut items {
        if item.content.chars().count() > NEWS_EXCERPT_CHARS {
            item.content = item.content.chars().take(NEWS_EXCERPT_CHARS).collect::<String>() + "...";
        }
    }
    Json(json!({ "success": true, "news": items, "pagination": pagination }))
}

async fn stats(State(db): State<Db>) -> Json<Value> {
    let store = db.read().await;
    let mut universities: Vec<&str> = store.students.iter().map(|s| s.university.as_str()).collect();
    universities.sort_unstable();
    universities.dedup();
    Json(json!({
        "success": true,
        "stats": {
            "total_students": store.students.len(),
            "total_events": store.events.len(),
            "total_news": store.news.len(),
            "universities": universities.len(),
        }
    }))
}

async fn subscribe(State(db): State<Db>, Json(input): Json<SubscribeRequest>) -> Json<Value> {
    let Some(email) = input.email.filter(|e| !e.trim().is_empty()) else {
        return envelope(false, "please provide a valid email address");
    };
    db.write().await.subscribers.push(email);
    envelope(true, "Subscribed! We will send you the latest news.")
}

async fn contact(State(db): State<Db>, Json(input): Json<ContactMessage>) -> Json<Value> {
    let fields = [
        ("name", &input.name),
        ("email", &input.email),
        ("subject", &input.subject),
        ("message", &input.message),
    ];
    if let Some((field, _)) = fields.iter().find(|(_, v)| v.is_empty()) {
        return envelope(false, &format!("please fill in the {field} field"));
    }
    db.write().await.contacts.push(input);
    envelope(true, "Message sent! We will reply as soon as possible.")
}

async fn join(State(db): State<Db>, Json(input): Json<JoinRequest>) -> Json<Value> {
    let mut store = db.write().await;
    if store.students.iter().any(|s| s.email == input.email) {
        return envelope(false, "this email is already registered");
    }
    if input.password.is_empty() {
        return envelope(false, "password must not be empty");
    }
    let id = store.students.iter().map(|s| s.id).max().unwrap_or(0) + 1;
    store.students.push(Student {
        id,
        name: input.name,
        email: input.email,
        university: input.university,
        major: input.major,
        join_date: chrono::Utc::now().naive_utc().format("%Y-%m-%dT%H:%M:%S").to_string(),
        avatar_url: None,
        bio: input.bio.filter(|b| !b.is_empty()),
        phone: input.phone,
    });
    envelope(true, "Application submitted!")
}

async fn not_found() -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, envelope(false, "not found"))
}
