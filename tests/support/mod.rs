#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use chrono_tz::Tz;
use http_body_util::BodyExt;
use tempfile::TempDir;
use time::OffsetDateTime;
use tower::ServiceExt;

use inkpost::application::chrome::ChromeService;
use inkpost::application::clock::SiteClock;
use inkpost::application::csrf::CsrfGuard;
use inkpost::application::posts::BlogPostService;
use inkpost::application::repos::{BlogPostsRepo, BlogPostsWriteRepo};
use inkpost::domain::posts::format_publication_date;
use inkpost::infra::db::SqliteRepositories;
use inkpost::infra::http::{HttpState, build_router};
use inkpost::util::timezone::localized_date;

pub const SITE_TITLE: &str = "Inkpost";

pub struct TestApp {
    _dir: TempDir,
    pub router: Router,
    pub repos: Arc<SqliteRepositories>,
    pub csrf: Arc<CsrfGuard>,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
    }
}

pub async fn repositories() -> (TempDir, Arc<SqliteRepositories>) {
    let dir = tempfile::tempdir().expect("temp dir");
    let url = format!("sqlite://{}", dir.path().join("posts.db").display());

    let pool = SqliteRepositories::connect(&url, 2)
        .await
        .expect("connect to sqlite");
    SqliteRepositories::run_migrations(&pool)
        .await
        .expect("run migrations");

    (dir, Arc::new(SqliteRepositories::new(pool)))
}

pub async fn spawn_app() -> TestApp {
    let (dir, repos) = repositories().await;

    let reader: Arc<dyn BlogPostsRepo> = repos.clone();
    let writer: Arc<dyn BlogPostsWriteRepo> = repos.clone();
    let clock = SiteClock::new(Tz::UTC);
    let csrf = Arc::new(CsrfGuard::new("integration-secret"));

    let state = HttpState {
        posts: Arc::new(BlogPostService::new(reader, writer, clock)),
        chrome: Arc::new(ChromeService::new(SITE_TITLE, clock)),
        csrf: csrf.clone(),
        db: repos.clone(),
    };

    TestApp {
        _dir: dir,
        router: build_router(state),
        repos,
        csrf,
    }
}

impl TestApp {
    pub async fn get(&self, path: &str) -> TestResponse {
        let request = Request::builder()
            .method(Method::GET)
            .uri(path)
            .body(Body::empty())
            .expect("request");
        self.send(request).await
    }

    pub async fn post_form(&self, path: &str, fields: &[(&str, &str)]) -> TestResponse {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(fields)
            .finish();
        let request = Request::builder()
            .method(Method::POST)
            .uri(path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .expect("request");
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("read body")
            .to_bytes();

        TestResponse {
            status,
            headers,
            body: String::from_utf8(bytes.to_vec()).expect("utf-8 body"),
        }
    }

    /// A complete, valid submission carrying a fresh token.
    pub fn post_fields(&self, title: &str) -> Vec<(String, String)> {
        vec![
            ("title".to_string(), title.to_string()),
            ("subtitle".to_string(), "Notes from the shore".to_string()),
            ("author".to_string(), "Ada".to_string()),
            (
                "img_url".to_string(),
                "https://images.example.com/tides.jpg".to_string(),
            ),
            ("body".to_string(), "<p>Low and high.</p>".to_string()),
            ("csrf_token".to_string(), self.csrf.issue()),
        ]
    }
}

pub fn as_pairs(fields: &[(String, String)]) -> Vec<(&str, &str)> {
    fields
        .iter()
        .map(|(name, value)| (name.as_str(), value.as_str()))
        .collect()
}

pub fn set_field(fields: &mut [(String, String)], name: &str, value: &str) {
    if let Some(field) = fields.iter_mut().find(|(key, _)| key == name) {
        field.1 = value.to_string();
    }
}

/// Dates a post created right now may carry (today, or tomorrow across midnight).
pub fn plausible_creation_dates() -> [String; 2] {
    let today = localized_date(OffsetDateTime::now_utc(), Tz::UTC);
    let tomorrow = today.next_day().unwrap_or(today);
    [format_publication_date(today), format_publication_date(tomorrow)]
}

/// Value of the hidden `csrf_token` input in a rendered editor.
pub fn scrape_csrf_token(html: &str) -> Option<String> {
    let marker = "name=\"csrf_token\" value=\"";
    let start = html.find(marker)? + marker.len();
    let end = html[start..].find('"')? + start;
    Some(html[start..end].to_string())
}
