mod forms;
mod middleware;
mod public;
mod validators;

pub use forms::{DUPLICATE_TITLE_MESSAGE, FormErrors, PostForm};
pub use public::{HttpState, build_router};

use crate::application::error::ErrorReport;
use crate::application::error::HttpError;
use crate::application::posts::BlogPostError;
use crate::application::repos::RepoError;
use crate::presentation::views::{LayoutChrome, render_not_found_response};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use sqlx::Error as SqlxError;

fn db_health_response(result: Result<(), SqlxError>) -> Response {
    match result {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => {
            let mut response = StatusCode::SERVICE_UNAVAILABLE.into_response();
            ErrorReport::from_error(
                "infra::http::db_health",
                StatusCode::SERVICE_UNAVAILABLE,
                &err,
            )
            .attach(&mut response);
            response
        }
    }
}

/// Map a repository error to the HTTP error returned by public handlers.
pub fn repo_error_to_http(source: &'static str, err: RepoError) -> HttpError {
    match err {
        RepoError::Duplicate { constraint } => {
            HttpError::new(source, StatusCode::CONFLICT, "Duplicate record", constraint)
        }
        RepoError::NotFound => HttpError::new(
            source,
            StatusCode::NOT_FOUND,
            "Resource not found",
            "resource not found",
        ),
        RepoError::Integrity { message } => HttpError::new(
            source,
            StatusCode::CONFLICT,
            "Integrity constraint violated",
            message,
        ),
        RepoError::Timeout => HttpError::new(
            source,
            StatusCode::SERVICE_UNAVAILABLE,
            "Database timeout",
            "Database timeout",
        ),
        RepoError::Persistence(message) => HttpError::new(
            source,
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error",
            message,
        ),
    }
}

/// Not-found becomes the themed 404 page. Form handlers answer duplicate
/// titles with the editor first; any that arrive here share the repo mapping.
fn post_error_to_response(
    source: &'static str,
    err: BlogPostError,
    chrome: LayoutChrome,
) -> Response {
    let err = match err {
        BlogPostError::NotFound { id } => {
            let mut response = render_not_found_response(chrome);
            ErrorReport::from_message(source, StatusCode::NOT_FOUND, format!("post {id} not found"))
                .attach(&mut response);
            return response;
        }
        BlogPostError::DuplicateTitle { title } => RepoError::Duplicate {
            constraint: format!("blog_post.title `{title}`"),
        },
        BlogPostError::Repo(err) => err,
    };
    repo_error_to_http(source, err).into_response()
}
