use std::sync::Arc;

use axum::{
    Form, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Redirect, Response},
    routing::get,
};

use crate::{
    application::{
        chrome::ChromeService,
        csrf::CsrfGuard,
        posts::{BlogPostError, BlogPostService},
    },
    infra::db::SqliteRepositories,
    presentation::views::{
        AboutTemplate, ContactTemplate, IndexTemplate, LayoutContext, PostDetailView,
        PostEditorTemplate, PostListView, PostTemplate, StaticPageView,
        post_href, render_not_found_response, render_template_response,
    },
};

use super::{
    db_health_response,
    forms::{FormErrors, PostForm},
    middleware::{log_responses, set_request_context},
    post_error_to_response,
};

const NEW_POST_HEADING: &str = "New Post";
const EDIT_POST_HEADING: &str = "Edit Post";

#[derive(Clone)]
pub struct HttpState {
    pub posts: Arc<BlogPostService>,
    pub chrome: Arc<ChromeService>,
    pub csrf: Arc<CsrfGuard>,
    pub db: Arc<SqliteRepositories>,
}

pub fn build_router(state: HttpState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/post/{id}", get(post_detail))
        .route("/new-post", get(new_post_form).post(create_post))
        .route("/edit-post/{id}", get(edit_post_form).post(update_post))
        .route("/delete-post/{id}", get(delete_post).post(delete_post))
        .route("/about", get(about))
        .route("/contact", get(contact))
        .route("/_health/db", get(public_health))
        .fallback(fallback)
        .with_state(state)
        .layer(middleware::from_fn(log_responses))
        .layer(middleware::from_fn(set_request_context))
}

/// Positive integer ids only; anything else is treated as an unknown post.
fn parse_post_id(raw: &str) -> Option<i64> {
    raw.parse::<i64>().ok().filter(|id| *id > 0)
}

async fn index(State(state): State<HttpState>) -> Response {
    let chrome = state.chrome.load();

    match state.posts.list_posts().await {
        Ok(posts) => {
            let view = LayoutContext::new(chrome, PostListView::new(&posts));
            render_template_response(IndexTemplate { view }, StatusCode::OK)
        }
        Err(err) => post_error_to_response("infra::http::public::index", err, chrome),
    }
}

async fn post_detail(State(state): State<HttpState>, Path(raw_id): Path<String>) -> Response {
    let chrome = state.chrome.load();
    let Some(id) = parse_post_id(&raw_id) else {
        return render_not_found_response(chrome);
    };

    match state.posts.load_post(id).await {
        Ok(post) => {
            let view = LayoutContext::new(chrome, PostDetailView::from(post));
            render_template_response(PostTemplate { view }, StatusCode::OK)
        }
        Err(err) => post_error_to_response("infra::http::public::post_detail", err, chrome),
    }
}

async fn new_post_form(State(state): State<HttpState>) -> Response {
    render_editor(
        &state,
        &PostForm::default(),
        NEW_POST_HEADING,
        "/new-post".to_string(),
        &FormErrors::default(),
        StatusCode::OK,
    )
}

async fn create_post(State(state): State<HttpState>, Form(form): Form<PostForm>) -> Response {
    let action = "/new-post".to_string();

    let content = match form.validate(&state.csrf) {
        Ok(content) => content,
        Err(errors) => {
            return render_editor(
                &state,
                &form,
                NEW_POST_HEADING,
                action,
                &errors,
                StatusCode::UNPROCESSABLE_ENTITY,
            );
        }
    };

    match state.posts.create_post(content).await {
        Ok(_) => Redirect::to("/").into_response(),
        Err(BlogPostError::DuplicateTitle { .. }) => render_editor(
            &state,
            &form,
            NEW_POST_HEADING,
            action,
            &FormErrors::duplicate_title(),
            StatusCode::CONFLICT,
        ),
        Err(err) => {
            post_error_to_response("infra::http::public::create_post", err, state.chrome.load())
        }
    }
}

async fn edit_post_form(State(state): State<HttpState>, Path(raw_id): Path<String>) -> Response {
    let Some(id) = parse_post_id(&raw_id) else {
        return render_not_found_response(state.chrome.load());
    };

    match state.posts.load_post(id).await {
        Ok(post) => render_editor(
            &state,
            &PostForm::from_record(&post),
            EDIT_POST_HEADING,
            edit_action(id),
            &FormErrors::default(),
            StatusCode::OK,
        ),
        Err(err) => post_error_to_response(
            "infra::http::public::edit_post_form",
            err,
            state.chrome.load(),
        ),
    }
}

async fn update_post(
    State(state): State<HttpState>,
    Path(raw_id): Path<String>,
    Form(form): Form<PostForm>,
) -> Response {
    const SOURCE: &str = "infra::http::public::update_post";

    let Some(id) = parse_post_id(&raw_id) else {
        return render_not_found_response(state.chrome.load());
    };

    if let Err(err) = state.posts.load_post(id).await {
        return post_error_to_response(SOURCE, err, state.chrome.load());
    }

    let content = match form.validate(&state.csrf) {
        Ok(content) => content,
        Err(errors) => {
            return render_editor(
                &state,
                &form,
                EDIT_POST_HEADING,
                edit_action(id),
                &errors,
                StatusCode::UNPROCESSABLE_ENTITY,
            );
        }
    };

    match state.posts.update_post(id, content).await {
        Ok(post) => Redirect::to(&post_href(post.id)).into_response(),
        Err(BlogPostError::DuplicateTitle { .. }) => render_editor(
            &state,
            &form,
            EDIT_POST_HEADING,
            edit_action(id),
            &FormErrors::duplicate_title(),
            StatusCode::CONFLICT,
        ),
        Err(err) => post_error_to_response(SOURCE, err, state.chrome.load()),
    }
}

async fn delete_post(State(state): State<HttpState>, Path(raw_id): Path<String>) -> Response {
    let Some(id) = parse_post_id(&raw_id) else {
        return render_not_found_response(state.chrome.load());
    };

    match state.posts.delete_post(id).await {
        Ok(()) => Redirect::to("/").into_response(),
        Err(err) => post_error_to_response(
            "infra::http::public::delete_post",
            err,
            state.chrome.load(),
        ),
    }
}

async fn about(State(state): State<HttpState>) -> Response {
    let view = LayoutContext::new(state.chrome.load(), StaticPageView);
    render_template_response(AboutTemplate { view }, StatusCode::OK)
}

async fn contact(State(state): State<HttpState>) -> Response {
    let view = LayoutContext::new(state.chrome.load(), StaticPageView);
    render_template_response(ContactTemplate { view }, StatusCode::OK)
}

async fn public_health(State(state): State<HttpState>) -> Response {
    db_health_response(state.db.health_check().await)
}

async fn fallback(State(state): State<HttpState>) -> Response {
    render_not_found_response(state.chrome.load())
}

fn edit_action(id: i64) -> String {
    format!("/edit-post/{id}")
}

/// Render the post editor with a freshly issued CSRF token.
fn render_editor(
    state: &HttpState,
    form: &PostForm,
    heading: &'static str,
    action: String,
    errors: &FormErrors,
    status: StatusCode,
) -> Response {
    let chrome = state.chrome.load();
    let content = form.editor_view(heading, action, state.csrf.issue(), errors);
    let view = LayoutContext::new(chrome, content);
    render_template_response(PostEditorTemplate { view }, status)
}
