use crate::application::error::{ErrorReport, HttpError};
use crate::domain::entities::BlogPostRecord;
use ammonia::Builder;
use askama::{Error as AskamaError, Template};
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use once_cell::sync::Lazy;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("{public_message}")]
pub struct TemplateRenderError {
    pub(crate) source: &'static str,
    pub(crate) public_message: &'static str,
    #[source]
    pub(crate) error: AskamaError,
}

impl TemplateRenderError {
    pub fn new(source: &'static str, public_message: &'static str, error: AskamaError) -> Self {
        Self {
            source,
            public_message,
            error,
        }
    }
}

impl From<TemplateRenderError> for HttpError {
    fn from(err: TemplateRenderError) -> Self {
        let TemplateRenderError {
            source,
            public_message,
            error,
        } = err;

        HttpError::from_error(
            source,
            StatusCode::INTERNAL_SERVER_ERROR,
            public_message,
            &error,
        )
    }
}

pub fn render_template<T: Template>(template: T) -> Result<Html<String>, HttpError> {
    template.render().map(Html).map_err(|err| {
        TemplateRenderError::new(
            "presentation::views::render_template",
            "Template rendering failed",
            err,
        )
        .into()
    })
}

pub fn render_template_response<T: Template>(template: T, status: StatusCode) -> Response {
    match render_template(template) {
        Ok(html) => (status, html).into_response(),
        Err(err) => err.into_response(),
    }
}

pub fn render_not_found_response(chrome: LayoutChrome) -> Response {
    let content = ErrorPageView::not_found();
    let view = LayoutContext::new(chrome, content);
    let mut response = render_template_response(ErrorTemplate { view }, StatusCode::NOT_FOUND);
    ErrorReport::from_message(
        "presentation::views::render_not_found_response",
        StatusCode::NOT_FOUND,
        "Resource not found",
    )
    .attach(&mut response);
    response
}

static POST_BODY_SANITIZER: Lazy<Builder<'static>> = Lazy::new(|| {
    let mut builder = Builder::default();
    builder.add_tags(&["figure", "figcaption", "s", "u"]);
    builder
});

/// Strip scripts, event handlers and unknown tags from editor-produced HTML.
pub fn sanitize_post_body(raw: &str) -> String {
    POST_BODY_SANITIZER.clean(raw).to_string()
}

#[derive(Clone)]
pub struct FooterView {
    pub copy: String,
}

#[derive(Clone)]
pub struct BrandView {
    pub title: String,
    pub href: String,
}

#[derive(Clone)]
pub struct NavigationLinkView {
    pub label: String,
    pub href: String,
}

impl NavigationLinkView {
    pub fn new(label: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            href: href.into(),
        }
    }
}

#[derive(Clone)]
pub struct LayoutChrome {
    pub brand: BrandView,
    pub navigation: Vec<NavigationLinkView>,
    pub footer: FooterView,
    pub year: i32,
}

#[derive(Clone)]
pub struct LayoutContext<T> {
    pub brand: BrandView,
    pub navigation: Vec<NavigationLinkView>,
    pub footer: FooterView,
    pub year: i32,
    pub content: T,
}

impl<T> LayoutContext<T> {
    pub fn new(chrome: LayoutChrome, content: T) -> Self {
        Self {
            brand: chrome.brand,
            navigation: chrome.navigation,
            footer: chrome.footer,
            year: chrome.year,
            content,
        }
    }
}

#[derive(Clone)]
pub struct PostCard {
    pub href: String,
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub published: String,
}

impl From<&BlogPostRecord> for PostCard {
    fn from(post: &BlogPostRecord) -> Self {
        Self {
            href: post_href(post.id),
            title: post.title.clone(),
            subtitle: post.subtitle.clone(),
            author: post.author.clone(),
            published: post.date.clone(),
        }
    }
}

pub struct PostListView {
    pub posts: Vec<PostCard>,
    pub has_posts: bool,
}

impl PostListView {
    pub fn new(posts: &[BlogPostRecord]) -> Self {
        let posts: Vec<PostCard> = posts.iter().map(PostCard::from).collect();
        Self {
            has_posts: !posts.is_empty(),
            posts,
        }
    }
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub view: LayoutContext<PostListView>,
}

pub struct PostDetailView {
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub published: String,
    pub img_url: String,
    pub body_html: String,
    pub edit_href: String,
    pub delete_href: String,
}

impl From<BlogPostRecord> for PostDetailView {
    fn from(post: BlogPostRecord) -> Self {
        Self {
            body_html: sanitize_post_body(&post.body),
            edit_href: format!("/edit-post/{}", post.id),
            delete_href: format!("/delete-post/{}", post.id),
            title: post.title,
            subtitle: post.subtitle,
            author: post.author,
            published: post.date,
            img_url: post.img_url,
        }
    }
}

#[derive(Template)]
#[template(path = "post.html")]
pub struct PostTemplate {
    pub view: LayoutContext<PostDetailView>,
}

/// One input of the post editor, with any messages from the last submission.
#[derive(Clone)]
pub struct FormFieldView {
    pub name: &'static str,
    pub label: &'static str,
    pub value: String,
    pub errors: Vec<String>,
    pub multiline: bool,
}

impl FormFieldView {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

pub struct PostEditorView {
    pub heading: &'static str,
    pub action: String,
    pub submit_label: &'static str,
    pub csrf_token: String,
    pub fields: Vec<FormFieldView>,
    pub form_errors: Vec<String>,
}

#[derive(Template)]
#[template(path = "make-post.html")]
pub struct PostEditorTemplate {
    pub view: LayoutContext<PostEditorView>,
}

pub struct StaticPageView;

#[derive(Template)]
#[template(path = "about.html")]
pub struct AboutTemplate {
    pub view: LayoutContext<StaticPageView>,
}

#[derive(Template)]
#[template(path = "contact.html")]
pub struct ContactTemplate {
    pub view: LayoutContext<StaticPageView>,
}

pub struct ErrorPageView {
    pub title: String,
    pub message: String,
    pub primary_action: ErrorAction,
}

impl ErrorPageView {
    pub fn not_found() -> Self {
        Self {
            title: "Page Not Found".to_string(),
            message: "The post or page you requested does not exist.".to_string(),
            primary_action: ErrorAction::home(),
        }
    }
}

pub struct ErrorAction {
    pub href: String,
    pub label: String,
}

impl ErrorAction {
    pub fn home() -> Self {
        Self {
            href: "/".to_string(),
            label: "Back to all posts".to_string(),
        }
    }
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub view: LayoutContext<ErrorPageView>,
}

pub fn post_href(id: i64) -> String {
    format!("/post/{id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> BlogPostRecord {
        BlogPostRecord {
            id: 7,
            title: "Tides".to_string(),
            subtitle: "On the moon".to_string(),
            date: "07 March, 2024".to_string(),
            body: "<p onclick=\"steal()\">Hi<script>alert(1)</script></p>".to_string(),
            author: "Ada".to_string(),
            img_url: "https://images.example.com/tides.jpg".to_string(),
        }
    }

    #[test]
    fn sanitizer_drops_scripts_and_handlers() {
        let cleaned = sanitize_post_body(&record().body);
        assert_eq!(cleaned, "<p>Hi</p>");
    }

    #[test]
    fn sanitizer_keeps_editor_markup() {
        let html = "<h2>Title</h2><p><strong>bold</strong> <em>it</em></p><ul><li>one</li></ul>";
        assert_eq!(sanitize_post_body(html), html);
    }

    #[test]
    fn detail_view_links_to_edit_and_delete() {
        let view = PostDetailView::from(record());
        assert_eq!(view.edit_href, "/edit-post/7");
        assert_eq!(view.delete_href, "/delete-post/7");
        assert!(!view.body_html.contains("script"));
    }

    #[test]
    fn list_view_reports_emptiness() {
        assert!(!PostListView::new(&[]).has_posts);

        let listing = PostListView::new(&[record()]);
        assert!(listing.has_posts);
        assert_eq!(listing.posts[0].href, "/post/7");
    }
}
