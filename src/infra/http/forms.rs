use std::collections::BTreeMap;

use serde::Deserialize;

use crate::application::csrf::CsrfGuard;
use crate::application::posts::PostContent;
use crate::domain::entities::BlogPostRecord;
use crate::presentation::views::{FormFieldView, PostEditorView};

use super::validators;

pub const DUPLICATE_TITLE_MESSAGE: &str = "A post with this title already exists.";

#[derive(Clone, Copy)]
enum FieldKind {
    Text,
    Url,
    RichText,
}

struct FieldSpec {
    name: &'static str,
    label: &'static str,
    kind: FieldKind,
}

const POST_FIELDS: [FieldSpec; 5] = [
    FieldSpec {
        name: "title",
        label: "Blog Post Title",
        kind: FieldKind::Text,
    },
    FieldSpec {
        name: "subtitle",
        label: "Subtitle",
        kind: FieldKind::Text,
    },
    FieldSpec {
        name: "author",
        label: "Your Name",
        kind: FieldKind::Text,
    },
    FieldSpec {
        name: "img_url",
        label: "Blog Image URL",
        kind: FieldKind::Url,
    },
    FieldSpec {
        name: "body",
        label: "Blog Content",
        kind: FieldKind::RichText,
    },
];

/// Raw `application/x-www-form-urlencoded` submission of the post editor.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PostForm {
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub img_url: String,
    pub body: String,
    pub csrf_token: String,
}

/// Messages keyed by field name, plus messages about the form as a whole.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    fields: BTreeMap<&'static str, Vec<String>>,
    form: Vec<String>,
}

impl FormErrors {
    pub fn duplicate_title() -> Self {
        let mut errors = Self::default();
        errors.push_field("title", DUPLICATE_TITLE_MESSAGE.to_string());
        errors
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.form.is_empty()
    }

    pub fn field(&self, name: &str) -> &[String] {
        self.fields.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn form(&self) -> &[String] {
        &self.form
    }

    fn push_field(&mut self, name: &'static str, message: String) {
        self.fields.entry(name).or_default().push(message);
    }
}

impl PostForm {
    pub fn from_record(post: &BlogPostRecord) -> Self {
        Self {
            title: post.title.clone(),
            subtitle: post.subtitle.clone(),
            author: post.author.clone(),
            img_url: post.img_url.clone(),
            body: post.body.clone(),
            csrf_token: String::new(),
        }
    }

    /// Check every field and the CSRF token. Values are passed through untouched on success.
    pub fn validate(&self, csrf: &CsrfGuard) -> Result<PostContent, FormErrors> {
        let mut errors = FormErrors::default();

        if let Err(err) = csrf.verify(&self.csrf_token) {
            errors.form.push(err.to_string());
        }

        for spec in &POST_FIELDS {
            if let Err(message) = check_field(spec.kind, self.value(spec.name)) {
                errors.push_field(spec.name, message);
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(PostContent {
            title: self.title.clone(),
            subtitle: self.subtitle.clone(),
            author: self.author.clone(),
            img_url: self.img_url.clone(),
            body: self.body.clone(),
        })
    }

    pub fn editor_view(
        &self,
        heading: &'static str,
        action: String,
        csrf_token: String,
        errors: &FormErrors,
    ) -> PostEditorView {
        let fields = POST_FIELDS
            .iter()
            .map(|spec| FormFieldView {
                name: spec.name,
                label: spec.label,
                value: self.value(spec.name).to_string(),
                errors: errors.field(spec.name).to_vec(),
                multiline: matches!(spec.kind, FieldKind::RichText),
            })
            .collect();

        PostEditorView {
            heading,
            action,
            submit_label: "Submit Post",
            csrf_token,
            fields,
            form_errors: errors.form().to_vec(),
        }
    }

    fn value(&self, name: &str) -> &str {
        match name {
            "title" => &self.title,
            "subtitle" => &self.subtitle,
            "author" => &self.author,
            "img_url" => &self.img_url,
            "body" => &self.body,
            _ => "",
        }
    }
}

fn check_field(kind: FieldKind, value: &str) -> Result<(), String> {
    validators::required(value)?;
    match kind {
        FieldKind::Url => validators::url(value),
        FieldKind::Text | FieldKind::RichText => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::http::validators::{INVALID_URL_MESSAGE, REQUIRED_MESSAGE};

    fn filled(guard: &CsrfGuard) -> PostForm {
        PostForm {
            title: "Tides".to_string(),
            subtitle: "Notes on the moon".to_string(),
            author: "Ada".to_string(),
            img_url: "https://images.example.com/tides.jpg".to_string(),
            body: "<p>Low and high.</p>".to_string(),
            csrf_token: guard.issue(),
        }
    }

    #[test]
    fn complete_form_validates_to_content() {
        let guard = CsrfGuard::new("secret");
        let form = filled(&guard);

        let content = form.validate(&guard).expect("valid form");
        assert_eq!(content.title, "Tides");
        assert_eq!(content.img_url, "https://images.example.com/tides.jpg");
        assert_eq!(content.body, "<p>Low and high.</p>");
    }

    #[test]
    fn every_failing_field_is_reported() {
        let guard = CsrfGuard::new("secret");
        let mut form = filled(&guard);
        form.subtitle = "   ".to_string();
        form.img_url = "not a url".to_string();
        form.body.clear();

        let errors = form.validate(&guard).expect_err("invalid form");
        assert_eq!(errors.field("subtitle"), [REQUIRED_MESSAGE.to_string()]);
        assert_eq!(errors.field("img_url"), [INVALID_URL_MESSAGE.to_string()]);
        assert_eq!(errors.field("body"), [REQUIRED_MESSAGE.to_string()]);
        assert!(errors.field("title").is_empty());
        assert!(errors.form().is_empty());
    }

    #[test]
    fn blank_url_only_reports_required() {
        let guard = CsrfGuard::new("secret");
        let mut form = filled(&guard);
        form.img_url.clear();

        let errors = form.validate(&guard).expect_err("invalid form");
        assert_eq!(errors.field("img_url"), [REQUIRED_MESSAGE.to_string()]);
    }

    #[test]
    fn long_values_are_accepted_as_submitted() {
        let guard = CsrfGuard::new("secret");
        let mut form = filled(&guard);
        form.title = "t".repeat(400);
        form.img_url = format!("https://images.unsplash.com/photo-1?{}", "a".repeat(230));

        let content = form.validate(&guard).expect("long values are valid");
        assert_eq!(content.title.len(), 400);
        assert_eq!(content.img_url, form.img_url);
    }

    #[test]
    fn missing_csrf_token_is_a_form_error() {
        let guard = CsrfGuard::new("secret");
        let mut form = filled(&guard);
        form.csrf_token.clear();

        let errors = form.validate(&guard).expect_err("invalid form");
        assert_eq!(errors.form(), ["The CSRF token is missing.".to_string()]);
    }

    #[test]
    fn editor_view_keeps_submitted_values_and_messages() {
        let guard = CsrfGuard::new("secret");
        let mut form = filled(&guard);
        form.author.clear();
        let errors = form.validate(&guard).expect_err("invalid form");

        let view = form.editor_view("New Post", "/new-post".to_string(), guard.issue(), &errors);

        let names: Vec<&str> = view.fields.iter().map(|field| field.name).collect();
        assert_eq!(names, ["title", "subtitle", "author", "img_url", "body"]);
        assert_eq!(view.fields[0].value, "Tides");
        assert_eq!(view.fields[2].errors, [REQUIRED_MESSAGE.to_string()]);
        assert!(view.fields[4].multiline);
        assert!(!view.fields[0].multiline);
    }

    #[test]
    fn prefilled_form_comes_from_the_stored_post() {
        let record = BlogPostRecord {
            id: 3,
            title: "Stored".to_string(),
            subtitle: "Sub".to_string(),
            date: "01 January, 2024".to_string(),
            body: "<p>Body</p>".to_string(),
            author: "Grace".to_string(),
            img_url: "https://example.com/a.png".to_string(),
        };

        let form = PostForm::from_record(&record);
        assert_eq!(form.title, "Stored");
        assert_eq!(form.author, "Grace");
        assert!(form.csrf_token.is_empty());
    }
}
