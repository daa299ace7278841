//! Server-side page rendering.
//!
//! Templates are embedded at compile time and parsed once. Stored text is
//! kept as typed, so every `.html` template is autoescaped.

use axum::{http::StatusCode, response::Html};
use once_cell::sync::Lazy;
use serde::Serialize;
use tera::{Context, Tera};

use crate::{
    error::{AppError, AppResult},
    validation::FieldError,
};

const TEMPLATES: &[(&str, &str)] = &[
    ("layout.html", include_str!("../templates/layout.html")),
    ("error.html", include_str!("../templates/error.html")),
    ("index.html", include_str!("../templates/index.html")),
    ("author_list.html", include_str!("../templates/author_list.html")),
    ("author_detail.html", include_str!("../templates/author_detail.html")),
    ("author_form.html", include_str!("../templates/author_form.html")),
    ("author_delete.html", include_str!("../templates/author_delete.html")),
    ("genre_list.html", include_str!("../templates/genre_list.html")),
    ("genre_detail.html", include_str!("../templates/genre_detail.html")),
    ("genre_form.html", include_str!("../templates/genre_form.html")),
    ("genre_delete.html", include_str!("../templates/genre_delete.html")),
    ("book_list.html", include_str!("../templates/book_list.html")),
    ("book_detail.html", include_str!("../templates/book_detail.html")),
    ("book_form.html", include_str!("../templates/book_form.html")),
    ("book_delete.html", include_str!("../templates/book_delete.html")),
    ("bookinstance_list.html", include_str!("../templates/bookinstance_list.html")),
    ("bookinstance_detail.html", include_str!("../templates/bookinstance_detail.html")),
    ("bookinstance_form.html", include_str!("../templates/bookinstance_form.html")),
    ("bookinstance_delete.html", include_str!("../templates/bookinstance_delete.html")),
];

static ENGINE: Lazy<Result<Tera, String>> = Lazy::new(|| {
    let mut tera = Tera::default();
    tera.autoescape_on(vec![".html"]);
    tera.add_raw_templates(TEMPLATES.iter().copied())
        .map_err(|e| format!("{:?}", e))?;
    Ok(tera)
});

fn engine() -> AppResult<&'static Tera> {
    ENGINE
        .as_ref()
        .map_err(|e| AppError::Internal(format!("Templates failed to load: {}", e)))
}

/// Start a context with the page title set
pub fn page(title: &str) -> Context {
    let mut context = Context::new();
    context.insert("title", title);
    context
}

pub fn render(template: &str, context: &Context) -> AppResult<Html<String>> {
    let html = engine()?.render(template, context)?;
    Ok(Html(html))
}

pub fn error_page(status: StatusCode, message: &str) -> AppResult<String> {
    let mut context = page(status.canonical_reason().unwrap_or("Error"));
    context.insert("status", &status.as_u16());
    context.insert("message", message);
    Ok(engine()?.render("error.html", &context)?)
}

/// One entry of a select box or checkbox group
#[derive(Debug, Clone, Serialize)]
pub struct Choice {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

impl Choice {
    pub fn new(value: impl ToString, label: impl Into<String>, selected: bool) -> Self {
        Self {
            value: value.to_string(),
            label: label.into(),
            selected,
        }
    }
}

/// Insert the form candidate and its validation errors
pub fn insert_form<T: Serialize>(context: &mut Context, key: &str, form: &T, errors: &[FieldError]) {
    context.insert(key, form);
    context.insert("errors", &errors);
}
