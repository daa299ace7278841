//! Author pages

use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::Form;
use serde::Deserialize;
use uuid::Uuid;

use super::parse_submitted_id;
use crate::{
    error::AppResult,
    models::{
        author::{Author, AuthorForm, AuthorView},
        book::BookLink,
    },
    services::{Removal, Submission},
    validation::FieldError,
    views::{self, Choice},
    AppState,
};

const LIST_URL: &str = "/catalog/authors";

/// Confirmation form posted by the delete page
#[derive(Debug, Deserialize)]
pub struct AuthorDeleteForm {
    #[serde(default)]
    pub authorid: String,
}

pub async fn author_list(State(state): State<AppState>) -> AppResult<Html<String>> {
    let authors = state.services.authors.list().await?;

    let mut context = views::page("Author List");
    let author_list: Vec<AuthorView> = authors.iter().map(AuthorView::from).collect();
    context.insert("author_list", &author_list);
    views::render("author_list.html", &context)
}

pub async fn author_detail(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Html<String>> {
    let detail = state.services.authors.detail(id).await?;

    let mut context = views::page("Author Detail");
    context.insert("author", &AuthorView::from(&detail.author));
    let books: Vec<BookLink> = detail.books.iter().map(BookLink::from).collect();
    context.insert("author_books", &books);
    views::render("author_detail.html", &context)
}

fn render_form(title: &str, form: &AuthorForm, errors: &[FieldError]) -> AppResult<Html<String>> {
    let mut context = views::page(title);
    views::insert_form(&mut context, "author", form, errors);
    views::render("author_form.html", &context)
}

pub async fn author_create_get() -> AppResult<Html<String>> {
    render_form("Create Author", &AuthorForm::default(), &[])
}

pub async fn author_create_post(
    State(state): State<AppState>,
    Form(form): Form<AuthorForm>,
) -> AppResult<Response> {
    match state.services.authors.create(form).await? {
        Submission::Rejected { form, errors } => {
            Ok(render_form("Create Author", &form, &errors)?.into_response())
        }
        Submission::Accepted(author) => Ok(Redirect::to(&author.url()).into_response()),
    }
}

pub async fn author_update_get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Html<String>> {
    let author = state.services.authors.get(id).await?;
    render_form("Update Author", &AuthorForm::from(&author), &[])
}

pub async fn author_update_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Form(form): Form<AuthorForm>,
) -> AppResult<Response> {
    match state.services.authors.update(id, form).await? {
        Submission::Rejected { form, errors } => {
            Ok(render_form("Update Author", &form, &errors)?.into_response())
        }
        Submission::Accepted(author) => Ok(Redirect::to(&author.url()).into_response()),
    }
}

pub async fn author_delete_get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Response> {
    let Some(detail) = state.services.authors.find_with_books(id).await? else {
        return Ok(Redirect::to(LIST_URL).into_response());
    };

    let mut context = views::page("Delete Author");
    context.insert("author", &Some(AuthorView::from(&detail.author)));
    let books: Vec<BookLink> = detail.books.iter().map(BookLink::from).collect();
    context.insert("author_books", &books);
    Ok(views::render("author_delete.html", &context)?.into_response())
}

pub async fn author_delete_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Form(form): Form<AuthorDeleteForm>,
) -> AppResult<Response> {
    let target = parse_submitted_id(&form.authorid)?;

    match state.services.authors.delete(id, target).await? {
        Removal::Blocked { entity, dependents } => {
            let mut context = views::page("Delete Author");
            context.insert("author", &entity.as_ref().map(AuthorView::from));
            let books: Vec<BookLink> = dependents.iter().map(BookLink::from).collect();
            context.insert("author_books", &books);
            Ok(views::render("author_delete.html", &context)?.into_response())
        }
        Removal::Removed => Ok(Redirect::to(LIST_URL).into_response()),
    }
}

/// Authors as select-box entries, `selected` marking the chosen one
pub(crate) fn author_choices(authors: &[Author], selected: Option<Uuid>) -> Vec<Choice> {
    authors
        .iter()
        .map(|a| Choice::new(a.id, a.name(), Some(a.id) == selected))
        .collect()
}
