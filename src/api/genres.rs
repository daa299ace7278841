//! Genre pages

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
        book::BookLink,
        genre::{GenreForm, GenreView},
    },
    services::{Removal, Submission},
    validation::FieldError,
    views,
    AppState,
};

const LIST_URL: &str = "/catalog/genres";

#[derive(Debug, Deserialize)]
pub struct GenreDeleteForm {
    #[serde(default)]
    pub genreid: String,
}

pub async fn genre_list(State(state): State<AppState>) -> AppResult<Html<String>> {
    let genres = state.services.genres.list().await?;

    let mut context = views::page("Genre List");
    let genre_list: Vec<GenreView> = genres.iter().map(GenreView::from).collect();
    context.insert("genre_list", &genre_list);
    views::render("genre_list.html", &context)
}

pub async fn genre_detail(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Html<String>> {
    let detail = state.services.genres.detail(id).await?;

    let mut context = views::page("Genre Detail");
    context.insert("genre", &GenreView::from(&detail.genre));
    let books: Vec<BookLink> = detail.books.iter().map(BookLink::from).collect();
    context.insert("genre_books", &books);
    views::render("genre_detail.html", &context)
}

fn render_form(title: &str, form: &GenreForm, errors: &[FieldError]) -> AppResult<Html<String>> {
    let mut context = views::page(title);
    views::insert_form(&mut context, "genre", form, errors);
    views::render("genre_form.html", &context)
}

pub async fn genre_create_get() -> AppResult<Html<String>> {
    render_form("Create Genre", &GenreForm::default(), &[])
}

pub async fn genre_create_post(
    State(state): State<AppState>,
    Form(form): Form<GenreForm>,
) -> AppResult<Response> {
    match state.services.genres.create(form).await? {
        Submission::Rejected { form, errors } => {
            Ok(render_form("Create Genre", &form, &errors)?.into_response())
        }
        Submission::Accepted(genre) => Ok(Redirect::to(&genre.url()).into_response()),
    }
}

pub async fn genre_update_get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Html<String>> {
    let genre = state.services.genres.get(id).await?;
    render_form("Update Genre", &GenreForm::from(&genre), &[])
}

pub async fn genre_update_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Form(form): Form<GenreForm>,
) -> AppResult<Response> {
    match state.services.genres.update(id, form).await? {
        Submission::Rejected { form, errors } => {
            Ok(render_form("Update Genre", &form, &errors)?.into_response())
        }
        Submission::Accepted(genre) => Ok(Redirect::to(&genre.url()).into_response()),
    }
}

pub async fn genre_delete_get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Response> {
    let Some(detail) = state.services.genres.find_with_books(id).await? else {
        return Ok(Redirect::to(LIST_URL).into_response());
    };

    let mut context = views::page("Delete Genre");
    context.insert("genre", &Some(GenreView::from(&detail.genre)));
    let books: Vec<BookLink> = detail.books.iter().map(BookLink::from).collect();
    context.insert("genre_books", &books);
    Ok(views::render("genre_delete.html", &context)?.into_response())
}

pub async fn genre_delete_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Form(form): Form<GenreDeleteForm>,
) -> AppResult<Response> {
    let target = parse_submitted_id(&form.genreid)?;

    match state.services.genres.delete(id, target).await? {
        Removal::Blocked { entity, dependents } => {
            let mut context = views::page("Delete Genre");
            context.insert("genre", &entity.as_ref().map(GenreView::from));
            let books: Vec<BookLink> = dependents.iter().map(BookLink::from).collect();
            context.insert("genre_books", &books);
            Ok(views::render("genre_delete.html", &context)?.into_response())
        }
        Removal::Removed => Ok(Redirect::to(LIST_URL).into_response()),
    }
}
