//! Book pages

use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::Form;
use serde::Deserialize;
use uuid::Uuid;

use super::{authors::author_choices, parse_submitted_id};
use crate::{
    error::AppResult,
    models::{
        author::AuthorView,
        book::{BookForm, BookLink, BookView},
        book_instance::{BookInstance, BookInstanceView},
        genre::{Genre, GenreView},
    },
    services::{books::BookFormOptions, Removal, Submission},
    validation::FieldError,
    views::{self, Choice},
    AppState,
};

const LIST_URL: &str = "/catalog/books";

#[derive(Debug, Deserialize)]
pub struct BookDeleteForm {
    #[serde(default)]
    pub bookid: String,
}

pub async fn book_list(State(state): State<AppState>) -> AppResult<Html<String>> {
    let books = state.services.books.list().await?;

    let mut context = views::page("Book List");
    let book_list: Vec<BookLink> = books.iter().map(BookLink::from).collect();
    context.insert("book_list", &book_list);
    views::render("book_list.html", &context)
}

pub async fn book_detail(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Html<String>> {
    let detail = state.services.books.detail(id).await?;

    let mut context = views::page(&detail.book.title);
    context.insert("book", &BookView::from(&detail.book));
    context.insert("author", &detail.author.as_ref().map(AuthorView::from));
    let genres: Vec<GenreView> = detail.genres.iter().map(GenreView::from).collect();
    context.insert("genres", &genres);
    context.insert("book_instances", &instance_views(&detail.instances));
    views::render("book_detail.html", &context)
}

fn genre_choices(genres: &[Genre], selected: &[Uuid]) -> Vec<Choice> {
    genres
        .iter()
        .map(|g| Choice::new(g.id, g.name.clone(), selected.contains(&g.id)))
        .collect()
}

fn instance_views(instances: &[BookInstance]) -> Vec<BookInstanceView> {
    instances.iter().map(BookInstanceView::from).collect()
}

fn render_form(
    title: &str,
    form: &BookForm,
    options: &BookFormOptions,
    errors: &[FieldError],
) -> AppResult<Html<String>> {
    let mut context = views::page(title);
    views::insert_form(&mut context, "book", form, errors);
    context.insert("authors", &author_choices(&options.authors, form.selected_author()));
    context.insert("genres", &genre_choices(&options.genres, &form.selected_genres()));
    views::render("book_form.html", &context)
}

pub async fn book_create_get(State(state): State<AppState>) -> AppResult<Html<String>> {
    let options = state.services.books.form_options().await?;
    render_form("Create Book", &BookForm::default(), &options, &[])
}

pub async fn book_create_post(
    State(state): State<AppState>,
    Form(form): Form<BookForm>,
) -> AppResult<Response> {
    match state.services.books.create(form).await? {
        Submission::Rejected { form, errors } => {
            let options = state.services.books.form_options().await?;
            Ok(render_form("Create Book", &form, &options, &errors)?.into_response())
        }
        Submission::Accepted(book) => Ok(Redirect::to(&book.url()).into_response()),
    }
}

pub async fn book_update_get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Html<String>> {
    let (form, options) = tokio::try_join!(
        state.services.books.edit_form(id),
        state.services.books.form_options(),
    )?;
    render_form("Update Book", &form, &options, &[])
}

pub async fn book_update_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Form(form): Form<BookForm>,
) -> AppResult<Response> {
    match state.services.books.update(id, form).await? {
        Submission::Rejected { form, errors } => {
            let options = state.services.books.form_options().await?;
            Ok(render_form("Update Book", &form, &options, &errors)?.into_response())
        }
        Submission::Accepted(book) => Ok(Redirect::to(&book.url()).into_response()),
    }
}

pub async fn book_delete_get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Response> {
    let Some((book, instances)) = state.services.books.find_with_instances(id).await? else {
        return Ok(Redirect::to(LIST_URL).into_response());
    };

    let mut context = views::page("Delete Book");
    context.insert("book", &Some(BookView::from(&book)));
    context.insert("book_instances", &instance_views(&instances));
    Ok(views::render("book_delete.html", &context)?.into_response())
}

pub async fn book_delete_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Form(form): Form<BookDeleteForm>,
) -> AppResult<Response> {
    let target = parse_submitted_id(&form.bookid)?;

    match state.services.books.delete(id, target).await? {
        Removal::Blocked { entity, dependents } => {
            let mut context = views::page("Delete Book");
            context.insert("book", &entity.as_ref().map(BookView::from));
            context.insert("book_instances", &instance_views(&dependents));
            Ok(views::render("book_delete.html", &context)?.into_response())
        }
        Removal::Removed => Ok(Redirect::to(LIST_URL).into_response()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genre_choices_mark_selected() {
        let fiction = Genre {
            id: Uuid::new_v4(),
            name: "Fiction".to_string(),
        };
        let poetry = Genre {
            id: Uuid::new_v4(),
            name: "Poetry".to_string(),
        };

        let choices = genre_choices(&[fiction.clone(), poetry], &[fiction.id]);
        assert_eq!(choices.len(), 2);
        assert!(choices[0].selected);
        assert!(!choices[1].selected);
        assert_eq!(choices[0].value, fiction.id.to_string());
    }
}
