//! Book copy pages

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
        book::BookSummary,
        book_instance::{BookInstanceForm, BookInstanceView, InstanceStatus},
    },
    services::Submission,
    validation::FieldError,
    views::{self, Choice},
    AppState,
};

const LIST_URL: &str = "/catalog/bookinstances";

#[derive(Debug, Deserialize)]
pub struct BookInstanceDeleteForm {
    #[serde(default)]
    pub bookinstanceid: String,
}

pub async fn bookinstance_list(State(state): State<AppState>) -> AppResult<Html<String>> {
    let instances = state.services.book_instances.list().await?;

    let mut context = views::page("Book Instance List");
    let list: Vec<BookInstanceView> = instances.iter().map(BookInstanceView::from).collect();
    context.insert("bookinstance_list", &list);
    views::render("bookinstance_list.html", &context)
}

pub async fn bookinstance_detail(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Html<String>> {
    let instance = state.services.book_instances.detail(id).await?;

    let mut context = views::page("Book:");
    context.insert("bookinstance", &BookInstanceView::from(&instance));
    views::render("bookinstance_detail.html", &context)
}

fn book_choices(books: &[BookSummary], selected: Option<Uuid>) -> Vec<Choice> {
    books
        .iter()
        .map(|b| Choice::new(b.id, b.title.clone(), Some(b.id) == selected))
        .collect()
}

fn status_choices(selected: &str) -> Vec<Choice> {
    InstanceStatus::ALL
        .iter()
        .map(|s| Choice::new(s.as_str(), s.as_str(), s.as_str() == selected))
        .collect()
}

fn render_form(
    title: &str,
    form: &BookInstanceForm,
    books: &[BookSummary],
    errors: &[FieldError],
) -> AppResult<Html<String>> {
    let mut context = views::page(title);
    views::insert_form(&mut context, "bookinstance", form, errors);
    context.insert("book_list", &book_choices(books, form.selected_book()));
    context.insert("statuses", &status_choices(&form.status));
    views::render("bookinstance_form.html", &context)
}

pub async fn bookinstance_create_get(State(state): State<AppState>) -> AppResult<Html<String>> {
    let books = state.services.book_instances.book_options().await?;
    render_form("Create BookInstance", &BookInstanceForm::default(), &books, &[])
}

pub async fn bookinstance_create_post(
    State(state): State<AppState>,
    Form(form): Form<BookInstanceForm>,
) -> AppResult<Response> {
    match state.services.book_instances.create(form).await? {
        Submission::Rejected { form, errors } => {
            let books = state.services.book_instances.book_options().await?;
            Ok(render_form("Create BookInstance", &form, &books, &errors)?.into_response())
        }
        Submission::Accepted(instance) => Ok(Redirect::to(&instance.url()).into_response()),
    }
}

pub async fn bookinstance_update_get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Html<String>> {
    let (form, books) = state.services.book_instances.edit_form(id).await?;
    render_form("Update BookInstance", &form, &books, &[])
}

pub async fn bookinstance_update_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Form(form): Form<BookInstanceForm>,
) -> AppResult<Response> {
    match state.services.book_instances.update(id, form).await? {
        Submission::Rejected { form, errors } => {
            let books = state.services.book_instances.book_options().await?;
            Ok(render_form("Update BookInstance", &form, &books, &errors)?.into_response())
        }
        Submission::Accepted(instance) => Ok(Redirect::to(&instance.url()).into_response()),
    }
}

pub async fn bookinstance_delete_get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Response> {
    let Some(instance) = state.services.book_instances.find(id).await? else {
        return Ok(Redirect::to(LIST_URL).into_response());
    };

    let mut context = views::page("Delete BookInstance");
    context.insert("bookinstance", &BookInstanceView::from(&instance));
    Ok(views::render("bookinstance_delete.html", &context)?.into_response())
}

/// Copies have nothing depending on them; the submitted id is removed as-is
pub async fn bookinstance_delete_post(
    State(state): State<AppState>,
    Form(form): Form<BookInstanceDeleteForm>,
) -> AppResult<Redirect> {
    let target = parse_submitted_id(&form.bookinstanceid)?;
    state.services.book_instances.delete(target).await?;
    Ok(Redirect::to(LIST_URL))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_choices_follow_form_value() {
        let choices = status_choices("Loaned");
        let labels: Vec<_> = choices.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["Maintenance", "Available", "Loaned", "Reserved"]);
        assert!(choices[2].selected);
        assert_eq!(choices.iter().filter(|c| c.selected).count(), 1);
    }

    #[test]
    fn test_status_choices_nothing_selected_for_blank() {
        assert!(status_choices("").iter().all(|c| !c.selected));
    }
}
