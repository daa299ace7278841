//! Catalog home page

use axum::{extract::State, response::Html};

use crate::{error::AppResult, views, AppState};

pub async fn index(State(state): State<AppState>) -> AppResult<Html<String>> {
    let counts = state.services.catalog.counts().await?;

    let mut context = views::page("Local Library Home");
    context.insert("counts", &counts);
    views::render("index.html", &context)
}
