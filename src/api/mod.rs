//! HTML page handlers and routing for the catalog

pub mod authors;
pub mod book_instances;
pub mod books;
pub mod catalog;
pub mod genres;

use axum::{
    response::Redirect,
    routing::get,
    Router,
};
use tower_http::{compression::CompressionLayer, trace::TraceLayer};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    AppState,
};

/// Parse the entity id posted by a delete confirmation form
pub(crate) fn parse_submitted_id(value: &str) -> AppResult<Uuid> {
    Uuid::parse_str(value.trim())
        .map_err(|_| AppError::BadRequest(format!("Invalid id: {:?}", value)))
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let catalog = Router::new()
        .route("/", get(catalog::index))
        // Authors
        .route("/authors", get(authors::author_list))
        .route(
            "/author/create",
            get(authors::author_create_get).post(authors::author_create_post),
        )
        .route("/author/:id", get(authors::author_detail))
        .route(
            "/author/:id/update",
            get(authors::author_update_get).post(authors::author_update_post),
        )
        .route(
            "/author/:id/delete",
            get(authors::author_delete_get).post(authors::author_delete_post),
        )
        // Genres
        .route("/genres", get(genres::genre_list))
        .route(
            "/genre/create",
            get(genres::genre_create_get).post(genres::genre_create_post),
        )
        .route("/genre/:id", get(genres::genre_detail))
        .route(
            "/genre/:id/update",
            get(genres::genre_update_get).post(genres::genre_update_post),
        )
        .route(
            "/genre/:id/delete",
            get(genres::genre_delete_get).post(genres::genre_delete_post),
        )
        // Books
        .route("/books", get(books::book_list))
        .route(
            "/book/create",
            get(books::book_create_get).post(books::book_create_post),
        )
        .route("/book/:id", get(books::book_detail))
        .route(
            "/book/:id/update",
            get(books::book_update_get).post(books::book_update_post),
        )
        .route(
            "/book/:id/delete",
            get(books::book_delete_get).post(books::book_delete_post),
        )
        // Book copies
        .route("/bookinstances", get(book_instances::bookinstance_list))
        .route(
            "/bookinstance/create",
            get(book_instances::bookinstance_create_get)
                .post(book_instances::bookinstance_create_post),
        )
        .route("/bookinstance/:id", get(book_instances::bookinstance_detail))
        .route(
            "/bookinstance/:id/update",
            get(book_instances::bookinstance_update_get)
                .post(book_instances::bookinstance_update_post),
        )
        .route(
            "/bookinstance/:id/delete",
            get(book_instances::bookinstance_delete_get)
                .post(book_instances::bookinstance_delete_post),
        );

    Router::new()
        .route("/", get(|| async { Redirect::to("/catalog") }))
        .nest("/catalog", catalog)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .with_state(state)
}
