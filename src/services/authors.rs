//! Author management service

use uuid::Uuid;

use super::{Removal, Submission};
use crate::{
    error::{AppError, AppResult},
    models::{
        author::{Author, AuthorForm},
        book::BookSummary,
    },
    repository::Stores,
};

/// An author with the books written by them
#[derive(Debug, Clone)]
pub struct AuthorDetail {
    pub author: Author,
    pub books: Vec<BookSummary>,
}

#[derive(Clone)]
pub struct AuthorsService {
    stores: Stores,
}

impl AuthorsService {
    pub fn new(stores: Stores) -> Self {
        Self { stores }
    }

    pub async fn list(&self) -> AppResult<Vec<Author>> {
        self.stores.authors.list().await
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Author> {
        self.stores
            .authors
            .get(id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// Author and their books, fetched concurrently
    pub async fn detail(&self, id: Uuid) -> AppResult<AuthorDetail> {
        self.find_with_books(id).await?.ok_or_else(|| not_found(id))
    }

    /// Same as `detail`, but an absent author is not an error
    pub async fn find_with_books(&self, id: Uuid) -> AppResult<Option<AuthorDetail>> {
        let (author, books) = tokio::try_join!(
            self.stores.authors.get(id),
            self.stores.books.by_author(id),
        )?;
        Ok(author.map(|author| AuthorDetail { author, books }))
    }

    pub async fn create(&self, form: AuthorForm) -> AppResult<Submission<AuthorForm, Author>> {
        let (form, errors) = form.check();
        if !errors.is_empty() {
            tracing::debug!("Author create rejected: {} validation error(s)", errors.len());
            return Ok(Submission::Rejected { form, errors });
        }

        let author = self.stores.authors.create(&form.to_data()).await?;
        tracing::info!("Created author id={} ({})", author.id, author.name());
        Ok(Submission::Accepted(author))
    }

    pub async fn update(
        &self,
        id: Uuid,
        form: AuthorForm,
    ) -> AppResult<Submission<AuthorForm, Author>> {
        let (form, errors) = form.check();
        if !errors.is_empty() {
            tracing::debug!("Author {} update rejected: {} validation error(s)", id, errors.len());
            return Ok(Submission::Rejected { form, errors });
        }

        let author = self
            .stores
            .authors
            .update(id, &form.to_data())
            .await?
            .ok_or_else(|| not_found(id))?;
        tracing::info!("Updated author id={}", author.id);
        Ok(Submission::Accepted(author))
    }

    /// Delete `target` unless the author at `id` still has books.
    ///
    /// `id` comes from the URL and `target` from the confirmation form.
    pub async fn delete(
        &self,
        id: Uuid,
        target: Uuid,
    ) -> AppResult<Removal<Author, BookSummary>> {
        let (author, books) = tokio::try_join!(
            self.stores.authors.get(id),
            self.stores.books.by_author(id),
        )?;

        if !books.is_empty() {
            tracing::info!(
                "Refusing to delete author id={}: {} book(s) still reference it",
                id,
                books.len()
            );
            return Ok(Removal::Blocked {
                entity: author,
                dependents: books,
            });
        }

        if self.stores.authors.delete(target).await? {
            tracing::info!("Deleted author id={}", target);
        }
        Ok(Removal::Removed)
    }
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Author {} not found", id))
}
