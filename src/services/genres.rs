//! Genre management service

use uuid::Uuid;

use super::{Removal, Submission};
use crate::{
    error::{AppError, AppResult},
    models::{
        book::BookSummary,
        genre::{Genre, GenreForm},
    },
    repository::Stores,
};

/// A genre with the books filed under it
#[derive(Debug, Clone)]
pub struct GenreDetail {
    pub genre: Genre,
    pub books: Vec<BookSummary>,
}

#[derive(Clone)]
pub struct GenresService {
    stores: Stores,
}

impl GenresService {
    pub fn new(stores: Stores) -> Self {
        Self { stores }
    }

    pub async fn list(&self) -> AppResult<Vec<Genre>> {
        self.stores.genres.list().await
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Genre> {
        self.stores
            .genres
            .get(id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    pub async fn detail(&self, id: Uuid) -> AppResult<GenreDetail> {
        self.find_with_books(id).await?.ok_or_else(|| not_found(id))
    }

    pub async fn find_with_books(&self, id: Uuid) -> AppResult<Option<GenreDetail>> {
        let (genre, books) = tokio::try_join!(
            self.stores.genres.get(id),
            self.stores.books.by_genre(id),
        )?;
        Ok(genre.map(|genre| GenreDetail { genre, books }))
    }

    /// Create a genre unless one with the same name (ignoring case) exists,
    /// in which case the existing genre is accepted instead.
    pub async fn create(&self, form: GenreForm) -> AppResult<Submission<GenreForm, Genre>> {
        let (form, errors) = form.check();
        if !errors.is_empty() {
            return Ok(Submission::Rejected { form, errors });
        }

        if let Some(existing) = self.stores.genres.find_by_name(&form.name).await? {
            tracing::info!(
                "Genre '{}' already exists as id={}, not creating a duplicate",
                form.name,
                existing.id
            );
            return Ok(Submission::Accepted(existing));
        }

        let genre = self.stores.genres.create(&form.to_data()).await?;
        tracing::info!("Created genre id={} ({})", genre.id, genre.name);
        Ok(Submission::Accepted(genre))
    }

    pub async fn update(&self, id: Uuid, form: GenreForm) -> AppResult<Submission<GenreForm, Genre>> {
        let (form, errors) = form.check();
        if !errors.is_empty() {
            return Ok(Submission::Rejected { form, errors });
        }

        let genre = self
            .stores
            .genres
            .update(id, &form.to_data())
            .await?
            .ok_or_else(|| not_found(id))?;
        tracing::info!("Updated genre id={}", genre.id);
        Ok(Submission::Accepted(genre))
    }

    /// Delete `target` unless the genre at `id` still has books
    pub async fn delete(&self, id: Uuid, target: Uuid) -> AppResult<Removal<Genre, BookSummary>> {
        let (genre, books) = tokio::try_join!(
            self.stores.genres.get(id),
            self.stores.books.by_genre(id),
        )?;

        if !books.is_empty() {
            tracing::info!(
                "Refusing to delete genre id={}: {} book(s) still reference it",
                id,
                books.len()
            );
            return Ok(Removal::Blocked {
                entity: genre,
                dependents: books,
            });
        }

        if self.stores.genres.delete(target).await? {
            tracing::info!("Deleted genre id={}", target);
        }
        Ok(Removal::Removed)
    }
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Genre {} not found", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::MockStores;

    fn genre(name: &str) -> Genre {
        Genre {
            id: Uuid::new_v4(),
            name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_redirects_to_case_insensitive_duplicate() {
        let existing = genre("Fantasy");
        let existing_id = existing.id;

        let mut mocks = MockStores::new();
        mocks
            .genres
            .expect_find_by_name()
            .withf(|name| name == "fantasy")
            .returning(move |_| Ok(Some(existing.clone())));
        mocks.genres.expect_create().times(0);
        let service = GenresService::new(mocks.into_stores());

        let form = GenreForm {
            name: "fantasy".to_string(),
        };
        match service.create(form).await.unwrap() {
            Submission::Accepted(genre) => assert_eq!(genre.id, existing_id),
            other => panic!("expected Accepted, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_inserts_new_genre() {
        let mut mocks = MockStores::new();
        mocks.genres.expect_find_by_name().returning(|_| Ok(None));
        mocks
            .genres
            .expect_create()
            .withf(|data| data.name == "Poetry")
            .times(1)
            .returning(|data| Ok(genre(&data.name)));
        let service = GenresService::new(mocks.into_stores());

        let form = GenreForm {
            name: " Poetry ".to_string(),
        };
        assert!(matches!(
            service.create(form).await.unwrap(),
            Submission::Accepted(g) if g.name == "Poetry"
        ));
    }

    #[tokio::test]
    async fn test_create_rejects_short_name_without_lookup() {
        let mut mocks = MockStores::new();
        mocks.genres.expect_find_by_name().times(0);
        mocks.genres.expect_create().times(0);
        let service = GenresService::new(mocks.into_stores());

        let form = GenreForm {
            name: "SF".to_string(),
        };
        match service.create(form).await.unwrap() {
            Submission::Rejected { form, errors } => {
                assert_eq!(form.name, "SF");
                assert_eq!(errors[0].field, "name");
            }
            other => panic!("expected Rejected, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_delete_blocked_by_books() {
        let fantasy = genre("Fantasy");
        let id = fantasy.id;
        let mut mocks = MockStores::new();
        mocks.genres.expect_get().returning(move |_| Ok(Some(fantasy.clone())));
        mocks.books.expect_by_genre().returning(|_| {
            Ok(vec![BookSummary {
                id: Uuid::new_v4(),
                title: "The Hobbit".to_string(),
                summary: String::new(),
            }])
        });
        mocks.genres.expect_delete().times(0);
        let service = GenresService::new(mocks.into_stores());

        assert!(matches!(
            service.delete(id, id).await.unwrap(),
            Removal::Blocked { dependents, .. } if dependents.len() == 1
        ));
    }

    #[tokio::test]
    async fn test_delete_without_books() {
        let id = Uuid::new_v4();
        let mut mocks = MockStores::new();
        mocks.genres.expect_get().returning(|_| Ok(None));
        mocks.books.expect_by_genre().returning(|_| Ok(vec![]));
        mocks.genres.expect_delete().times(1).returning(|_| Ok(true));
        let service = GenresService::new(mocks.into_stores());

        assert!(matches!(service.delete(id, id).await.unwrap(), Removal::Removed));
    }
}
