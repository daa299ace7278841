//! Book management service

use uuid::Uuid;

use super::{Removal, Submission};
use crate::{
    error::{AppError, AppResult},
    models::{
        author::Author,
        book::{Book, BookData, BookForm, BookListing},
        book_instance::BookInstance,
        genre::Genre,
    },
    repository::Stores,
    validation::FieldError,
};

/// A book with everything shown on its detail page
#[derive(Debug, Clone)]
pub struct BookDetail {
    pub book: Book,
    pub author: Option<Author>,
    pub genres: Vec<Genre>,
    pub instances: Vec<BookInstance>,
}

/// Select lists for the book form
#[derive(Debug, Clone)]
pub struct BookFormOptions {
    pub authors: Vec<Author>,
    pub genres: Vec<Genre>,
}

#[derive(Clone)]
pub struct BooksService {
    stores: Stores,
}

impl BooksService {
    pub fn new(stores: Stores) -> Self {
        Self { stores }
    }

    pub async fn list(&self) -> AppResult<Vec<BookListing>> {
        self.stores.books.list().await
    }

    pub async fn detail(&self, id: Uuid) -> AppResult<BookDetail> {
        let (book, instances) = tokio::try_join!(
            self.stores.books.get(id),
            self.stores.book_instances.by_book(id),
        )?;
        let book = book.ok_or_else(|| not_found(id))?;

        let (author, genres) = tokio::try_join!(
            self.stores.authors.get(book.author_id),
            self.stores.books.genres_of(id),
        )?;

        Ok(BookDetail {
            book,
            author,
            genres,
            instances,
        })
    }

    pub async fn form_options(&self) -> AppResult<BookFormOptions> {
        let (authors, genres) =
            tokio::try_join!(self.stores.authors.list(), self.stores.genres.list())?;
        Ok(BookFormOptions { authors, genres })
    }

    /// Current values of a book, as the update form shows them
    pub async fn edit_form(&self, id: Uuid) -> AppResult<BookForm> {
        let (book, genres) = tokio::try_join!(
            self.stores.books.get(id),
            self.stores.books.genres_of(id),
        )?;
        let book = book.ok_or_else(|| not_found(id))?;
        let genre_ids: Vec<Uuid> = genres.iter().map(|g| g.id).collect();
        Ok(BookForm::from_book(&book, &genre_ids))
    }

    pub async fn create(&self, form: BookForm) -> AppResult<Submission<BookForm, Book>> {
        let (form, errors) = form.check();
        if !errors.is_empty() {
            return Ok(Submission::Rejected { form, errors });
        }

        let data = form
            .to_data()
            .ok_or_else(|| AppError::BadRequest("Invalid book references".to_string()))?;
        let errors = self.unknown_references(&data).await?;
        if !errors.is_empty() {
            return Ok(Submission::Rejected { form, errors });
        }

        let book = self.stores.books.create(&data).await?;
        tracing::info!("Created book id={} ({})", book.id, book.title);
        Ok(Submission::Accepted(book))
    }

    pub async fn update(&self, id: Uuid, form: BookForm) -> AppResult<Submission<BookForm, Book>> {
        let (form, errors) = form.check();
        if !errors.is_empty() {
            return Ok(Submission::Rejected { form, errors });
        }

        let data = form
            .to_data()
            .ok_or_else(|| AppError::BadRequest("Invalid book references".to_string()))?;
        let errors = self.unknown_references(&data).await?;
        if !errors.is_empty() {
            return Ok(Submission::Rejected { form, errors });
        }

        let book = self
            .stores
            .books
            .update(id, &data)
            .await?
            .ok_or_else(|| not_found(id))?;
        tracing::info!("Updated book id={}", book.id);
        Ok(Submission::Accepted(book))
    }

    /// Author and genres the form points at that no longer exist
    async fn unknown_references(&self, data: &BookData) -> AppResult<Vec<FieldError>> {
        let (author, genres) = tokio::try_join!(
            self.stores.authors.get(data.author_id),
            self.stores.genres.list(),
        )?;

        let mut errors = Vec::new();
        if author.is_none() {
            errors.push(FieldError::new("author", "Author must be selected from the list."));
        }
        if data
            .genre_ids
            .iter()
            .any(|id| !genres.iter().any(|g| g.id == *id))
        {
            errors.push(FieldError::new("genre", "Genre must be selected from the list."));
        }
        Ok(errors)
    }

    /// Book and its copies, or `None` if the book is gone
    pub async fn find_with_instances(&self, id: Uuid) -> AppResult<Option<(Book, Vec<BookInstance>)>> {
        let (book, instances) = tokio::try_join!(
            self.stores.books.get(id),
            self.stores.book_instances.by_book(id),
        )?;
        Ok(book.map(|book| (book, instances)))
    }

    /// Delete `target` unless the book at `id` still has copies
    pub async fn delete(&self, id: Uuid, target: Uuid) -> AppResult<Removal<Book, BookInstance>> {
        let (book, instances) = tokio::try_join!(
            self.stores.books.get(id),
            self.stores.book_instances.by_book(id),
        )?;

        if !instances.is_empty() {
            tracing::info!(
                "Refusing to delete book id={}: {} instance(s) still reference it",
                id,
                instances.len()
            );
            return Ok(Removal::Blocked {
                entity: book,
                dependents: instances,
            });
        }

        if self.stores.books.delete(target).await? {
            tracing::info!("Deleted book id={}", target);
        }
        Ok(Removal::Removed)
    }
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Book {} not found", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::MockStores;

    fn book(id: Uuid, author_id: Uuid) -> Book {
        Book {
            id,
            title: "Emma".to_string(),
            author_id,
            summary: "Matchmaking in Highbury.".to_string(),
            isbn: "9780141439587".to_string(),
        }
    }

    #[tokio::test]
    async fn test_detail_collects_related_records() {
        let id = Uuid::new_v4();
        let author_id = Uuid::new_v4();
        let mut mocks = MockStores::new();
        mocks.books.expect_get().returning(move |_| Ok(Some(book(id, author_id))));
        mocks.book_instances.expect_by_book().returning(|_| Ok(vec![]));
        mocks
            .authors
            .expect_get()
            .withf(move |a| *a == author_id)
            .returning(move |_| {
                Ok(Some(Author {
                    id: author_id,
                    first_name: "Jane".to_string(),
                    family_name: "Austen".to_string(),
                    date_of_birth: None,
                    date_of_death: None,
                }))
            });
        mocks.books.expect_genres_of().returning(|_| {
            Ok(vec![Genre {
                id: Uuid::new_v4(),
                name: "Romance".to_string(),
            }])
        });
        let service = BooksService::new(mocks.into_stores());

        let detail = service.detail(id).await.unwrap();
        assert_eq!(detail.author.map(|a| a.name()), Some("Austen, Jane".to_string()));
        assert_eq!(detail.genres.len(), 1);
        assert!(detail.instances.is_empty());
    }

    #[tokio::test]
    async fn test_detail_not_found_skips_related_lookups() {
        let mut mocks = MockStores::new();
        mocks.books.expect_get().returning(|_| Ok(None));
        mocks.book_instances.expect_by_book().returning(|_| Ok(vec![]));
        mocks.authors.expect_get().times(0);
        let service = BooksService::new(mocks.into_stores());

        let err = service.detail(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    fn author(id: Uuid) -> Author {
        Author {
            id,
            first_name: "Jane".to_string(),
            family_name: "Austen".to_string(),
            date_of_birth: None,
            date_of_death: None,
        }
    }

    fn form(author_id: Uuid, genre_id: Uuid) -> BookForm {
        BookForm {
            title: "Emma".to_string(),
            author: author_id.to_string(),
            summary: "Matchmaking in Highbury.".to_string(),
            isbn: "9780141439587".to_string(),
            genre: vec![genre_id.to_string()],
        }
    }

    #[tokio::test]
    async fn test_create_links_genres() {
        let author_id = Uuid::new_v4();
        let genre_id = Uuid::new_v4();
        let mut mocks = MockStores::new();
        mocks
            .authors
            .expect_get()
            .returning(move |id| Ok(Some(author(id))));
        mocks.genres.expect_list().returning(move || {
            Ok(vec![Genre {
                id: genre_id,
                name: "Romance".to_string(),
            }])
        });
        mocks
            .books
            .expect_create()
            .withf(move |data| data.author_id == author_id && data.genre_ids == vec![genre_id])
            .times(1)
            .returning(move |_| Ok(book(Uuid::new_v4(), author_id)));
        let service = BooksService::new(mocks.into_stores());

        let submitted = form(author_id, genre_id);
        assert!(matches!(service.create(submitted).await.unwrap(), Submission::Accepted(_)));
    }

    #[tokio::test]
    async fn test_create_rejects_deleted_author_and_genre() {
        let mut mocks = MockStores::new();
        mocks.authors.expect_get().returning(|_| Ok(None));
        mocks.genres.expect_list().returning(|| Ok(vec![]));
        mocks.books.expect_create().times(0);
        let service = BooksService::new(mocks.into_stores());

        match service.create(form(Uuid::new_v4(), Uuid::new_v4())).await.unwrap() {
            Submission::Rejected { form, errors } => {
                assert_eq!(form.title, "Emma");
                assert_eq!(
                    errors,
                    vec![
                        FieldError::new("author", "Author must be selected from the list."),
                        FieldError::new("genre", "Genre must be selected from the list."),
                    ]
                );
            }
            other => panic!("expected Rejected, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_update_rejects_deleted_author() {
        let mut mocks = MockStores::new();
        mocks.authors.expect_get().returning(|_| Ok(None));
        mocks.genres.expect_list().returning(|| Ok(vec![]));
        mocks.books.expect_update().times(0);
        let service = BooksService::new(mocks.into_stores());

        let mut submitted = form(Uuid::new_v4(), Uuid::new_v4());
        submitted.genre.clear();
        match service.update(Uuid::new_v4(), submitted).await.unwrap() {
            Submission::Rejected { errors, .. } => assert_eq!(
                errors,
                vec![FieldError::new("author", "Author must be selected from the list.")]
            ),
            other => panic!("expected Rejected, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_delete_blocked_by_instances() {
        let id = Uuid::new_v4();
        let mut mocks = MockStores::new();
        mocks.books.expect_get().returning(move |_| Ok(Some(book(id, Uuid::new_v4()))));
        mocks.book_instances.expect_by_book().returning(move |_| {
            Ok(vec![BookInstance {
                id: Uuid::new_v4(),
                book_id: id,
                imprint: "Penguin".to_string(),
                status: "Available".to_string(),
                due_back: None,
                book_title: Some("Emma".to_string()),
            }])
        });
        mocks.books.expect_delete().times(0);
        let service = BooksService::new(mocks.into_stores());

        assert!(matches!(
            service.delete(id, id).await.unwrap(),
            Removal::Blocked { .. }
        ));
    }
}
