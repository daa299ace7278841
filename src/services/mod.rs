//! Business logic services

pub mod authors;
pub mod book_instances;
pub mod books;
pub mod catalog;
pub mod genres;

use crate::{repository::{Repository, Stores}, validation::FieldError};

/// Outcome of a create or update form submission
#[derive(Debug)]
pub enum Submission<F, T> {
    /// Validation failed; the sanitized input goes back to the form
    Rejected { form: F, errors: Vec<FieldError> },
    /// The entity to redirect to
    Accepted(T),
}

/// Outcome of a delete confirmation
#[derive(Debug)]
pub enum Removal<T, D> {
    /// Dependents still reference the entity; nothing was deleted
    Blocked { entity: Option<T>, dependents: Vec<D> },
    Removed,
}

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
    pub authors: authors::AuthorsService,
    pub genres: genres::GenresService,
    pub books: books::BooksService,
    pub book_instances: book_instances::BookInstancesService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: &Repository) -> Self {
        Self::with_stores(repository.stores())
    }

    pub fn with_stores(stores: Stores) -> Self {
        Self {
            catalog: catalog::CatalogService::new(stores.clone()),
            authors: authors::AuthorsService::new(stores.clone()),
            genres: genres::GenresService::new(stores.clone()),
            books: books::BooksService::new(stores.clone()),
            book_instances: book_instances::BookInstancesService::new(stores),
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Store mocks wired into `Stores`

    use std::sync::Arc;

    use crate::repository::{
        authors::MockAuthorStore, book_instances::MockBookInstanceStore, books::MockBookStore,
        genres::MockGenreStore, Stores,
    };

    #[derive(Default)]
    pub struct MockStores {
        pub authors: MockAuthorStore,
        pub genres: MockGenreStore,
        pub books: MockBookStore,
        pub book_instances: MockBookInstanceStore,
    }

    impl MockStores {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn into_stores(self) -> Stores {
            Stores {
                authors: Arc::new(self.authors),
                genres: Arc::new(self.genres),
                books: Arc::new(self.books),
                book_instances: Arc::new(self.book_instances),
            }
        }
    }
}
