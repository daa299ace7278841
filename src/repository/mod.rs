//! Repository layer for database operations

pub mod authors;
pub mod book_instances;
pub mod books;
pub mod genres;

use std::sync::Arc;

use sqlx::{Pool, Postgres};

pub use authors::AuthorStore;
pub use book_instances::BookInstanceStore;
pub use books::BookStore;
pub use genres::GenreStore;

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub authors: authors::AuthorsRepository,
    pub genres: genres::GenresRepository,
    pub books: books::BooksRepository,
    pub book_instances: book_instances::BookInstancesRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            authors: authors::AuthorsRepository::new(pool.clone()),
            genres: genres::GenresRepository::new(pool.clone()),
            books: books::BooksRepository::new(pool.clone()),
            book_instances: book_instances::BookInstancesRepository::new(pool.clone()),
            pool,
        }
    }

    /// The repositories behind their store traits, as services consume them
    pub fn stores(&self) -> Stores {
        Stores {
            authors: Arc::new(self.authors.clone()),
            genres: Arc::new(self.genres.clone()),
            books: Arc::new(self.books.clone()),
            book_instances: Arc::new(self.book_instances.clone()),
        }
    }
}

/// One handle per catalog collection
#[derive(Clone)]
pub struct Stores {
    pub authors: Arc<dyn AuthorStore>,
    pub genres: Arc<dyn GenreStore>,
    pub books: Arc<dyn BookStore>,
    pub book_instances: Arc<dyn BookInstanceStore>,
}
