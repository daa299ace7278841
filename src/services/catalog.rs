//! Catalog home page statistics

use serde::Serialize;

use crate::{error::AppResult, models::InstanceStatus, repository::Stores};

/// Record counts shown on the catalog home page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CatalogCounts {
    pub book_count: i64,
    pub book_instance_count: i64,
    pub book_instance_available_count: i64,
    pub author_count: i64,
    pub genre_count: i64,
}

#[derive(Clone)]
pub struct CatalogService {
    stores: Stores,
}

impl CatalogService {
    pub fn new(stores: Stores) -> Self {
        Self { stores }
    }

    pub async fn counts(&self) -> AppResult<CatalogCounts> {
        let (books, instances, available, authors, genres) = tokio::try_join!(
            self.stores.books.count(),
            self.stores.book_instances.count(),
            self.stores
                .book_instances
                .count_with_status(InstanceStatus::Available),
            self.stores.authors.count(),
            self.stores.genres.count(),
        )?;

        Ok(CatalogCounts {
            book_count: books,
            book_instance_count: instances,
            book_instance_available_count: available,
            author_count: authors,
            genre_count: genres,
        })
    }
}
