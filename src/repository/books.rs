//! Books repository

use async_trait::async_trait;
use sqlx::{Pool, Postgres, Transaction};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        book::{Book, BookData, BookListing, BookSummary},
        genre::Genre,
    },
};

/// Persistence operations on books and their genre links
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookStore: Send + Sync {
    /// All books with their author, ordered by title
    async fn list(&self) -> AppResult<Vec<BookListing>>;
    /// All books as select options, ordered by title
    async fn list_summaries(&self) -> AppResult<Vec<BookSummary>>;
    async fn get(&self, id: Uuid) -> AppResult<Option<Book>>;
    /// Genres linked to a book, ordered by name
    async fn genres_of(&self, book_id: Uuid) -> AppResult<Vec<Genre>>;
    async fn by_author(&self, author_id: Uuid) -> AppResult<Vec<BookSummary>>;
    async fn by_genre(&self, genre_id: Uuid) -> AppResult<Vec<BookSummary>>;
    async fn create(&self, data: &BookData) -> AppResult<Book>;
    /// Replaces the genre links too. `None` when no book has this id
    async fn update(&self, id: Uuid, data: &BookData) -> AppResult<Option<Book>>;
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
    async fn count(&self) -> AppResult<i64>;
}

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    async fn link_genres(
        tx: &mut Transaction<'_, Postgres>,
        book_id: Uuid,
        genre_ids: &[Uuid],
    ) -> AppResult<()> {
        if genre_ids.is_empty() {
            return Ok(());
        }
        sqlx::query(
            r#"
            INSERT INTO book_genres (book_id, genre_id)
            SELECT $1, UNNEST($2::uuid[])
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(book_id)
        .bind(genre_ids)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl BookStore for BooksRepository {
    async fn list(&self) -> AppResult<Vec<BookListing>> {
        let rows = sqlx::query_as::<_, BookListing>(
            r#"
            SELECT b.id, b.title, b.author_id,
                   a.first_name AS author_first_name,
                   a.family_name AS author_family_name
            FROM books b
            JOIN authors a ON a.id = b.author_id
            ORDER BY b.title
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list_summaries(&self) -> AppResult<Vec<BookSummary>> {
        let rows = sqlx::query_as::<_, BookSummary>(
            "SELECT id, title, summary FROM books ORDER BY title",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get(&self, id: Uuid) -> AppResult<Option<Book>> {
        let row = sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn genres_of(&self, book_id: Uuid) -> AppResult<Vec<Genre>> {
        let rows = sqlx::query_as::<_, Genre>(
            r#"
            SELECT g.* FROM genres g
            JOIN book_genres bg ON bg.genre_id = g.id
            WHERE bg.book_id = $1
            ORDER BY g.name
            "#,
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn by_author(&self, author_id: Uuid) -> AppResult<Vec<BookSummary>> {
        let rows = sqlx::query_as::<_, BookSummary>(
            "SELECT id, title, summary FROM books WHERE author_id = $1 ORDER BY title",
        )
        .bind(author_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn by_genre(&self, genre_id: Uuid) -> AppResult<Vec<BookSummary>> {
        let rows = sqlx::query_as::<_, BookSummary>(
            r#"
            SELECT b.id, b.title, b.summary FROM books b
            JOIN book_genres bg ON bg.book_id = b.id
            WHERE bg.genre_id = $1
            ORDER BY b.title
            "#,
        )
        .bind(genre_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn create(&self, data: &BookData) -> AppResult<Book> {
        let mut tx = self.pool.begin().await?;

        let book = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (id, title, author_id, summary, isbn)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&data.title)
        .bind(data.author_id)
        .bind(&data.summary)
        .bind(&data.isbn)
        .fetch_one(&mut *tx)
        .await?;

        Self::link_genres(&mut tx, book.id, &data.genre_ids).await?;
        tx.commit().await?;
        Ok(book)
    }

    async fn update(&self, id: Uuid, data: &BookData) -> AppResult<Option<Book>> {
        let mut tx = self.pool.begin().await?;

        let book = sqlx::query_as::<_, Book>(
            r#"
            UPDATE books SET title = $1, author_id = $2, summary = $3, isbn = $4
            WHERE id = $5
            RETURNING *
            "#,
        )
        .bind(&data.title)
        .bind(data.author_id)
        .bind(&data.summary)
        .bind(&data.isbn)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(book) = book else {
            return Ok(None);
        };

        sqlx::query("DELETE FROM book_genres WHERE book_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        Self::link_genres(&mut tx, id, &data.genre_ids).await?;
        tx.commit().await?;
        Ok(Some(book))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*)::bigint FROM books")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
