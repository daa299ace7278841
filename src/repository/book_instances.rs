//! Book instances repository

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::book_instance::{BookInstance, BookInstanceData, InstanceStatus},
};

/// Persistence operations on book instances. Reads join the parent book's title.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookInstanceStore: Send + Sync {
    async fn list(&self) -> AppResult<Vec<BookInstance>>;
    async fn get(&self, id: Uuid) -> AppResult<Option<BookInstance>>;
    async fn by_book(&self, book_id: Uuid) -> AppResult<Vec<BookInstance>>;
    async fn create(&self, data: &BookInstanceData) -> AppResult<BookInstance>;
    async fn update(&self, id: Uuid, data: &BookInstanceData) -> AppResult<Option<BookInstance>>;
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
    async fn count(&self) -> AppResult<i64>;
    async fn count_with_status(&self, status: InstanceStatus) -> AppResult<i64>;
}

const SELECT_WITH_TITLE: &str = r#"
    SELECT bi.*, b.title AS book_title
    FROM book_instances bi
    JOIN books b ON b.id = bi.book_id
"#;

#[derive(Clone)]
pub struct BookInstancesRepository {
    pool: Pool<Postgres>,
}

impl BookInstancesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookInstanceStore for BookInstancesRepository {
    async fn list(&self) -> AppResult<Vec<BookInstance>> {
        let query = format!("{} ORDER BY b.title, bi.imprint", SELECT_WITH_TITLE);
        let rows = sqlx::query_as::<_, BookInstance>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn get(&self, id: Uuid) -> AppResult<Option<BookInstance>> {
        let query = format!("{} WHERE bi.id = $1", SELECT_WITH_TITLE);
        let row = sqlx::query_as::<_, BookInstance>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn by_book(&self, book_id: Uuid) -> AppResult<Vec<BookInstance>> {
        let query = format!("{} WHERE bi.book_id = $1 ORDER BY bi.imprint", SELECT_WITH_TITLE);
        let rows = sqlx::query_as::<_, BookInstance>(&query)
            .bind(book_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn create(&self, data: &BookInstanceData) -> AppResult<BookInstance> {
        let row = sqlx::query_as::<_, BookInstance>(
            r#"
            INSERT INTO book_instances (id, book_id, imprint, status, due_back)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.book_id)
        .bind(&data.imprint)
        .bind(data.status.as_str())
        .bind(data.due_back)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update(&self, id: Uuid, data: &BookInstanceData) -> AppResult<Option<BookInstance>> {
        let row = sqlx::query_as::<_, BookInstance>(
            r#"
            UPDATE book_instances
            SET book_id = $1, imprint = $2, status = $3, due_back = $4
            WHERE id = $5
            RETURNING *
            "#,
        )
        .bind(data.book_id)
        .bind(&data.imprint)
        .bind(data.status.as_str())
        .bind(data.due_back)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM book_instances WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*)::bigint FROM book_instances")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn count_with_status(&self, status: InstanceStatus) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*)::bigint FROM book_instances WHERE status = $1",
        )
        .bind(status.as_str())
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}
