//! Book instance (copy) management service

use uuid::Uuid;

use super::Submission;
use crate::{
    error::{AppError, AppResult},
    models::{
        book::BookSummary,
        book_instance::{BookInstance, BookInstanceForm},
    },
    repository::Stores,
    validation::FieldError,
};

#[derive(Clone)]
pub struct BookInstancesService {
    stores: Stores,
}

impl BookInstancesService {
    pub fn new(stores: Stores) -> Self {
        Self { stores }
    }

    pub async fn list(&self) -> AppResult<Vec<BookInstance>> {
        self.stores.book_instances.list().await
    }

    pub async fn detail(&self, id: Uuid) -> AppResult<BookInstance> {
        self.find(id).await?.ok_or_else(|| not_found(id))
    }

    pub async fn find(&self, id: Uuid) -> AppResult<Option<BookInstance>> {
        self.stores.book_instances.get(id).await
    }

    /// Books offered in the form's select box
    pub async fn book_options(&self) -> AppResult<Vec<BookSummary>> {
        self.stores.books.list_summaries().await
    }

    /// Current values of a copy plus the book list, fetched concurrently
    pub async fn edit_form(&self, id: Uuid) -> AppResult<(BookInstanceForm, Vec<BookSummary>)> {
        let (instance, books) = tokio::try_join!(
            self.stores.book_instances.get(id),
            self.stores.books.list_summaries(),
        )?;
        let instance = instance.ok_or_else(|| not_found(id))?;
        Ok((BookInstanceForm::from(&instance), books))
    }

    pub async fn create(
        &self,
        form: BookInstanceForm,
    ) -> AppResult<Submission<BookInstanceForm, BookInstance>> {
        let (form, errors) = form.check();
        if !errors.is_empty() {
            return Ok(Submission::Rejected { form, errors });
        }

        let data = form
            .to_data()
            .ok_or_else(|| AppError::BadRequest("Invalid book reference".to_string()))?;
        if self.stores.books.get(data.book_id).await?.is_none() {
            return Ok(Submission::Rejected {
                form,
                errors: vec![unknown_book()],
            });
        }
        let instance = self.stores.book_instances.create(&data).await?;
        tracing::info!("Created book instance id={} of book {}", instance.id, instance.book_id);
        Ok(Submission::Accepted(instance))
    }

    pub async fn update(
        &self,
        id: Uuid,
        form: BookInstanceForm,
    ) -> AppResult<Submission<BookInstanceForm, BookInstance>> {
        let (form, errors) = form.check();
        if !errors.is_empty() {
            return Ok(Submission::Rejected { form, errors });
        }

        let data = form
            .to_data()
            .ok_or_else(|| AppError::BadRequest("Invalid book reference".to_string()))?;
        if self.stores.books.get(data.book_id).await?.is_none() {
            return Ok(Submission::Rejected {
                form,
                errors: vec![unknown_book()],
            });
        }
        let instance = self
            .stores
            .book_instances
            .update(id, &data)
            .await?
            .ok_or_else(|| not_found(id))?;
        tracing::info!("Updated book instance id={}", instance.id);
        Ok(Submission::Accepted(instance))
    }

    /// Copies have no dependents, so deletion is unconditional
    pub async fn delete(&self, target: Uuid) -> AppResult<()> {
        if self.stores.book_instances.delete(target).await? {
            tracing::info!("Deleted book instance id={}", target);
        } else {
            tracing::debug!("Book instance id={} was already gone", target);
        }
        Ok(())
    }
}

fn unknown_book() -> FieldError {
    FieldError::new("book", "Book must be selected from the list")
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Book copy {} not found", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{Book, InstanceStatus},
        services::testing::MockStores,
    };

    #[tokio::test]
    async fn test_delete_is_unconditional() {
        let target = Uuid::new_v4();
        let mut mocks = MockStores::new();
        mocks
            .book_instances
            .expect_delete()
            .withf(move |id| *id == target)
            .times(1)
            .returning(|_| Ok(true));
        mocks.book_instances.expect_by_book().times(0);
        let service = BookInstancesService::new(mocks.into_stores());

        service.delete(target).await.unwrap();
    }

    #[tokio::test]
    async fn test_create_stores_selected_book() {
        let book_id = Uuid::new_v4();
        let mut mocks = MockStores::new();
        mocks.books.expect_get().returning(|id| {
            Ok(Some(Book {
                id,
                title: "Emma".to_string(),
                author_id: Uuid::new_v4(),
                summary: "Matchmaking in Highbury.".to_string(),
                isbn: "9780141439587".to_string(),
            }))
        });
        mocks
            .book_instances
            .expect_create()
            .withf(move |data| data.book_id == book_id && data.status == InstanceStatus::Loaned)
            .times(1)
            .returning(|data| {
                Ok(BookInstance {
                    id: Uuid::new_v4(),
                    book_id: data.book_id,
                    imprint: data.imprint.clone(),
                    status: data.status.to_string(),
                    due_back: data.due_back,
                    book_title: None,
                })
            });
        let service = BookInstancesService::new(mocks.into_stores());

        let form = BookInstanceForm {
            book: book_id.to_string(),
            imprint: "Penguin Classics".to_string(),
            status: "Loaned".to_string(),
            due_back: Some("2024-07-01".to_string()),
        };
        match service.create(form).await.unwrap() {
            Submission::Accepted(instance) => assert_eq!(instance.imprint, "Penguin Classics"),
            other => panic!("expected Accepted, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_rejects_deleted_book() {
        let mut mocks = MockStores::new();
        mocks.books.expect_get().returning(|_| Ok(None));
        mocks.book_instances.expect_create().times(0);
        let service = BookInstancesService::new(mocks.into_stores());

        let form = BookInstanceForm {
            book: Uuid::new_v4().to_string(),
            imprint: "Penguin Classics".to_string(),
            status: String::new(),
            due_back: None,
        };
        match service.create(form).await.unwrap() {
            Submission::Rejected { form, errors } => {
                assert_eq!(form.imprint, "Penguin Classics");
                assert_eq!(errors, vec![unknown_book()]);
            }
            other => panic!("expected Rejected, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_edit_form_not_found() {
        let mut mocks = MockStores::new();
        mocks.book_instances.expect_get().returning(|_| Ok(None));
        mocks.books.expect_list_summaries().returning(|| Ok(vec![]));
        let service = BookInstancesService::new(mocks.into_stores());

        let err = service.edit_form(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
