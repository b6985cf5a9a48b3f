// src/store/timed.rs

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::{
        class::Class,
        note::Note,
        quiz::{NewQuizResult, QuizResult, QuizStatus},
    },
    store::{NotebookStore, ResultStore},
    utils::deadline::{persistence_timeout, within},
};

/// Wraps a store so that every call fails with a persistence error after `limit`.
pub struct Timed<S: ?Sized> {
    inner: Arc<S>,
    limit: Duration,
}

impl<S: ?Sized> Timed<S> {
    pub fn new(inner: Arc<S>, limit: Duration) -> Self {
        Self { inner, limit }
    }
}

#[async_trait]
impl NotebookStore for Timed<dyn NotebookStore> {
    async fn list_classes(&self) -> Result<Vec<Class>, AppError> {
        within(self.limit, self.inner.list_classes(), persistence_timeout).await
    }

    async fn get_class(&self, id: Uuid) -> Result<Option<Class>, AppError> {
        within(self.limit, self.inner.get_class(id), persistence_timeout).await
    }

    async fn create_class(&self, name: &str) -> Result<Class, AppError> {
        within(self.limit, self.inner.create_class(name), persistence_timeout).await
    }

    async fn delete_class(&self, id: Uuid) -> Result<bool, AppError> {
        within(self.limit, self.inner.delete_class(id), persistence_timeout).await
    }

    async fn list_notes(&self, class_id: Uuid) -> Result<Vec<Note>, AppError> {
        within(self.limit, self.inner.list_notes(class_id), persistence_timeout).await
    }

    async fn get_note(&self, id: Uuid) -> Result<Option<Note>, AppError> {
        within(self.limit, self.inner.get_note(id), persistence_timeout).await
    }

    async fn create_note(&self, class_id: Uuid, content: &str) -> Result<Note, AppError> {
        within(
            self.limit,
            self.inner.create_note(class_id, content),
            persistence_timeout,
        )
        .await
    }

    async fn update_note(&self, id: Uuid, content: &str) -> Result<Option<Note>, AppError> {
        within(self.limit, self.inner.update_note(id, content), persistence_timeout).await
    }

    async fn delete_note(&self, id: Uuid) -> Result<bool, AppError> {
        within(self.limit, self.inner.delete_note(id), persistence_timeout).await
    }
}

#[async_trait]
impl ResultStore for Timed<dyn ResultStore> {
    async fn save(&self, result: NewQuizResult) -> Result<QuizResult, AppError> {
        within(self.limit, self.inner.save(result), persistence_timeout).await
    }

    async fn list_by_class(
        &self,
        class_id: Uuid,
        status: Option<QuizStatus>,
    ) -> Result<Vec<QuizResult>, AppError> {
        within(
            self.limit,
            self.inner.list_by_class(class_id, status),
            persistence_timeout,
        )
        .await
    }

    async fn list_all(&self, status: Option<QuizStatus>) -> Result<Vec<QuizResult>, AppError> {
        within(self.limit, self.inner.list_all(status), persistence_timeout).await
    }
}
