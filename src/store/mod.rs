// src/store/mod.rs

//! Data access behind two traits so handlers never touch a concrete backend.

pub mod memory;
pub mod postgres;
pub mod timed;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::{
        class::Class,
        note::Note,
        quiz::{NewQuizResult, QuizResult, QuizStatus},
    },
};

pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use timed::Timed;

/// Classes and their notes.
#[async_trait]
pub trait NotebookStore: Send + Sync {
    /// Newest first.
    async fn list_classes(&self) -> Result<Vec<Class>, AppError>;
    async fn get_class(&self, id: Uuid) -> Result<Option<Class>, AppError>;
    async fn create_class(&self, name: &str) -> Result<Class, AppError>;
    /// Deletes the class after its quiz results and notes. Returns false if it did not exist.
    async fn delete_class(&self, id: Uuid) -> Result<bool, AppError>;

    /// Oldest first, the order notes are fed to the quiz prompt.
    async fn list_notes(&self, class_id: Uuid) -> Result<Vec<Note>, AppError>;
    async fn get_note(&self, id: Uuid) -> Result<Option<Note>, AppError>;
    async fn create_note(&self, class_id: Uuid, content: &str) -> Result<Note, AppError>;
    async fn update_note(&self, id: Uuid, content: &str) -> Result<Option<Note>, AppError>;
    async fn delete_note(&self, id: Uuid) -> Result<bool, AppError>;
}

/// Append-only quiz history.
#[async_trait]
pub trait ResultStore: Send + Sync {
    async fn save(&self, result: NewQuizResult) -> Result<QuizResult, AppError>;
    /// Newest first, joined with the class name.
    async fn list_by_class(
        &self,
        class_id: Uuid,
        status: Option<QuizStatus>,
    ) -> Result<Vec<QuizResult>, AppError>;
    /// Newest first, joined with the class name.
    async fn list_all(&self, status: Option<QuizStatus>) -> Result<Vec<QuizResult>, AppError>;
}
