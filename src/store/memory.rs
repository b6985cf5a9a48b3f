// src/store/memory.rs

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::types::Json;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::{
        class::Class,
        note::Note,
        quiz::{NewQuizResult, QuizResult, QuizStatus},
    },
    store::{NotebookStore, ResultStore},
};

#[derive(Default)]
struct Tables {
    // Insertion order is chronological order.
    classes: Vec<Class>,
    notes: Vec<Note>,
    results: Vec<QuizResult>,
}

/// In-process store for tests and local experiments.
///
/// `set_available(false)` makes every call fail with a persistence error, which is
/// how a backend outage is simulated. `set_latency` delays every call, which is how a
/// slow backend is simulated.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    unavailable: AtomicBool,
    latency_ms: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_available(&self, available: bool) {
        self.unavailable.store(!available, Ordering::SeqCst);
    }

    pub fn set_latency(&self, latency: Duration) {
        self.latency_ms
            .store(latency.as_millis() as u64, Ordering::SeqCst);
    }

    async fn check(&self) -> Result<(), AppError> {
        let latency = self.latency_ms.load(Ordering::SeqCst);
        if latency > 0 {
            tokio::time::sleep(Duration::from_millis(latency)).await;
        }
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::Persistence("memory store marked unavailable".to_string()));
        }
        Ok(())
    }

    fn with_class_name(tables: &Tables, mut result: QuizResult) -> QuizResult {
        result.class_name = tables
            .classes
            .iter()
            .find(|c| c.id == result.class_id)
            .map(|c| c.name.clone());
        result
    }
}

#[async_trait]
impl NotebookStore for MemoryStore {
    async fn list_classes(&self) -> Result<Vec<Class>, AppError> {
        self.check().await?;
        let tables = self.tables.read().await;
        Ok(tables.classes.iter().rev().cloned().collect())
    }

    async fn get_class(&self, id: Uuid) -> Result<Option<Class>, AppError> {
        self.check().await?;
        let tables = self.tables.read().await;
        Ok(tables.classes.iter().find(|c| c.id == id).cloned())
    }

    async fn create_class(&self, name: &str) -> Result<Class, AppError> {
        self.check().await?;
        let class = Class {
            id: Uuid::new_v4(),
            name: name.to_string(),
            created_at: Utc::now(),
        };
        self.tables.write().await.classes.push(class.clone());
        Ok(class)
    }

    async fn delete_class(&self, id: Uuid) -> Result<bool, AppError> {
        self.check().await?;
        let mut tables = self.tables.write().await;
        tables.results.retain(|r| r.class_id != id);
        tables.notes.retain(|n| n.class_id != id);
        let before = tables.classes.len();
        tables.classes.retain(|c| c.id != id);
        Ok(tables.classes.len() < before)
    }

    async fn list_notes(&self, class_id: Uuid) -> Result<Vec<Note>, AppError> {
        self.check().await?;
        let tables = self.tables.read().await;
        Ok(tables
            .notes
            .iter()
            .filter(|n| n.class_id == class_id)
            .cloned()
            .collect())
    }

    async fn get_note(&self, id: Uuid) -> Result<Option<Note>, AppError> {
        self.check().await?;
        let tables = self.tables.read().await;
        Ok(tables.notes.iter().find(|n| n.id == id).cloned())
    }

    async fn create_note(&self, class_id: Uuid, content: &str) -> Result<Note, AppError> {
        self.check().await?;
        let now = Utc::now();
        let note = Note {
            id: Uuid::new_v4(),
            class_id,
            content: content.to_string(),
            created_at: now,
            updated_at: now,
        };
        self.tables.write().await.notes.push(note.clone());
        Ok(note)
    }

    async fn update_note(&self, id: Uuid, content: &str) -> Result<Option<Note>, AppError> {
        self.check().await?;
        let mut tables = self.tables.write().await;
        Ok(tables.notes.iter_mut().find(|n| n.id == id).map(|note| {
            note.content = content.to_string();
            note.updated_at = Utc::now();
            note.clone()
        }))
    }

    async fn delete_note(&self, id: Uuid) -> Result<bool, AppError> {
        self.check().await?;
        let mut tables = self.tables.write().await;
        let before = tables.notes.len();
        tables.notes.retain(|n| n.id != id);
        Ok(tables.notes.len() < before)
    }
}

#[async_trait]
impl ResultStore for MemoryStore {
    async fn save(&self, result: NewQuizResult) -> Result<QuizResult, AppError> {
        self.check().await?;
        let mut tables = self.tables.write().await;
        let stored = QuizResult {
            id: Uuid::new_v4(),
            class_id: result.class_id,
            class_name: None,
            score: result.score,
            total_questions: result.total_questions,
            questions: Json(result.questions),
            status: result.status,
            scheduled_date: result.scheduled_date,
            created_at: Utc::now(),
        };
        tables.results.push(stored.clone());
        Ok(Self::with_class_name(&tables, stored))
    }

    async fn list_by_class(
        &self,
        class_id: Uuid,
        status: Option<QuizStatus>,
    ) -> Result<Vec<QuizResult>, AppError> {
        self.check().await?;
        let tables = self.tables.read().await;
        Ok(tables
            .results
            .iter()
            .rev()
            .filter(|r| r.class_id == class_id)
            .filter(|r| status.is_none_or(|s| r.status == s))
            .map(|r| Self::with_class_name(&tables, r.clone()))
            .collect())
    }

    async fn list_all(&self, status: Option<QuizStatus>) -> Result<Vec<QuizResult>, AppError> {
        self.check().await?;
        let tables = self.tables.read().await;
        Ok(tables
            .results
            .iter()
            .rev()
            .filter(|r| status.is_none_or(|s| r.status == s))
            .map(|r| Self::with_class_name(&tables, r.clone()))
            .collect())
    }
}
