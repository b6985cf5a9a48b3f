// src/store/postgres.rs

use async_trait::async_trait;
use sqlx::{PgPool, types::Json};
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

/// Postgres-backed store.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const RESULT_COLUMNS: &str = r#"
    r.id,
    r.class_id,
    c.name AS class_name,
    r.score,
    r.total_questions,
    r.questions,
    r.status,
    r.scheduled_date,
    r.created_at
"#;

#[async_trait]
impl NotebookStore for PgStore {
    async fn list_classes(&self) -> Result<Vec<Class>, AppError> {
        let classes = sqlx::query_as::<_, Class>(
            "SELECT id, name, created_at FROM classes ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(classes)
    }

    async fn get_class(&self, id: Uuid) -> Result<Option<Class>, AppError> {
        let class = sqlx::query_as::<_, Class>(
            "SELECT id, name, created_at FROM classes WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(class)
    }

    async fn create_class(&self, name: &str) -> Result<Class, AppError> {
        let class = sqlx::query_as::<_, Class>(
            r#"
            INSERT INTO classes (name)
            VALUES ($1)
            RETURNING id, name, created_at
            "#,
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create class: {:?}", e);
            AppError::from(e)
        })?;
        Ok(class)
    }

    async fn delete_class(&self, id: Uuid) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;

        // Children first; the schema has no foreign keys to cascade for us.
        sqlx::query("DELETE FROM quiz_results WHERE class_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM notes WHERE class_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let deleted = sqlx::query("DELETE FROM classes WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;
        Ok(deleted > 0)
    }

    async fn list_notes(&self, class_id: Uuid) -> Result<Vec<Note>, AppError> {
        let notes = sqlx::query_as::<_, Note>(
            r#"
            SELECT id, class_id, content, created_at, updated_at
            FROM notes
            WHERE class_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(class_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(notes)
    }

    async fn get_note(&self, id: Uuid) -> Result<Option<Note>, AppError> {
        let note = sqlx::query_as::<_, Note>(
            "SELECT id, class_id, content, created_at, updated_at FROM notes WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(note)
    }

    async fn create_note(&self, class_id: Uuid, content: &str) -> Result<Note, AppError> {
        let note = sqlx::query_as::<_, Note>(
            r#"
            INSERT INTO notes (class_id, content)
            VALUES ($1, $2)
            RETURNING id, class_id, content, created_at, updated_at
            "#,
        )
        .bind(class_id)
        .bind(content)
        .fetch_one(&self.pool)
        .await?;
        Ok(note)
    }

    async fn update_note(&self, id: Uuid, content: &str) -> Result<Option<Note>, AppError> {
        let note = sqlx::query_as::<_, Note>(
            r#"
            UPDATE notes
            SET content = $1, updated_at = NOW()
            WHERE id = $2
            RETURNING id, class_id, content, created_at, updated_at
            "#,
        )
        .bind(content)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(note)
    }

    async fn delete_note(&self, id: Uuid) -> Result<bool, AppError> {
        let deleted = sqlx::query("DELETE FROM notes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(deleted > 0)
    }
}

#[async_trait]
impl ResultStore for PgStore {
    async fn save(&self, result: NewQuizResult) -> Result<QuizResult, AppError> {
        let saved = sqlx::query_as::<_, QuizResult>(&format!(
            r#"
            WITH r AS (
                INSERT INTO quiz_results
                    (class_id, score, total_questions, questions, status, scheduled_date)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING *
            )
            SELECT {RESULT_COLUMNS}
            FROM r
            LEFT JOIN classes c ON c.id = r.class_id
            "#
        ))
        .bind(result.class_id)
        .bind(result.score)
        .bind(result.total_questions)
        .bind(Json(result.questions))
        .bind(result.status.as_str())
        .bind(result.scheduled_date)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert quiz result: {:?}", e);
            AppError::from(e)
        })?;
        Ok(saved)
    }

    async fn list_by_class(
        &self,
        class_id: Uuid,
        status: Option<QuizStatus>,
    ) -> Result<Vec<QuizResult>, AppError> {
        let results = sqlx::query_as::<_, QuizResult>(&format!(
            r#"
            SELECT {RESULT_COLUMNS}
            FROM quiz_results r
            LEFT JOIN classes c ON c.id = r.class_id
            WHERE r.class_id = $1
              AND ($2::TEXT IS NULL OR r.status = $2)
            ORDER BY r.created_at DESC
            "#
        ))
        .bind(class_id)
        .bind(status.map(|s| s.as_str()))
        .fetch_all(&self.pool)
        .await?;

        Ok(results)
    }

    async fn list_all(&self, status: Option<QuizStatus>) -> Result<Vec<QuizResult>, AppError> {
        let results = sqlx::query_as::<_, QuizResult>(&format!(
            r#"
            SELECT {RESULT_COLUMNS}
            FROM quiz_results r
            LEFT JOIN classes c ON c.id = r.class_id
            WHERE ($1::TEXT IS NULL OR r.status = $1)
            ORDER BY r.created_at DESC
            "#
        ))
        .bind(status.map(|s| s.as_str()))
        .fetch_all(&self.pool)
        .await?;

        Ok(results)
    }
}
