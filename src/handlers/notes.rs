// src/handlers/notes.rs

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;
use validator::Validate;

use crate::{error::AppError, models::note::NoteContentRequest, store::NotebookStore};

async fn ensure_class(notebook: &dyn NotebookStore, class_id: Uuid) -> Result<(), AppError> {
    notebook
        .get_class(class_id)
        .await?
        .map(|_| ())
        .ok_or(AppError::NotFound("Class not found".to_string()))
}

fn non_blank(payload: &NoteContentRequest) -> Result<(), AppError> {
    payload.validate()?;
    if payload.content.trim().is_empty() {
        return Err(AppError::Validation("Note content must not be blank".to_string()));
    }
    Ok(())
}

/// Lists the notes of a class, oldest first.
pub async fn list_notes(
    State(notebook): State<Arc<dyn NotebookStore>>,
    Path(class_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    ensure_class(notebook.as_ref(), class_id).await?;
    let notes = notebook.list_notes(class_id).await?;
    Ok(Json(notes))
}

pub async fn create_note(
    State(notebook): State<Arc<dyn NotebookStore>>,
    Path(class_id): Path<Uuid>,
    Json(payload): Json<NoteContentRequest>,
) -> Result<impl IntoResponse, AppError> {
    non_blank(&payload)?;
    ensure_class(notebook.as_ref(), class_id).await?;

    let note = notebook.create_note(class_id, payload.content.trim()).await?;
    Ok((StatusCode::CREATED, Json(note)))
}

pub async fn get_note(
    State(notebook): State<Arc<dyn NotebookStore>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let note = notebook
        .get_note(id)
        .await?
        .ok_or(AppError::NotFound("Note not found".to_string()))?;
    Ok(Json(note))
}

/// Replaces the content of a note and bumps `updated_at`.
pub async fn update_note(
    State(notebook): State<Arc<dyn NotebookStore>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<NoteContentRequest>,
) -> Result<impl IntoResponse, AppError> {
    non_blank(&payload)?;

    let note = notebook
        .update_note(id, payload.content.trim())
        .await?
        .ok_or(AppError::NotFound("Note not found".to_string()))?;
    Ok(Json(note))
}

pub async fn delete_note(
    State(notebook): State<Arc<dyn NotebookStore>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    if !notebook.delete_note(id).await? {
        return Err(AppError::NotFound("Note not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}
