// src/handlers/classes.rs

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;
use validator::Validate;

use crate::{error::AppError, models::class::CreateClassRequest, store::NotebookStore};

/// Lists all classes, newest first.
pub async fn list_classes(
    State(notebook): State<Arc<dyn NotebookStore>>,
) -> Result<impl IntoResponse, AppError> {
    let classes = notebook.list_classes().await?;
    Ok(Json(classes))
}

/// Creates a class. Returns 201 Created and the new row.
pub async fn create_class(
    State(notebook): State<Arc<dyn NotebookStore>>,
    Json(payload): Json<CreateClassRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let name = payload.name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("Class name must not be blank".to_string()));
    }

    let class = notebook.create_class(name).await?;
    tracing::info!(class_id = %class.id, "Class created");

    Ok((StatusCode::CREATED, Json(class)))
}

pub async fn get_class(
    State(notebook): State<Arc<dyn NotebookStore>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let class = notebook
        .get_class(id)
        .await?
        .ok_or(AppError::NotFound("Class not found".to_string()))?;
    Ok(Json(class))
}

/// Deletes a class together with its notes and quiz history.
pub async fn delete_class(
    State(notebook): State<Arc<dyn NotebookStore>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    if !notebook.delete_class(id).await? {
        return Err(AppError::NotFound("Class not found".to_string()));
    }
    tracing::info!(class_id = %id, "Class deleted");
    Ok(StatusCode::NO_CONTENT)
}
