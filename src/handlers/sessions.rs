// src/handlers/sessions.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use crate::{
    error::AppError,
    models::quiz::{FinalizeResponse, NewQuizResult, SelectAnswerRequest},
    quiz::prompt::join_notes,
    state::AppState,
};

/// Opens an empty quiz session for a class.
pub async fn create_session(
    State(state): State<AppState>,
    Path(class_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    state
        .notebook
        .get_class(class_id)
        .await?
        .ok_or(AppError::NotFound("Class not found".to_string()))?;

    let view = state.sessions.create(class_id).await;
    tracing::info!(session_id = %view.id, class_id = %class_id, "Quiz session opened");

    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let view = state
        .sessions
        .with_session(id, |entry| Ok(entry.view(id)))
        .await?;
    Ok(Json(view))
}

/// Generates (or regenerates) the questions of a session from its class's notes.
///
/// * 400 if the class has no notes.
/// * 409 if a generation is already running or the session is finalized.
/// * On model failure the session returns to `empty` and the error is reported.
pub async fn generate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let class_id = state
        .sessions
        .with_session(id, |entry| Ok(entry.class_id))
        .await?;

    let notes = state.notebook.list_notes(class_id).await?;
    let context = join_notes(notes.iter().map(|n| n.content.as_str()));
    if context.is_empty() {
        return Err(AppError::Validation(
            "Please add some notes first before generating a quiz.".to_string(),
        ));
    }

    state
        .sessions
        .with_session(id, |entry| entry.session.begin_generation())
        .await?;

    // Detached: the session must leave `Generating` even if the client disconnects.
    let sessions = state.sessions.clone();
    let generator = state.generator.clone();
    let task = tokio::spawn(async move {
        let outcome = generator.generate(&context).await;
        sessions
            .with_session(id, |entry| {
                entry.session.complete_generation(outcome)?;
                Ok(entry.view(id))
            })
            .await
    });

    let view = task
        .await
        .map_err(|e| AppError::Internal(format!("generation task failed: {}", e)))??;

    Ok(Json(view))
}

/// Records the chosen option for one question.
pub async fn select_answer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<SelectAnswerRequest>,
) -> Result<impl IntoResponse, AppError> {
    let view = state
        .sessions
        .with_session(id, |entry| {
            entry.session.select(req.question_index, req.option_index)?;
            Ok(entry.view(id))
        })
        .await?;
    Ok(Json(view))
}

/// Scores the session, discards it, and stores the result.
///
/// A storage failure does not undo the finalization: the score is still returned,
/// with `saved: false`.
pub async fn finalize(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let (class_id, outcome, questions) = state
        .sessions
        .with_session(id, |entry| {
            let outcome = entry.session.finalize()?;
            Ok((entry.class_id, outcome, entry.session.questions().to_vec()))
        })
        .await?;

    // A retake opens a new session.
    state.sessions.remove(id).await;

    let new_result =
        NewQuizResult::completed(class_id, outcome.score as i32, outcome.records.clone());

    let (saved, result_id) = match state.results.save(new_result).await {
        Ok(result) => {
            tracing::info!(
                session_id = %id,
                result_id = %result.id,
                score = outcome.score,
                total = outcome.total,
                "Quiz finalized"
            );
            (true, Some(result.id))
        }
        Err(e) => {
            tracing::error!(session_id = %id, "Quiz finalized but result was not stored: {}", e);
            (false, None)
        }
    };

    Ok(Json(FinalizeResponse {
        score: outcome.score,
        total: outcome.total,
        percentage: outcome.percentage,
        records: outcome.records,
        questions,
        saved,
        result_id,
    }))
}

/// Cancels a session.
pub async fn cancel(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    state
        .sessions
        .remove(id)
        .await
        .ok_or(AppError::NotFound(format!("Quiz session {} not found", id)))?;
    Ok(StatusCode::NO_CONTENT)
}
