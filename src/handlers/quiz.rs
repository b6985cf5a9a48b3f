// src/handlers/quiz.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppError,
    models::quiz::{
        GenerateQuizRequest, GenerateQuizResponse, HistoryQuery, NewQuizResult, QuizResult,
        QuizResultResponse, SaveQuizResultRequest, ScheduleQuizRequest,
    },
    state::AppState,
};

fn to_responses(results: Vec<QuizResult>) -> Vec<QuizResultResponse> {
    results.into_iter().map(Into::into).collect()
}

/// Generates quiz questions from raw note text without creating a session.
///
/// * 400 when `notes` is missing or blank.
/// * 500 when the model key is missing, the model call fails, or its output cannot be parsed.
pub async fn generate_quiz(
    State(state): State<AppState>,
    Json(req): Json<GenerateQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    let notes = req
        .notes
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or(AppError::Validation("Notes are required".to_string()))?;

    let questions = state.generator.generate(notes).await?;
    Ok(Json(GenerateQuizResponse { questions }))
}

/// Full quiz history, newest first. `?status=completed|scheduled` narrows it.
pub async fn list_results(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<impl IntoResponse, AppError> {
    let results = state.results.list_all(query.status).await?;
    Ok(Json(to_responses(results)))
}

/// Quiz history of one class, newest first.
pub async fn list_class_results(
    State(state): State<AppState>,
    Path(class_id): Path<Uuid>,
    Query(query): Query<HistoryQuery>,
) -> Result<impl IntoResponse, AppError> {
    let results = state.results.list_by_class(class_id, query.status).await?;
    Ok(Json(to_responses(results)))
}

/// Stores a quiz that the client graded itself.
///
/// The score must match the records, so history stays self-consistent.
pub async fn save_result(
    State(state): State<AppState>,
    Path(class_id): Path<Uuid>,
    Json(payload): Json<SaveQuizResultRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    payload.check_consistency().map_err(AppError::Validation)?;

    state
        .notebook
        .get_class(class_id)
        .await?
        .ok_or(AppError::NotFound("Class not found".to_string()))?;

    let new_result = NewQuizResult::completed(class_id, payload.score, payload.questions);
    let saved = state.results.save(new_result).await?;
    tracing::info!(result_id = %saved.id, class_id = %class_id, "Quiz result stored");

    Ok((StatusCode::CREATED, Json(QuizResultResponse::from(saved))))
}

/// Sets a reminder to take a quiz for the class. The entry shows up in history with
/// `status: "scheduled"`.
pub async fn schedule_quiz(
    State(state): State<AppState>,
    Path(class_id): Path<Uuid>,
    Json(payload): Json<ScheduleQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.scheduled_date <= chrono::Utc::now() {
        return Err(AppError::Validation(
            "Scheduled date must be in the future".to_string(),
        ));
    }

    state
        .notebook
        .get_class(class_id)
        .await?
        .ok_or(AppError::NotFound("Class not found".to_string()))?;

    let saved = state
        .results
        .save(NewQuizResult::scheduled(class_id, payload.scheduled_date))
        .await?;
    tracing::info!(
        result_id = %saved.id,
        class_id = %class_id,
        scheduled_date = %payload.scheduled_date,
        "Quiz reminder set"
    );

    Ok((StatusCode::CREATED, Json(QuizResultResponse::from(saved))))
}
