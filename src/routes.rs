// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::{get, post, put},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{classes, health, notes, quiz, sessions, tutor},
    state::AppState,
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (classes, notes, quiz, sessions, tutor).
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (stores, completion client, session registry).
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin([
            HeaderValue::from_static("http://localhost:3000"),
            HeaderValue::from_static("http://127.0.0.1:3000"),
        ])
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    let class_routes = Router::new()
        .route("/", get(classes::list_classes).post(classes::create_class))
        .route("/{id}", get(classes::get_class).delete(classes::delete_class))
        .route("/{id}/notes", get(notes::list_notes).post(notes::create_note))
        .route(
            "/{id}/quiz-results",
            get(quiz::list_class_results).post(quiz::save_result),
        )
        .route("/{id}/quiz-schedules", post(quiz::schedule_quiz))
        .route("/{id}/quiz-sessions", post(sessions::create_session));

    let note_routes = Router::new().route(
        "/{id}",
        get(notes::get_note)
            .put(notes::update_note)
            .delete(notes::delete_note),
    );

    let session_routes = Router::new()
        .route("/{id}", get(sessions::get_session).delete(sessions::cancel))
        .route("/{id}/generate", post(sessions::generate))
        .route("/{id}/answers", put(sessions::select_answer))
        .route("/{id}/finalize", post(sessions::finalize));

    Router::new()
        .route("/api/health", get(health::health))
        .route("/api/generate-quiz", post(quiz::generate_quiz))
        .route("/api/ai-tutor", post(tutor::chat))
        .route("/api/quiz-results", get(quiz::list_results))
        .nest("/api/classes", class_routes)
        .nest("/api/notes", note_routes)
        .nest("/api/quiz-sessions", session_routes)
        // Global Middleware (applied from outside in)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
