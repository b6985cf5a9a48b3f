// src/state.rs

use std::sync::Arc;

use axum::extract::FromRef;

use crate::{
    completion::CompletionClient,
    config::Config,
    quiz::{QuizGenerator, SessionRegistry},
    store::{NotebookStore, ResultStore, Timed},
};

#[derive(Clone)]
pub struct AppState {
    pub notebook: Arc<dyn NotebookStore>,
    pub results: Arc<dyn ResultStore>,
    pub completion: Arc<dyn CompletionClient>,
    pub generator: QuizGenerator,
    pub sessions: SessionRegistry,
    pub config: Config,
}

impl AppState {
    /// Wires the state from its collaborators; the quiz generator shares `completion`.
    /// Both stores are bounded by `config.persistence_timeout`.
    pub fn new(
        notebook: Arc<dyn NotebookStore>,
        results: Arc<dyn ResultStore>,
        completion: Arc<dyn CompletionClient>,
        config: Config,
    ) -> Self {
        let generator = QuizGenerator::from_config(completion.clone(), &config);
        let limit = config.persistence_timeout;
        Self {
            notebook: Arc::new(Timed::new(notebook, limit)),
            results: Arc::new(Timed::new(results, limit)),
            completion,
            generator,
            sessions: SessionRegistry::new(),
            config,
        }
    }
}

impl FromRef<AppState> for Arc<dyn NotebookStore> {
    fn from_ref(state: &AppState) -> Self {
        state.notebook.clone()
    }
}

impl FromRef<AppState> for Arc<dyn ResultStore> {
    fn from_ref(state: &AppState) -> Self {
        state.results.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
