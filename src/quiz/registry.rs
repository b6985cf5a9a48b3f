// src/quiz/registry.rs

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::quiz::PublicQuestion,
    quiz::session::{QuizSession, SessionStatus},
};

pub struct SessionEntry {
    pub class_id: Uuid,
    pub session: QuizSession,
    last_touched: Instant,
}

/// Client-facing snapshot of a session. Answers stay hidden until finalize.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub id: Uuid,
    pub class_id: Uuid,
    pub status: SessionStatus,
    pub questions: Vec<PublicQuestion>,
    pub selections: BTreeMap<usize, usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

impl SessionEntry {
    pub fn view(&self, id: Uuid) -> SessionView {
        SessionView {
            id,
            class_id: self.class_id,
            status: self.session.status(),
            questions: self.session.questions().iter().map(PublicQuestion::from).collect(),
            selections: self.session.selections().clone(),
            last_error: self.session.last_error().map(str::to_string),
        }
    }
}

/// In-memory quiz sessions keyed by id.
///
/// The lock is only held for synchronous state transitions, never across a
/// completion or persistence call.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    inner: Arc<Mutex<HashMap<Uuid, SessionEntry>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self, class_id: Uuid) -> SessionView {
        let id = Uuid::new_v4();
        let entry = SessionEntry {
            class_id,
            session: QuizSession::new(),
            last_touched: Instant::now(),
        };
        let view = entry.view(id);
        self.inner.lock().await.insert(id, entry);
        view
    }

    /// Runs `f` against the session under the lock and marks it as recently used.
    pub async fn with_session<R>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut SessionEntry) -> Result<R, AppError>,
    ) -> Result<R, AppError> {
        let mut sessions = self.inner.lock().await;
        let entry = sessions
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Quiz session {} not found", id)))?;
        entry.last_touched = Instant::now();
        f(entry)
    }

    pub async fn remove(&self, id: Uuid) -> Option<SessionEntry> {
        self.inner.lock().await.remove(&id)
    }

    /// Drops sessions untouched for longer than `max_idle`. Returns how many were dropped.
    pub async fn purge_idle(&self, max_idle: Duration) -> usize {
        let mut sessions = self.inner.lock().await;
        let before = sessions.len();
        sessions.retain(|_, entry| entry.last_touched.elapsed() <= max_idle);
        before - sessions.len()
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
