// tests/common/mod.rs

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use notes_quiz::{
    completion::{CompletionClient, CompletionRequest},
    config::Config,
    error::AppError,
    routes,
    state::AppState,
    store::MemoryStore,
};

/// What the scripted model does on its next call.
pub enum Reply {
    Text(String),
    Fail(String),
    Hang,
}

/// Completion client that replays canned replies and records every request.
#[derive(Default)]
pub struct ScriptedCompletion {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedCompletion {
    pub fn new(replies: Vec<Reply>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn push(&self, reply: Reply) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for ScriptedCompletion {
    async fn complete(&self, request: CompletionRequest) -> Result<String, AppError> {
        self.requests.lock().unwrap().push(request);
        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(Reply::Text(text)) => Ok(text),
            Some(Reply::Fail(msg)) => Err(AppError::Upstream(msg)),
            Some(Reply::Hang) => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(AppError::Upstream("scripted hang finished".to_string()))
            }
            None => Err(AppError::Upstream("no scripted reply left".to_string())),
        }
    }
}

pub struct TestApp {
    pub address: String,
    pub store: Arc<MemoryStore>,
    pub client: reqwest::Client,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    /// Creates a class and returns its id.
    pub async fn create_class(&self, name: &str) -> String {
        let resp = self
            .client
            .post(self.url("/api/classes"))
            .json(&serde_json::json!({ "name": name }))
            .send()
            .await
            .expect("Failed to create class");
        assert_eq!(resp.status().as_u16(), 201);
        let body: serde_json::Value = resp.json().await.unwrap();
        body["id"].as_str().unwrap().to_string()
    }

    pub async fn add_note(&self, class_id: &str, content: &str) -> serde_json::Value {
        let resp = self
            .client
            .post(self.url(&format!("/api/classes/{}/notes", class_id)))
            .json(&serde_json::json!({ "content": content }))
            .send()
            .await
            .expect("Failed to add note");
        assert_eq!(resp.status().as_u16(), 201);
        resp.json().await.unwrap()
    }
}

/// Spawns the app on a random port with an in-memory store and the given model.
pub async fn spawn_app_with(completion: Arc<dyn CompletionClient>, config: Config) -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let state = AppState::new(store.clone(), store.clone(), completion, config);
    let app = routes::create_router(state);

    // Bind to port 0 to get a random available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    // Spawn the server in the background
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp {
        address,
        store,
        client: reqwest::Client::new(),
    }
}

pub async fn spawn_app(completion: Arc<dyn CompletionClient>) -> TestApp {
    spawn_app_with(completion, Config::for_tests()).await
}

/// Two questions about photosynthesis; the correct options are 0 and 2.
pub fn photosynthesis_quiz() -> String {
    serde_json::json!([
        {
            "question": "What does photosynthesis convert light into?",
            "options": ["Energy", "Sound", "Rock", "Metal"],
            "correct_answer": 0,
            "explanation": "Light energy becomes chemical energy."
        },
        {
            "question": "Which molecule do plants release during photosynthesis?",
            "options": ["Nitrogen", "Carbon dioxide", "Oxygen", "Helium"],
            "correct_answer": 2
        }
    ])
    .to_string()
}
