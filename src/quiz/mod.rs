// src/quiz/mod.rs

pub mod generator;
pub mod parser;
pub mod prompt;
pub mod registry;
pub mod session;

pub use generator::QuizGenerator;
pub use registry::SessionRegistry;
pub use session::{QuizOutcome, QuizSession, SessionStatus};
