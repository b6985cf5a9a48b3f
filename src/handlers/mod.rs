// src/handlers/mod.rs

pub mod classes;
pub mod health;
pub mod notes;
pub mod quiz;
pub mod sessions;
pub mod tutor;
