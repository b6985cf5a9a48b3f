// src/models/mod.rs

pub mod class;
pub mod note;
pub mod quiz;
pub mod tutor;
