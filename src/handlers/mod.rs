// src/handlers/mod.rs

pub mod answers;
pub mod questions;
pub mod reports;
pub mod students;
pub mod subjects;
