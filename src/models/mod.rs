// src/models/mod.rs

pub mod assignment;
pub mod question;
pub mod student;
pub mod subject;
pub mod submission;
