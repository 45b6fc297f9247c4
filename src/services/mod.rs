// src/services/mod.rs

pub mod assignment;
pub mod report;
pub mod scoring;
pub mod seed;
