// src/config.rs

use std::env;
use dotenvy::dotenv;

/// Maximum number of questions drawn per difficulty level.
pub const QUESTIONS_PER_LEVEL: usize = 5;

/// Difficulty levels, easiest first.
pub const LEVELS: [i64; 4] = [1, 2, 3, 4];

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub rust_log: String,
    pub bind_addr: String,
    /// Base URL that subject and question image paths are resolved against.
    pub media_base_url: String,
    /// Directory served under `/media`.
    pub media_root: String,
    /// Optional JSON catalog loaded when the subjects table is empty.
    pub seed_file: Option<String>,
    pub allowed_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://omr.db?mode=rwc".to_string());

        let rust_log = env::var("RUST_LOG")
            .unwrap_or_else(|_| "info".to_string());

        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8000".to_string());

        let media_base_url = env::var("MEDIA_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:8000/media/".to_string());

        let media_root = env::var("MEDIA_ROOT")
            .unwrap_or_else(|_| "media".to_string());

        let seed_file = env::var("SEED_FILE").ok().filter(|s| !s.is_empty());

        let allowed_origins = env::var("ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Self {
            database_url,
            rust_log,
            bind_addr,
            media_base_url,
            media_root,
            seed_file,
            allowed_origins,
        }
    }
}
