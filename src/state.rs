use std::sync::Arc;

use crate::config::Config;
use crate::utils::sampler::QuestionSampler;
use axum::extract::FromRef;
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Config,
    pub sampler: Arc<dyn QuestionSampler>,
}

impl FromRef<AppState> for SqlitePool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for Arc<dyn QuestionSampler> {
    fn from_ref(state: &AppState) -> Self {
        state.sampler.clone()
    }
}
