// src/handlers/subjects.rs

use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::{
    config::Config,
    error::AppError,
    models::subject::{Subject, SubjectResponse},
    utils::media::media_url,
};

/// Query parameters for listing subjects.
/// Empty values are treated as absent.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub class_level: Option<String>,
    pub board: Option<String>,
}

/// Lists subjects, optionally filtered by class level and (case-insensitive) board.
pub async fn list_subjects(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, AppError> {
    let class_level = match params.class_level.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(raw.parse::<i64>().map_err(|_| {
            AppError::BadRequest(format!("Invalid class_level '{}'", raw))
        })?),
    };
    let board = params
        .board
        .map(|b| b.trim().to_string())
        .filter(|b| !b.is_empty());

    let subjects = sqlx::query_as::<_, Subject>(
        r#"
        SELECT id, name, image, board, class_level
        FROM subjects
        WHERE (?1 IS NULL OR class_level = ?1)
          AND (?2 IS NULL OR UPPER(board) = UPPER(?2))
        ORDER BY id
        "#,
    )
    .bind(class_level)
    .bind(board)
    .fetch_all(&pool)
    .await?;

    let subjects: Vec<SubjectResponse> = subjects
        .into_iter()
        .map(|s| SubjectResponse {
            image_url: media_url(&config.media_base_url, s.image.as_deref()),
            id: s.id,
            name: s.name,
            board: s.board,
            class_level: s.class_level,
        })
        .collect();

    Ok(Json(subjects))
}
