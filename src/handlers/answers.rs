// src/handlers/answers.rs

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    response::IntoResponse,
};
use sqlx::SqlitePool;

use crate::{
    error::AppError,
    models::submission::{SubmitAnswersRequest, SubmitAnswersResponse},
    services::scoring,
};

/// Scores and stores an answer sheet.
///
/// * Consumes the student's question sets for the submitted subjects.
/// * Unknown students are a client error (400), not a 404.
pub async fn submit_answers(
    State(pool): State<SqlitePool>,
    payload: Result<Json<SubmitAnswersRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = payload?;
    let outcome = scoring::submit(&pool, req.student_id, &req.subject_ids, req.answers)
        .await
        .map_err(|e| match e {
            AppError::NotFound(msg) => AppError::BadRequest(msg),
            other => other,
        })?;

    Ok(Json(SubmitAnswersResponse {
        message: "Answers submitted successfully".to_string(),
        score: outcome.card.score,
        total: outcome.card.total,
        submission_id: outcome.submission_id,
    }))
}
