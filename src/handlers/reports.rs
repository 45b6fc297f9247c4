// src/handlers/reports.rs

use axum::{
    Json,
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};
use sqlx::SqlitePool;

use crate::{error::AppError, services::report, utils::pdf::render_report};

/// Returns the per-subject, per-level breakdown of a submission as JSON.
pub async fn get_breakdown(
    State(pool): State<SqlitePool>,
    Path(submission_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let breakdown = report::breakdown(&pool, submission_id).await?;
    Ok(Json(breakdown))
}

/// Downloads the PDF performance report of a submission.
pub async fn download_report(
    State(pool): State<SqlitePool>,
    Path(submission_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let breakdown = report::breakdown(&pool, submission_id).await?;
    let filename = format!("{}_performance_report.pdf", file_stem(&breakdown.student.name));

    let bytes = render_off_thread(move || render_report(&breakdown)).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        bytes,
    ))
}

/// Runs a renderer on the blocking pool. A renderer error or panic becomes
/// `AppError::Report`.
async fn render_off_thread<F>(render: F) -> Result<Vec<u8>, AppError>
where
    F: FnOnce() -> Result<Vec<u8>, AppError> + Send + 'static,
{
    tokio::task::spawn_blocking(render)
        .await
        .map_err(|e| AppError::Report(e.to_string()))?
        .map_err(|e| match e {
            AppError::Report(msg) => AppError::Report(msg),
            other => AppError::Report(other.to_string()),
        })
}

/// Header-safe file name stem: spaces become underscores, anything outside
/// ASCII alphanumerics, '-' and '_' is dropped.
fn file_stem(name: &str) -> String {
    let stem: String = name
        .trim()
        .chars()
        .map(|c| if c == ' ' { '_' } else { c })
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect();
    if stem.is_empty() { "student".to_string() } else { stem }
}
