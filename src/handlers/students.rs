// src/handlers/students.rs

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    error::AppError,
    models::student::{CreateStudentRequest, Student},
    utils::html::strip_html,
};

/// Registers a student from the profile form.
///
/// Returns 201 Created with the stored profile, or 400 with per-field
/// validation errors.
pub async fn register_student(
    State(pool): State<SqlitePool>,
    payload: Result<Json<CreateStudentRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let student = sqlx::query_as::<_, Student>(
        r#"
        INSERT INTO students
            (name, school, father_name, mother_name, address, favourite_subject,
             class_level, stream, father_occupation, mother_occupation, phone, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING id, name, school, father_name, mother_name, address, favourite_subject,
                  class_level, stream, father_occupation, mother_occupation, phone, created_at
        "#,
    )
    .bind(strip_html(payload.name.trim()))
    .bind(strip_html(payload.school.trim()))
    .bind(strip_html(payload.father_name.trim()))
    .bind(strip_html(payload.mother_name.trim()))
    .bind(strip_html(payload.address.trim()))
    .bind(strip_html(payload.favourite_subject.trim()))
    .bind(payload.class_level.trim())
    .bind(strip_html(payload.stream.trim()))
    .bind(strip_html(payload.father_occupation.trim()))
    .bind(strip_html(payload.mother_occupation.trim()))
    .bind(payload.phone.trim())
    .bind(chrono::Utc::now())
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to register student: {:?}", e);
        AppError::from(e)
    })?;

    tracing::info!(student_id = student.id, "Student registered");

    Ok((StatusCode::CREATED, Json(student)))
}
