// src/models/assignment.rs

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, types::Json};

use crate::models::question::PublicQuestion;

/// Represents the 'assigned_question_sets' table.
/// The question set a student was given for one subject, kept until they submit.
#[derive(Debug, Clone, FromRow)]
pub struct AssignedQuestionSet {
    pub id: i64,
    pub student_id: i64,
    pub subject_id: i64,

    /// Ordered question ids, stored as a JSON array.
    pub question_ids: Json<Vec<i64>>,

    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// DTO for requesting question sets.
#[derive(Debug, Deserialize)]
pub struct AssignQuestionsRequest {
    pub student_id: i64,
    pub subject_ids: Vec<i64>,
}

/// Questions handed out for one subject.
#[derive(Debug, Serialize)]
pub struct SubjectQuestionsResponse {
    pub questions: Vec<PublicQuestion>,

    /// How many questions were handed out per level; empty levels are omitted.
    pub level_counts: BTreeMap<i64, usize>,
}
