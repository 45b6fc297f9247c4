// src/models/submission.rs

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, types::Json};

/// Represents the 'submissions' table in the database.
/// Written once when the student hands in the answer sheet.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Submission {
    pub id: i64,
    pub student_id: i64,

    /// Question id -> selected option, exactly as submitted.
    pub answers: Json<HashMap<i64, String>>,

    /// Questions the score was computed against.
    pub question_ids: Json<Vec<i64>>,

    pub score: i64,
    pub total: i64,

    /// Subject name -> correct answers in that subject.
    pub subject_scores: Json<BTreeMap<String, i64>>,

    pub submitted_at: chrono::DateTime<chrono::Utc>,
}

/// DTO for submitting an answer sheet.
#[derive(Debug, Deserialize)]
pub struct SubmitAnswersRequest {
    pub student_id: i64,
    pub subject_ids: Vec<i64>,

    /// User's answers map.
    /// Key: Question ID (i64)
    /// Value: User's selected option (String)
    #[serde(default)]
    pub answers: HashMap<i64, String>,
}

#[derive(Debug, Serialize)]
pub struct SubmitAnswersResponse {
    pub message: String,
    pub score: i64,
    pub total: i64,
    pub submission_id: i64,
}
