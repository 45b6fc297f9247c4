// src/models/subject.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Examination board a subject belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum Board {
    #[default]
    Cbse,
    State,
}

impl Board {
    pub fn as_str(&self) -> &'static str {
        match self {
            Board::Cbse => "CBSE",
            Board::State => "STATE",
        }
    }
}

/// Represents the 'subjects' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Subject {
    pub id: i64,
    pub name: String,

    /// Relative media path, resolved to `image_url` when sent to clients.
    pub image: Option<String>,

    pub board: Board,
    pub class_level: i64,
}

/// DTO for listing subjects.
#[derive(Debug, Serialize)]
pub struct SubjectResponse {
    pub id: i64,
    pub name: String,
    pub board: Board,
    pub class_level: i64,
    pub image_url: Option<String>,
}
