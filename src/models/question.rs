// src/models/question.rs

use std::fmt;

use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;

/// One of the four answer bubbles on the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type)]
pub enum AnswerOption {
    A,
    B,
    C,
    D,
}

impl AnswerOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnswerOption::A => "A",
            AnswerOption::B => "B",
            AnswerOption::C => "C",
            AnswerOption::D => "D",
        }
    }
}

impl fmt::Display for AnswerOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Represents the 'questions' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,
    pub subject_id: i64,

    /// The text content of the question.
    pub question_text: String,

    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,

    /// Relative media path of an optional illustration.
    pub question_image: Option<String>,

    /// The correct answer key.
    pub correct_option: AnswerOption,

    /// Difficulty tier, 1 (basic) to 4 (expert).
    pub level: i64,
}

impl Question {
    /// Whether `selected` is the correct option for this question.
    /// Strict matching: "a" does not count for "A".
    pub fn is_answered_by(&self, selected: &str) -> bool {
        selected == self.correct_option.as_str()
    }
}

/// Option texts keyed by their letter.
#[derive(Debug, Serialize)]
pub struct QuestionOptions {
    #[serde(rename = "A")]
    pub a: String,
    #[serde(rename = "B")]
    pub b: String,
    #[serde(rename = "C")]
    pub c: String,
    #[serde(rename = "D")]
    pub d: String,
}

/// DTO for sending question to client (excludes the correct option).
#[derive(Debug, Serialize)]
pub struct PublicQuestion {
    pub id: i64,
    pub question_text: String,
    pub level: i64,
    pub options: QuestionOptions,
    pub question_image: Option<String>,
}

impl PublicQuestion {
    pub fn from_question(q: Question, media_base_url: &str) -> Self {
        let question_image = crate::utils::media::media_url(media_base_url, q.question_image.as_deref());
        Self {
            id: q.id,
            question_text: q.question_text,
            level: q.level,
            options: QuestionOptions {
                a: q.option_a,
                b: q.option_b,
                c: q.option_c,
                d: q.option_d,
            },
            question_image,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(correct: AnswerOption) -> Question {
        Question {
            id: 1,
            subject_id: 1,
            question_text: "2 + 2 = ?".to_string(),
            option_a: "4".to_string(),
            option_b: "3".to_string(),
            option_c: "5".to_string(),
            option_d: "22".to_string(),
            question_image: None,
            correct_option: correct,
            level: 1,
        }
    }

    #[test]
    fn test_public_question_hides_correct_option() {
        let public = PublicQuestion::from_question(question(AnswerOption::A), "http://localhost/media/");
        let json = serde_json::to_value(&public).unwrap();
        assert!(json.get("correct_option").is_none());
        assert_eq!(json["options"]["A"], "4");
        assert_eq!(json["options"]["D"], "22");
    }

    #[test]
    fn test_is_answered_by_is_strict() {
        let q = question(AnswerOption::C);
        assert!(q.is_answered_by("C"));
        assert!(!q.is_answered_by("c"));
        assert!(!q.is_answered_by("A"));
    }
}
