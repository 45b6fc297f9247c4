// src/handlers/questions.rs

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    response::IntoResponse,
};
use sqlx::SqlitePool;

use crate::{
    config::Config,
    error::AppError,
    models::{
        assignment::{AssignQuestionsRequest, SubjectQuestionsResponse},
        question::PublicQuestion,
        subject::Subject,
    },
    services::assignment,
    utils::sampler::QuestionSampler,
};

/// Hands out the question set for each requested subject.
///
/// The first call for a (student, subject) pair samples up to 5 questions per
/// level; later calls return the same set until the student submits.
/// Response is keyed by subject name; names shared by several requested
/// subjects are qualified with the board (and the id if still ambiguous).
pub async fn assign_questions(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
    State(sampler): State<Arc<dyn QuestionSampler>>,
    payload: Result<Json<AssignQuestionsRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = payload?;
    let assignments =
        assignment::assign(&pool, sampler.as_ref(), req.student_id, &req.subject_ids).await?;

    let keys = {
        let subjects: Vec<&Subject> = assignments.iter().map(|a| &a.subject).collect();
        response_keys(&subjects)
    };

    let mut result = BTreeMap::new();
    for (key, a) in keys.into_iter().zip(assignments) {
        let questions = a
            .questions
            .into_iter()
            .map(|q| PublicQuestion::from_question(q, &config.media_base_url))
            .collect();
        result.insert(
            key,
            SubjectQuestionsResponse {
                questions,
                level_counts: a.level_counts,
            },
        );
    }

    Ok(Json(result))
}

/// One distinct response key per subject, in input order.
fn response_keys(subjects: &[&Subject]) -> Vec<String> {
    let same_name = |s: &Subject| subjects.iter().filter(|o| o.name == s.name).count();
    let same_board = |s: &Subject| {
        subjects
            .iter()
            .filter(|o| o.name == s.name && o.board == s.board)
            .count()
    };

    subjects
        .iter()
        .map(|s| {
            if same_name(*s) == 1 {
                s.name.clone()
            } else if same_board(*s) == 1 {
                format!("{} ({})", s.name, s.board.as_str())
            } else {
                format!("{} ({} #{})", s.name, s.board.as_str(), s.id)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::subject::Board;

    fn subject(id: i64, name: &str, board: Board) -> Subject {
        Subject {
            id,
            name: name.to_string(),
            image: None,
            board,
            class_level: 10,
        }
    }

    #[test]
    fn test_unique_names_are_kept() {
        let (math, art) = (subject(1, "Math", Board::Cbse), subject(3, "Art", Board::Cbse));
        assert_eq!(response_keys(&[&math, &art]), vec!["Math", "Art"]);
    }

    #[test]
    fn test_shared_names_are_qualified() {
        let a = subject(1, "Math", Board::Cbse);
        let b = subject(2, "Math", Board::State);
        let c = subject(4, "Math", Board::State);
        let art = subject(3, "Art", Board::Cbse);

        let keys = response_keys(&[&a, &b, &c, &art]);
        assert_eq!(keys, vec!["Math (CBSE)", "Math (STATE #2)", "Math (STATE #4)", "Art"]);
    }
}
