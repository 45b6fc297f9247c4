// src/services/report.rs

//! Read-only performance breakdown of a stored submission.
//!
//! Feeds both the JSON breakdown endpoint and the PDF renderer. Nothing here
//! writes to the database.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use sqlx::SqlitePool;

use crate::{
    config::LEVELS,
    error::AppError,
    models::{question::Question, student::Student, subject::Subject, submission::Submission},
    services::assignment::questions_by_ids,
};

const LEVEL_LABELS: [&str; 4] = ["Basic", "Intermediate", "Advanced", "Expert"];

#[derive(Debug, Clone, Serialize)]
pub struct StudentSummary {
    pub id: i64,
    pub name: String,
    pub class_level: String,
    pub school: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LevelBreakdown {
    pub level: i64,
    pub label: &'static str,
    pub correct: i64,
    pub total: i64,
    pub percentage: f64,
    pub rating: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubjectBreakdown {
    pub subject_id: i64,
    pub subject_name: String,
    pub correct: i64,
    pub total: i64,
    pub percentage: f64,
    pub levels: Vec<LevelBreakdown>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmissionBreakdown {
    pub submission_id: i64,
    pub student: StudentSummary,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
    pub score: i64,
    pub total: i64,
    pub percentage: f64,
    pub performance: &'static str,
    pub subjects: Vec<SubjectBreakdown>,
}

/// Loads a submission and computes its per-subject, per-level breakdown.
pub async fn breakdown(pool: &SqlitePool, submission_id: i64) -> Result<SubmissionBreakdown, AppError> {
    let submission = sqlx::query_as::<_, Submission>(
        r#"
        SELECT id, student_id, answers, question_ids, score, total, subject_scores, submitted_at
        FROM submissions
        WHERE id = ?
        "#,
    )
    .bind(submission_id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound("Submission not found".to_string()))?;

    let student = sqlx::query_as::<_, Student>(
        r#"
        SELECT id, name, school, father_name, mother_name, address, favourite_subject,
               class_level, stream, father_occupation, mother_occupation, phone, created_at
        FROM students
        WHERE id = ?
        "#,
    )
    .bind(submission.student_id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound("Student not found".to_string()))?;

    let subjects = sqlx::query_as::<_, Subject>(
        r#"
        SELECT s.id, s.name, s.image, s.board, s.class_level
        FROM subjects s
        JOIN submission_subjects ss ON ss.subject_id = s.id
        WHERE ss.submission_id = ?
        ORDER BY s.id
        "#,
    )
    .bind(submission_id)
    .fetch_all(pool)
    .await?;

    let questions = questions_by_ids(pool, &submission.question_ids).await?;

    Ok(build_breakdown(&submission, &student, &subjects, &questions))
}

/// Builds the breakdown from already loaded records.
pub fn build_breakdown(
    submission: &Submission,
    student: &Student,
    subjects: &[Subject],
    questions: &[Question],
) -> SubmissionBreakdown {
    let considered: HashSet<i64> = submission.question_ids.iter().copied().collect();
    let answers: &HashMap<i64, String> = &submission.answers;

    let subjects = subjects
        .iter()
        .map(|subject| {
            let mut level_correct = [0i64; 4];
            let mut level_total = [0i64; 4];

            for q in questions
                .iter()
                .filter(|q| q.subject_id == subject.id && considered.contains(&q.id))
            {
                let Some(idx) = level_index(q.level) else { continue };
                level_total[idx] += 1;
                if answers.get(&q.id).is_some_and(|a| q.is_answered_by(a)) {
                    level_correct[idx] += 1;
                }
            }

            let levels: Vec<LevelBreakdown> = LEVELS
                .iter()
                .enumerate()
                .map(|(i, &level)| {
                    let percentage = percentage(level_correct[i], level_total[i]);
                    LevelBreakdown {
                        level,
                        label: LEVEL_LABELS[i],
                        correct: level_correct[i],
                        total: level_total[i],
                        percentage,
                        rating: level_rating(percentage),
                    }
                })
                .collect();

            let strengths = levels
                .iter()
                .filter(|l| l.percentage >= 70.0)
                .map(|l| format!("Level {} ({})", l.level, l.label))
                .collect();
            // Empty levels read as 0% and are listed here too.
            let weaknesses = levels
                .iter()
                .filter(|l| l.percentage < 50.0)
                .map(|l| format!("Level {} ({})", l.level, l.label))
                .collect();

            let correct = level_correct.iter().sum();
            let total = level_total.iter().sum();

            SubjectBreakdown {
                subject_id: subject.id,
                subject_name: subject.name.clone(),
                correct,
                total,
                percentage: percentage(correct, total),
                levels,
                strengths,
                weaknesses,
            }
        })
        .collect();

    let overall = percentage(submission.score, submission.total);

    SubmissionBreakdown {
        submission_id: submission.id,
        student: StudentSummary {
            id: student.id,
            name: student.name.clone(),
            class_level: student.class_level.clone(),
            school: student.school.clone(),
        },
        submitted_at: submission.submitted_at,
        score: submission.score,
        total: submission.total,
        percentage: overall,
        performance: performance_description(overall),
        subjects,
    }
}

fn level_index(level: i64) -> Option<usize> {
    LEVELS.iter().position(|&l| l == level)
}

/// Percentage rounded to two decimals; 0 when there is nothing to score.
pub fn percentage(correct: i64, total: i64) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    let raw = correct as f64 / total as f64 * 100.0;
    (raw * 100.0).round() / 100.0
}

pub fn level_rating(percentage: f64) -> &'static str {
    if percentage >= 80.0 {
        "Excellent"
    } else if percentage >= 60.0 {
        "Good"
    } else if percentage >= 40.0 {
        "Satisfactory"
    } else {
        "Needs Improvement"
    }
}

pub fn performance_description(percentage: f64) -> &'static str {
    if percentage >= 90.0 {
        "Outstanding performance! The student demonstrates exceptional understanding across subjects."
    } else if percentage >= 80.0 {
        "Excellent performance! The student shows strong comprehension of most concepts."
    } else if percentage >= 70.0 {
        "Very good performance. The student has a good grasp of the material with some areas for improvement."
    } else if percentage >= 60.0 {
        "Good performance. The student understands core concepts but has several areas to strengthen."
    } else if percentage >= 50.0 {
        "Satisfactory performance. The student has basic understanding but needs significant improvement."
    } else {
        "Needs improvement. The student requires additional support to meet expected standards."
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{question::AnswerOption, subject::Board};
    use sqlx::types::Json;
    use std::collections::BTreeMap;

    fn student() -> Student {
        Student {
            id: 1,
            name: "Asha Rao".to_string(),
            school: "Green Valley High".to_string(),
            father_name: "Ravi".to_string(),
            mother_name: "Meena".to_string(),
            address: "Pune".to_string(),
            favourite_subject: "Math".to_string(),
            class_level: "10".to_string(),
            stream: "Science".to_string(),
            father_occupation: String::new(),
            mother_occupation: String::new(),
            phone: "9876543210".to_string(),
            created_at: chrono::Utc::now(),
        }
    }

    fn question(id: i64, level: i64, correct: AnswerOption) -> Question {
        Question {
            id,
            subject_id: 1,
            question_text: format!("Question {}", id),
            option_a: "a".to_string(),
            option_b: "b".to_string(),
            option_c: "c".to_string(),
            option_d: "d".to_string(),
            question_image: None,
            correct_option: correct,
            level,
        }
    }

    #[test]
    fn test_percentage_rounding() {
        assert_eq!(percentage(1, 3), 33.33);
        assert_eq!(percentage(2, 3), 66.67);
        assert_eq!(percentage(0, 0), 0.0);
    }

    #[test]
    fn test_bands() {
        assert_eq!(level_rating(80.0), "Excellent");
        assert_eq!(level_rating(79.99), "Good");
        assert_eq!(level_rating(40.0), "Satisfactory");
        assert_eq!(level_rating(0.0), "Needs Improvement");
        assert!(performance_description(95.0).starts_with("Outstanding"));
        assert!(performance_description(49.0).starts_with("Needs improvement"));
    }

    #[test]
    fn test_breakdown_by_level() {
        let questions = vec![
            question(1, 1, AnswerOption::A),
            question(2, 1, AnswerOption::B),
            question(3, 2, AnswerOption::C),
            question(4, 4, AnswerOption::D),
        ];
        let answers: HashMap<i64, String> = [(1, "A"), (2, "B"), (3, "A"), (4, "D")]
            .into_iter()
            .map(|(k, v)| (k, v.to_string()))
            .collect();
        let submission = Submission {
            id: 7,
            student_id: 1,
            answers: Json(answers),
            question_ids: Json(vec![1, 2, 3, 4]),
            score: 3,
            total: 4,
            subject_scores: Json(BTreeMap::from([("Math".to_string(), 3)])),
            submitted_at: chrono::Utc::now(),
        };
        let subject = Subject {
            id: 1,
            name: "Math".to_string(),
            image: None,
            board: Board::Cbse,
            class_level: 10,
        };

        let b = build_breakdown(&submission, &student(), &[subject], &questions);

        assert_eq!(b.percentage, 75.0);
        let math = &b.subjects[0];
        assert_eq!((math.correct, math.total), (3, 4));
        assert_eq!((math.levels[0].correct, math.levels[0].total), (2, 2));
        assert_eq!((math.levels[1].correct, math.levels[1].total), (0, 1));
        assert_eq!(math.levels[2].total, 0);
        assert_eq!(math.levels[3].percentage, 100.0);
        assert_eq!(math.strengths, vec!["Level 1 (Basic)", "Level 4 (Expert)"]);
        assert_eq!(
            math.weaknesses,
            vec!["Level 2 (Intermediate)", "Level 3 (Advanced)"]
        );
    }
}
