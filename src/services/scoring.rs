// src/services/scoring.rs

//! Answer-sheet scoring.
//!
//! A submission is scored against the questions the student was assigned for
//! each subject. When a subject has no live assignment (the sheet was filled
//! from a stale client or the assignment was never requested), every question
//! of that subject is scored instead, unanswered ones counting as wrong.
//! Answers outside that set never count, so `score <= total` always holds.

use std::collections::{BTreeMap, HashMap};

use sqlx::{QueryBuilder, Sqlite, SqliteExecutor, SqlitePool, types::Json};

use crate::{
    error::AppError,
    models::{question::Question, subject::Subject},
    services::assignment::{
        clear_assignments, fetch_subject, find_assignment, questions_by_ids, questions_for_subject,
    },
};

/// The questions one subject is scored against.
#[derive(Debug, Clone)]
pub struct ScoredSubject {
    pub subject: Subject,
    pub questions: Vec<Question>,
}

/// Result of scoring one answer sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreCard {
    pub score: i64,
    pub total: i64,
    pub subject_scores: BTreeMap<String, i64>,
    /// Ids of every question that was considered, in subject order.
    pub question_ids: Vec<i64>,
}

#[derive(Debug, Clone)]
pub struct SubmissionOutcome {
    pub submission_id: i64,
    pub card: ScoreCard,
}

/// Scores `answers` against the considered questions of every subject.
///
/// This is the only place a score is computed; the stored submission keeps
/// its output verbatim.
pub fn compute_score(subjects: &[ScoredSubject], answers: &HashMap<i64, String>) -> ScoreCard {
    let mut score = 0;
    let mut total = 0;
    let mut subject_scores = BTreeMap::new();
    let mut question_ids = Vec::new();

    for scored in subjects {
        let mut correct = 0;
        for q in &scored.questions {
            if answers.get(&q.id).is_some_and(|selected| q.is_answered_by(selected)) {
                correct += 1;
            }
            total += 1;
            question_ids.push(q.id);
        }
        score += correct;
        // Same-named subjects share a row; the sum still matches `score`.
        *subject_scores.entry(scored.subject.name.clone()).or_insert(0) += correct;
    }

    ScoreCard {
        score,
        total,
        subject_scores,
        question_ids,
    }
}

/// Scores and stores an answer sheet, consuming the student's assignments for
/// the submitted subjects. Runs in one transaction.
pub async fn submit(
    pool: &SqlitePool,
    student_id: i64,
    subject_ids: &[i64],
    answers: HashMap<i64, String>,
) -> Result<SubmissionOutcome, AppError> {
    let mut tx = pool.begin().await?;

    let student = sqlx::query_scalar::<_, i64>("SELECT id FROM students WHERE id = ?")
        .bind(student_id)
        .fetch_optional(&mut *tx)
        .await?;
    if student.is_none() {
        return Err(AppError::NotFound("Student not found".to_string()));
    }

    let mut distinct: Vec<i64> = Vec::with_capacity(subject_ids.len());
    for id in subject_ids {
        if !distinct.contains(id) {
            distinct.push(*id);
        }
    }

    let mut scored = Vec::with_capacity(distinct.len());
    let mut covered = Vec::with_capacity(distinct.len());
    for &subject_id in &distinct {
        let subject = match fetch_subject(&mut *tx, subject_id).await {
            Ok(subject) => subject,
            Err(AppError::NotFound(_)) => {
                tracing::warn!(student_id, subject_id, "Ignoring unknown subject in submission");
                continue;
            }
            Err(e) => return Err(e),
        };

        let questions: Vec<Question> = match find_assignment(&mut *tx, student_id, subject_id).await? {
            Some(assigned) => questions_by_ids(&mut *tx, &assigned)
                .await?
                .into_iter()
                .filter(|q| q.subject_id == subject_id)
                .collect(),
            None => questions_for_subject(&mut *tx, subject_id).await?,
        };

        covered.push(subject_id);
        scored.push(ScoredSubject { subject, questions });
    }

    let cleared = clear_assignments(&mut *tx, student_id, &distinct).await?;
    tracing::debug!(student_id, cleared, "Cleared consumed question sets");

    let card = compute_score(&scored, &answers);

    let submission_id = insert_submission(&mut *tx, student_id, &answers, &card).await?;
    link_subjects(&mut *tx, submission_id, &covered).await?;

    tx.commit().await?;

    tracing::info!(
        student_id,
        submission_id,
        score = card.score,
        total = card.total,
        "Answer sheet scored"
    );

    Ok(SubmissionOutcome { submission_id, card })
}

async fn insert_submission<'e>(
    executor: impl SqliteExecutor<'e>,
    student_id: i64,
    answers: &HashMap<i64, String>,
    card: &ScoreCard,
) -> Result<i64, AppError> {
    let id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO submissions (student_id, answers, question_ids, score, total, subject_scores, submitted_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(student_id)
    .bind(Json(answers))
    .bind(Json(&card.question_ids))
    .bind(card.score)
    .bind(card.total)
    .bind(Json(&card.subject_scores))
    .bind(chrono::Utc::now())
    .fetch_one(executor)
    .await
    .map_err(|e| {
        tracing::error!("Failed to insert submission: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok(id)
}

async fn link_subjects<'e>(
    executor: impl SqliteExecutor<'e>,
    submission_id: i64,
    subject_ids: &[i64],
) -> Result<(), AppError> {
    if subject_ids.is_empty() {
        return Ok(());
    }

    let mut query_builder =
        QueryBuilder::<Sqlite>::new("INSERT INTO submission_subjects (submission_id, subject_id) ");
    query_builder.push_values(subject_ids, |mut row, subject_id| {
        row.push_bind(submission_id).push_bind(*subject_id);
    });
    query_builder.build().execute(executor).await?;

    Ok(())
}
