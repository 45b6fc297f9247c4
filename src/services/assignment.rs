// src/services/assignment.rs

//! Stable per-student question assignment.
//!
//! The first request for a (student, subject) pair draws up to
//! `QUESTIONS_PER_LEVEL` questions from each level and stores the ids in
//! `assigned_question_sets`. Every later request replays that stored set until
//! the student submits, so reloading the exam page never re-rolls questions.

use std::collections::{BTreeMap, HashMap};

use sqlx::{QueryBuilder, Sqlite, SqliteExecutor, SqlitePool, types::Json};

use crate::{
    config::{LEVELS, QUESTIONS_PER_LEVEL},
    error::AppError,
    models::{assignment::AssignedQuestionSet, question::Question, subject::Subject},
    utils::sampler::QuestionSampler,
};

/// The questions handed to a student for one subject.
#[derive(Debug, Clone)]
pub struct SubjectAssignment {
    pub subject: Subject,
    /// Grouped by level, easiest first.
    pub questions: Vec<Question>,
    pub level_counts: BTreeMap<i64, usize>,
    /// Whether this set was replayed from an earlier request.
    pub replayed: bool,
}

/// Returns the question set for every requested subject, sampling on first
/// request and replaying the stored set afterwards.
pub async fn assign(
    pool: &SqlitePool,
    sampler: &dyn QuestionSampler,
    student_id: i64,
    subject_ids: &[i64],
) -> Result<Vec<SubjectAssignment>, AppError> {
    if subject_ids.is_empty() {
        return Err(AppError::BadRequest("No subjects requested".to_string()));
    }

    ensure_student_exists(pool, student_id).await?;

    let mut seen = Vec::with_capacity(subject_ids.len());
    let mut result = Vec::with_capacity(subject_ids.len());

    for &subject_id in subject_ids {
        if seen.contains(&subject_id) {
            continue;
        }
        seen.push(subject_id);

        let subject = fetch_subject(pool, subject_id).await?;
        let assignment = assign_subject(pool, sampler, student_id, subject).await?;
        result.push(assignment);
    }

    Ok(result)
}

async fn assign_subject(
    pool: &SqlitePool,
    sampler: &dyn QuestionSampler,
    student_id: i64,
    subject: Subject,
) -> Result<SubjectAssignment, AppError> {
    if let Some(stored) = find_assignment(pool, student_id, subject.id).await? {
        let questions = resolve_questions(pool, &stored).await?;
        tracing::debug!(
            student_id,
            subject_id = subject.id,
            count = questions.len(),
            "Replaying stored question set"
        );
        return Ok(finish(subject, questions, true));
    }

    let all = questions_for_subject(pool, subject.id).await?;
    let drawn = draw_questions(&all, sampler);
    let drawn_ids: Vec<i64> = drawn.iter().map(|q| q.id).collect();

    // Nothing to pin yet; questions added later must still be drawn.
    if drawn_ids.is_empty() {
        tracing::debug!(student_id, subject_id = subject.id, "Subject has no questions");
        return Ok(finish(subject, drawn, false));
    }

    let questions = match store_assignment(pool, student_id, subject.id, &drawn_ids).await {
        Ok(stored) if stored == drawn_ids => drawn,
        Ok(stored) => {
            // A concurrent request stored its set first; that one is authoritative.
            tracing::info!(
                student_id,
                subject_id = subject.id,
                "Question set already stored by a concurrent request"
            );
            resolve_questions(pool, &stored).await?
        }
        Err(e) => {
            tracing::warn!(
                student_id,
                subject_id = subject.id,
                "Failed to save question set, returning it uncached: {:?}",
                e
            );
            drawn
        }
    };

    tracing::info!(
        student_id,
        subject_id = subject.id,
        count = questions.len(),
        "Assigned new question set"
    );

    Ok(finish(subject, questions, false))
}

fn finish(subject: Subject, mut questions: Vec<Question>, replayed: bool) -> SubjectAssignment {
    // Stable: keeps the stored order inside each level.
    questions.sort_by_key(|q| q.level);
    let level_counts = level_counts(&questions);
    SubjectAssignment {
        subject,
        questions,
        level_counts,
        replayed,
    }
}

/// Draws up to `QUESTIONS_PER_LEVEL` questions per level, each level sampled
/// independently. The result is ordered by level.
pub fn draw_questions(pool: &[Question], sampler: &dyn QuestionSampler) -> Vec<Question> {
    let by_id: HashMap<i64, &Question> = pool.iter().map(|q| (q.id, q)).collect();
    let mut drawn = Vec::new();

    for level in LEVELS {
        let candidates: Vec<i64> = pool
            .iter()
            .filter(|q| q.level == level)
            .map(|q| q.id)
            .collect();
        if candidates.is_empty() {
            continue;
        }

        let picked = sampler.sample(&candidates, QUESTIONS_PER_LEVEL);
        drawn.extend(picked.iter().filter_map(|id| by_id.get(id).map(|q| (*q).clone())));
    }

    drawn
}

/// Counts questions per level. Levels without questions are omitted.
pub fn level_counts(questions: &[Question]) -> BTreeMap<i64, usize> {
    let mut counts = BTreeMap::new();
    for q in questions {
        *counts.entry(q.level).or_insert(0) += 1;
    }
    counts
}

async fn ensure_student_exists(pool: &SqlitePool, student_id: i64) -> Result<(), AppError> {
    sqlx::query_scalar::<_, i64>("SELECT id FROM students WHERE id = ?")
        .bind(student_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Student {} not found", student_id)))?;
    Ok(())
}

pub(crate) async fn fetch_subject<'e>(
    executor: impl SqliteExecutor<'e>,
    subject_id: i64,
) -> Result<Subject, AppError> {
    sqlx::query_as::<_, Subject>(
        "SELECT id, name, image, board, class_level FROM subjects WHERE id = ?",
    )
    .bind(subject_id)
    .fetch_optional(executor)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Subject {} not found", subject_id)))
}

/// Every question of a subject, ordered by level then id.
pub(crate) async fn questions_for_subject<'e>(
    executor: impl SqliteExecutor<'e>,
    subject_id: i64,
) -> Result<Vec<Question>, AppError> {
    let questions = sqlx::query_as::<_, Question>(
        r#"
        SELECT id, subject_id, question_text, option_a, option_b, option_c, option_d,
               question_image, correct_option, level
        FROM questions
        WHERE subject_id = ?
        ORDER BY level, id
        "#,
    )
    .bind(subject_id)
    .fetch_all(executor)
    .await
    .map_err(|e| {
        tracing::error!("Failed to fetch questions for subject {}: {:?}", subject_id, e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok(questions)
}

/// Loads questions by id, in the order of `ids`. Unknown ids are skipped.
pub(crate) async fn questions_by_ids<'e>(
    executor: impl SqliteExecutor<'e>,
    ids: &[i64],
) -> Result<Vec<Question>, AppError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    // Use QueryBuilder for dynamic IN clause
    let mut query_builder = QueryBuilder::<Sqlite>::new(
        "SELECT id, subject_id, question_text, option_a, option_b, option_c, option_d, \
         question_image, correct_option, level FROM questions WHERE id IN (",
    );
    let mut separated = query_builder.separated(",");
    for id in ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated(")");

    let rows: Vec<Question> = query_builder.build_query_as().fetch_all(executor).await?;

    let mut by_id: HashMap<i64, Question> = rows.into_iter().map(|q| (q.id, q)).collect();
    Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
}

async fn resolve_questions(pool: &SqlitePool, ids: &[i64]) -> Result<Vec<Question>, AppError> {
    questions_by_ids(pool, ids).await
}

/// Reads the live assignment for (student, subject), if any.
pub(crate) async fn find_assignment<'e>(
    executor: impl SqliteExecutor<'e>,
    student_id: i64,
    subject_id: i64,
) -> Result<Option<Vec<i64>>, AppError> {
    let stored = sqlx::query_as::<_, AssignedQuestionSet>(
        r#"
        SELECT id, student_id, subject_id, question_ids, created_at, updated_at
        FROM assigned_question_sets
        WHERE student_id = ? AND subject_id = ?
        "#,
    )
    .bind(student_id)
    .bind(subject_id)
    .fetch_optional(executor)
    .await?;

    Ok(stored.map(|set| set.question_ids.0))
}

/// Stores `ids` for (student, subject) unless a set is already there, then
/// returns whichever set is stored. Racing callers all get the same answer.
async fn store_assignment(
    pool: &SqlitePool,
    student_id: i64,
    subject_id: i64,
    ids: &[i64],
) -> Result<Vec<i64>, sqlx::Error> {
    let now = chrono::Utc::now();

    sqlx::query(
        r#"
        INSERT INTO assigned_question_sets (student_id, subject_id, question_ids, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?)
        ON CONFLICT (student_id, subject_id) DO NOTHING
        "#,
    )
    .bind(student_id)
    .bind(subject_id)
    .bind(Json(ids))
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    let Json(stored) = sqlx::query_scalar::<_, Json<Vec<i64>>>(
        "SELECT question_ids FROM assigned_question_sets WHERE student_id = ? AND subject_id = ?",
    )
    .bind(student_id)
    .bind(subject_id)
    .fetch_one(pool)
    .await?;

    Ok(stored)
}

/// Deletes the live assignments of a student for the given subjects.
pub(crate) async fn clear_assignments<'e>(
    executor: impl SqliteExecutor<'e>,
    student_id: i64,
    subject_ids: &[i64],
) -> Result<u64, AppError> {
    if subject_ids.is_empty() {
        return Ok(0);
    }

    let mut query_builder = QueryBuilder::<Sqlite>::new(
        "DELETE FROM assigned_question_sets WHERE student_id = ",
    );
    query_builder.push_bind(student_id);
    query_builder.push(" AND subject_id IN (");
    let mut separated = query_builder.separated(",");
    for id in subject_ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated(")");

    let result = query_builder.build().execute(executor).await?;
    Ok(result.rows_affected())
}
