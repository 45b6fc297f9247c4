// src/services/seed.rs

use serde::Deserialize;
use sqlx::SqlitePool;

use crate::models::{question::AnswerOption, subject::Board};

/// Catalog file format: subjects with their questions.
#[derive(Debug, Deserialize)]
pub struct CatalogSeed {
    pub subjects: Vec<SeedSubject>,
}

#[derive(Debug, Deserialize)]
pub struct SeedSubject {
    pub name: String,
    #[serde(default)]
    pub board: Board,
    pub class_level: i64,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub questions: Vec<SeedQuestion>,
}

#[derive(Debug, Deserialize)]
pub struct SeedQuestion {
    pub question_text: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,
    pub correct_option: AnswerOption,
    #[serde(default = "default_level")]
    pub level: i64,
    #[serde(default)]
    pub question_image: Option<String>,
}

fn default_level() -> i64 {
    1
}

/// Loads the catalog file at `path` when no subjects exist yet.
/// Returns the number of subjects inserted.
pub async fn seed_catalog_file(pool: &SqlitePool, path: &str) -> Result<usize, Box<dyn std::error::Error>> {
    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM subjects")
        .fetch_one(pool)
        .await?;
    if existing > 0 {
        tracing::info!("Catalog already present ({} subjects), skipping seed", existing);
        return Ok(0);
    }

    let raw = tokio::fs::read_to_string(path).await?;
    let catalog: CatalogSeed = serde_json::from_str(&raw)?;
    let inserted = insert_catalog(pool, &catalog).await?;
    tracing::info!("Seeded {} subjects from {}", inserted, path);
    Ok(inserted)
}

/// Inserts every subject and question of `catalog` in one transaction.
pub async fn insert_catalog(pool: &SqlitePool, catalog: &CatalogSeed) -> Result<usize, sqlx::Error> {
    let mut tx = pool.begin().await?;

    for subject in &catalog.subjects {
        let subject_id: i64 = sqlx::query_scalar(
            "INSERT INTO subjects (name, image, board, class_level) VALUES (?, ?, ?, ?) RETURNING id",
        )
        .bind(&subject.name)
        .bind(&subject.image)
        .bind(subject.board)
        .bind(subject.class_level)
        .fetch_one(&mut *tx)
        .await?;

        for q in &subject.questions {
            if !(1..=4).contains(&q.level) {
                tracing::warn!(
                    "Skipping question '{}' of {}: level {} out of range",
                    q.question_text,
                    subject.name,
                    q.level
                );
                continue;
            }

            sqlx::query(
                r#"
                INSERT INTO questions
                    (subject_id, question_text, option_a, option_b, option_c, option_d,
                     question_image, correct_option, level)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(subject_id)
            .bind(&q.question_text)
            .bind(&q.option_a)
            .bind(&q.option_b)
            .bind(&q.option_c)
            .bind(&q.option_d)
            .bind(&q.question_image)
            .bind(q.correct_option)
            .bind(q.level)
            .execute(&mut *tx)
            .await?;
        }
    }

    tx.commit().await?;
    Ok(catalog.subjects.len())
}
