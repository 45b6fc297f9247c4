// tests/common/mod.rs

#![allow(dead_code)]

use std::sync::Arc;

use omr_backend::{
    config::Config,
    db,
    models::{question::AnswerOption, subject::Board},
    routes,
    services::seed::{CatalogSeed, SeedQuestion, SeedSubject, insert_catalog},
    state::AppState,
    utils::sampler::{QuestionSampler, ThreadRngSampler},
};
use sqlx::SqlitePool;

pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        rust_log: "error".to_string(),
        bind_addr: "127.0.0.1:0".to_string(),
        media_base_url: "http://localhost:8000/media/".to_string(),
        media_root: "media".to_string(),
        seed_file: None,
        allowed_origins: vec!["http://localhost:5173".to_string()],
    }
}

/// Fresh in-memory database with migrations applied.
pub async fn test_pool() -> SqlitePool {
    db::connect_in_memory()
        .await
        .expect("Failed to open in-memory database")
}

pub fn test_state(pool: SqlitePool, sampler: Arc<dyn QuestionSampler>) -> AppState {
    AppState {
        pool,
        config: test_config(),
        sampler,
    }
}

/// Spawns the app on a random port and returns its base URL and pool.
pub async fn spawn_app() -> (String, SqlitePool) {
    let pool = test_pool().await;
    seed_catalog(&pool).await;

    let state = test_state(pool.clone(), Arc::new(ThreadRngSampler));
    let app = routes::create_router(state);

    // Bind to port 0 to get a random available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (address, pool)
}

fn questions(prefix: &str, level: i64, count: usize, correct: AnswerOption) -> Vec<SeedQuestion> {
    (0..count)
        .map(|i| SeedQuestion {
            question_text: format!("{} L{} Q{}", prefix, level, i),
            option_a: "Option A".to_string(),
            option_b: "Option B".to_string(),
            option_c: "Option C".to_string(),
            option_d: "Option D".to_string(),
            correct_option: correct,
            level,
            question_image: None,
        })
        .collect()
}

/// Catalog used across tests:
/// * subject 1 "Math" (CBSE, class 10): 3 questions at level 1, 6 at level 2,
///   none at level 3, 2 at level 4; every correct option is A.
/// * subject 2 "Science" (STATE, class 10): 6 per level; correct option is B.
/// * subject 3 "Art" (CBSE, class 9): no questions.
pub async fn seed_catalog(pool: &SqlitePool) {
    let mut math = Vec::new();
    math.extend(questions("Math", 1, 3, AnswerOption::A));
    math.extend(questions("Math", 2, 6, AnswerOption::A));
    math.extend(questions("Math", 4, 2, AnswerOption::A));

    let mut science = Vec::new();
    for level in 1..=4 {
        science.extend(questions("Science", level, 6, AnswerOption::B));
    }

    let catalog = CatalogSeed {
        subjects: vec![
            SeedSubject {
                name: "Math".to_string(),
                board: Board::Cbse,
                class_level: 10,
                image: Some("subject_images/math.png".to_string()),
                questions: math,
            },
            SeedSubject {
                name: "Science".to_string(),
                board: Board::State,
                class_level: 10,
                image: None,
                questions: science,
            },
            SeedSubject {
                name: "Art".to_string(),
                board: Board::Cbse,
                class_level: 9,
                image: None,
                questions: vec![],
            },
        ],
    };

    insert_catalog(pool, &catalog)
        .await
        .expect("Failed to seed catalog");
}

/// Inserts a student directly and returns its id.
pub async fn create_student(pool: &SqlitePool, name: &str) -> i64 {
    sqlx::query_scalar(
        r#"
        INSERT INTO students
            (name, school, father_name, mother_name, address, favourite_subject,
             class_level, stream, father_occupation, mother_occupation, phone, created_at)
        VALUES (?, 'Green Valley High', 'Ravi', 'Meena', 'Pune', 'Math', '10', 'Science', '', '', '9876543210', ?)
        RETURNING id
        "#,
    )
    .bind(name)
    .bind(chrono::Utc::now())
    .fetch_one(pool)
    .await
    .expect("Failed to insert student")
}

pub async fn cached_set_count(pool: &SqlitePool, student_id: i64, subject_id: i64) -> i64 {
    sqlx::query_scalar(
        "SELECT COUNT(*) FROM assigned_question_sets WHERE student_id = ? AND subject_id = ?",
    )
    .bind(student_id)
    .bind(subject_id)
    .fetch_one(pool)
    .await
    .unwrap()
}

/// Adds one subject with `count` level-1 questions (correct option A) and
/// returns its id.
pub async fn add_subject(pool: &SqlitePool, name: &str, board: Board, count: usize) -> i64 {
    let catalog = CatalogSeed {
        subjects: vec![SeedSubject {
            name: name.to_string(),
            board,
            class_level: 10,
            image: None,
            questions: questions(name, 1, count, AnswerOption::A),
        }],
    };
    insert_catalog(pool, &catalog)
        .await
        .expect("Failed to add subject");

    sqlx::query_scalar("SELECT MAX(id) FROM subjects")
        .fetch_one(pool)
        .await
        .unwrap()
}
