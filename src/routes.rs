// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method},
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::{
    handlers::{answers, questions, reports, students, subjects},
    state::AppState,
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (students, subjects, questions, answers, reports).
/// * Serves uploaded media under `/media`.
/// * Applies global middleware (Trace, CORS).
pub fn create_router(state: AppState) -> Router {
    let origins: Vec<HeaderValue> = state
        .config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    let student_routes = Router::new().route("/", post(students::register_student));

    let subject_routes = Router::new().route("/", get(subjects::list_subjects));

    let question_routes = Router::new().route("/assign", post(questions::assign_questions));

    let answer_routes = Router::new().route("/submit", post(answers::submit_answers));

    let report_routes = Router::new()
        .route("/{submission_id}", get(reports::download_report))
        .route("/{submission_id}/breakdown", get(reports::get_breakdown));

    Router::new()
        .nest("/api/students", student_routes)
        .nest("/api/subjects", subject_routes)
        .nest("/api/questions", question_routes)
        .nest("/api/answers", answer_routes)
        .nest("/api/reports", report_routes)
        .nest_service("/media", ServeDir::new(&state.config.media_root))
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
