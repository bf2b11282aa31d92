// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{delete, get, post, put},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{answer, auth, question, quiz, submission},
    state::AppState,
    utils::jwt::auth_middleware,
};

/// Assembles the main application router.
///
/// * Public routes: registration, login, e-mail verification.
/// * Everything else requires a verified access token.
/// * Applies global middleware (Trace, CORS) and injects `AppState`.
pub fn create_router(state: AppState) -> Router {
    let mut cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    // Browsers may only call the API from the service's own public origin.
    let origin = state.config.public_url.origin().ascii_serialization();
    match HeaderValue::from_str(&origin) {
        Ok(value) => cors = cors.allow_origin(value),
        Err(_) => tracing::warn!("PUBLIC_URL origin {:?} is not a valid header value", origin),
    }

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/verification", get(auth::verify));

    let quiz_routes = Router::new()
        .route("/", get(quiz::list_quizzes).post(quiz::create_quiz))
        .route(
            "/{quiz_id}",
            get(quiz::get_quiz)
                .put(quiz::update_quiz)
                .delete(quiz::delete_quiz),
        )
        .route(
            "/{quiz_id}/questions",
            get(question::list_questions).post(question::create_question),
        )
        .route(
            "/{quiz_id}/questions/{question_id}",
            get(question::get_question)
                .put(question::update_question)
                .delete(question::delete_question),
        )
        .route(
            "/{quiz_id}/questions/{question_id}/answers",
            get(answer::list_answers).post(answer::add_answers),
        )
        .route(
            "/{quiz_id}/questions/{question_id}/answers/{answer_id}",
            put(answer::update_answer).delete(answer::delete_answer),
        )
        .route(
            "/{quiz_id}/submissions",
            get(submission::list_for_quiz).post(submission::submit),
        );

    let submission_routes = Router::new()
        .route("/", get(submission::list_mine))
        .route(
            "/{submission_id}",
            get(submission::get_submission)
                .put(submission::update_score)
                .delete(submission::delete_submission),
        );

    let protected = Router::new()
        .route("/api/user", delete(auth::delete_account))
        .nest("/api/quizzes", quiz_routes)
        .nest("/api/submissions", submission_routes)
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .nest("/api/auth", auth_routes)
        .merge(protected)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
