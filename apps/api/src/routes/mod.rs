pub mod health;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::state::AppState;
use crate::{accounts, export, feedback, generation, ingest, usage};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Auth
        .route(
            "/api/v1/auth/admin/register",
            post(accounts::handlers::register_admin),
        )
        .route(
            "/api/v1/auth/admin/login",
            post(accounts::handlers::login_admin),
        )
        .route("/api/v1/auth/login", post(accounts::handlers::login_user))
        // Admin user management
        .route(
            "/api/v1/admin/users",
            get(accounts::handlers::list_users).post(accounts::handlers::create_user),
        )
        .route(
            "/api/v1/admin/users/:email",
            delete(accounts::handlers::delete_user),
        )
        // Generation
        .route("/api/v1/cv/generate", post(generation::handlers::generate_cv))
        .route("/api/v1/cv/refine", post(generation::handlers::refine_cv))
        .route(
            "/api/v1/cover-letter/refine",
            post(generation::handlers::refine_cover_letter),
        )
        // Usage
        .route("/api/v1/usage/:client_id", get(usage::handlers::get_usage))
        // Document ingestion
        .route(
            "/api/v1/documents/extract",
            post(ingest::handlers::extract_document),
        )
        // Export
        .route("/api/v1/export/cv", post(export::handlers::export_cv))
        .route(
            "/api/v1/export/cover-letter",
            post(export::handlers::export_cover_letter),
        )
        // Feedback
        .route(
            "/api/v1/feedback",
            post(feedback::handlers::submit_feedback).get(feedback::handlers::list_feedback),
        )
        .with_state(state)
}
