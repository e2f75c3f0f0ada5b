// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method},
    middleware,
    routing::{delete, get, post},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{admin, employee, evaluation, leaderboard, questions, report},
    state::AppState,
    utils::jwt::{admin_middleware, auth_middleware},
};

/// Assembles the main application router.
///
/// * Public routes: catalog, scoring, results, leaderboard, reports.
/// * Admin routes behind JWT verification plus an admin role check.
/// * Global middleware (Trace, CORS).
pub fn create_router(state: AppState) -> Router {
    let origins: Vec<HeaderValue> = state
        .config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    let evaluation_routes = Router::new()
        .route("/score", post(evaluation::score_answers))
        .route("/", post(evaluation::evaluate));

    let result_routes = Router::new()
        .route(
            "/",
            get(evaluation::list_evaluations).post(evaluation::submit_evaluation),
        )
        .route("/{id}", get(evaluation::get_evaluation))
        .route("/{id}/report", get(report::evaluation_report));

    let leaderboard_routes = Router::new()
        .route("/", get(leaderboard::get_leaderboard))
        .route("/{employee_id}", get(leaderboard::get_self_rank));

    let employee_routes = Router::new()
        .route("/", get(employee::list_employees))
        .route("/report", get(employee::employee_list_report));

    let admin_routes = Router::new()
        .route("/employees", post(admin::create_employee))
        .route("/questions", post(admin::create_question))
        .route("/questions/{id}", delete(admin::delete_question))
        .route("/evaluationresultat/{id}", delete(admin::delete_evaluation))
        // Auth runs first (outermost), then the admin check
        .layer(middleware::from_fn(admin_middleware))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .route("/api/questions", get(questions::get_catalog))
        .nest("/api/evaluations", evaluation_routes)
        .nest("/api/evaluationresultat", result_routes)
        .nest("/api/leaderboard", leaderboard_routes)
        .nest("/api/employees", employee_routes)
        .nest("/api/admin", admin_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
