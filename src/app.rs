use crate::handlers;
use crate::state::AppState;
use axum::{Router, routing::get};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/reports/revenue", get(handlers::get_revenue_report))
        .route("/api/reports/presets", get(handlers::list_presets))
        .route(
            "/api/payments",
            get(handlers::list_payments).post(handlers::record_payment),
        )
        .route("/api/members", get(handlers::list_members))
        .with_state(state)
}
