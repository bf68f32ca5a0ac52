use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{delete, get, patch, post},
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use outlay_core::health::healthz;
use outlay_core::middleware::{propagate_request_id_layer, request_id_layer};

use crate::handlers::{
    auth::{login, request_email_code, request_phone_code, signup, verify_code},
    budget::{create_budget, delete_budget, list_budgets, update_budget},
    expense::{create_expense, delete_expense, expense_summary, list_expenses, update_expense},
    profile::{get_me, update_me, update_notifications},
};
use crate::state::AppState;

/// Readiness means the backing store answers.
async fn readyz(State(state): State<AppState>) -> StatusCode {
    match state.db.ping().await {
        Ok(()) => StatusCode::OK,
        Err(err) => {
            tracing::warn!("readiness probe failed: {err}");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Password auth
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
        // Login codes
        .route("/auth/code/email", post(request_email_code))
        .route("/auth/code/phone", post(request_phone_code))
        .route("/auth/code/verify", post(verify_code))
        // Current user
        .route("/auth/me", get(get_me))
        .route("/users/me", patch(update_me))
        .route("/users/me/notifications", patch(update_notifications))
        // Expenses
        .route("/expenses", get(list_expenses))
        .route("/expenses", post(create_expense))
        .route("/expenses/summary", get(expense_summary))
        .route("/expenses/{id}", patch(update_expense))
        .route("/expenses/{id}", delete(delete_expense))
        // Budgets
        .route("/budgets", get(list_budgets))
        .route("/budgets", post(create_budget))
        .route("/budgets/{id}", patch(update_budget))
        .route("/budgets/{id}", delete(delete_budget))
        .layer(
            ServiceBuilder::new()
                .layer(request_id_layer())
                .layer(TraceLayer::new_for_http())
                .layer(propagate_request_id_layer()),
        )
        .with_state(state)
}
