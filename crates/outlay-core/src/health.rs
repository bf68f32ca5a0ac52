use axum::http::StatusCode;

/// Handler for `GET /healthz` — liveness check.
///
/// Readiness (`/readyz`) is owned by each service, since readiness means
/// the service's backing stores answer, not merely that the process runs.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}
