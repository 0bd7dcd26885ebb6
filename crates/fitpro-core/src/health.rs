use axum::http::StatusCode;

/// Handler for `GET /healthz`: liveness.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// Handler for `GET /readyz`: readiness.
pub async fn readyz() -> StatusCode {
    StatusCode::OK
}
