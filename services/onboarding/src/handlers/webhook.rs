use axum::{Json, extract::State, http::HeaderMap};
use bytes::Bytes;
use serde::Serialize;

use crate::error::OnboardingServiceError;
use crate::state::AppState;
use crate::usecase::webhook::HandlePaymentWebhookUseCase;

pub const SIGNATURE_HEADER: &str = "x-payment-signature";

// ── POST /webhook ────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct WebhookAck {
    pub received: bool,
    pub status: &'static str,
}

/// The body is taken raw: the signature covers the exact bytes sent.
pub async fn receive_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookAck>, OnboardingServiceError> {
    let signature = headers.get(SIGNATURE_HEADER).and_then(|v| v.to_str().ok());
    let usecase = HandlePaymentWebhookUseCase {
        ledger: state.ledger.clone(),
        activation: state.activation(),
        secret: state.webhook_secret.clone(),
    };
    let outcome = usecase.execute(signature, &body).await?;
    Ok(Json(WebhookAck {
        received: true,
        status: outcome.status(),
    }))
}
