use axum::{
    Router,
    routing::{get, post},
};

use fitpro_core::health::{healthz, readyz};
use fitpro_core::middleware::{propagate_request_id_layer, request_id_layer, trace_layer};

use crate::handlers::{
    activation::activate,
    content::preview_content,
    draft::{discard_draft, get_draft, submit_draft},
    slug::{check_slug, validate_slug},
    trainer::{get_trainer, get_trainer_by_slug},
    webhook::receive_webhook,
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Drafts
        .route("/drafts", post(submit_draft))
        .route("/drafts/{draft_id}", get(get_draft).delete(discard_draft))
        // Activation
        .route("/activate", post(activate))
        .route("/webhook", post(receive_webhook))
        // Slugs
        .route("/slug/validate", post(validate_slug))
        .route("/slug/{slug}", get(check_slug))
        // Trainers
        .route("/trainers/{trainer_id}", get(get_trainer))
        .route("/t/{slug}", get(get_trainer_by_slug))
        // Content
        .route("/content/preview", post(preview_content))
        .layer(trace_layer())
        .layer(propagate_request_id_layer())
        .layer(request_id_layer())
        .with_state(state)
}
