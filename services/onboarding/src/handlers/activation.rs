use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use fitpro_domain::id::TrainerId;

use crate::error::OnboardingServiceError;
use crate::handlers::draft::parse_draft_id;
use crate::state::AppState;
use crate::usecase::activation::ActivateTrainerInput;

// ── POST /activate ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivateRequest {
    pub draft_id: String,
    pub payment_reference: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivateResponse {
    pub success: bool,
    pub trainer_id: TrainerId,
    pub redirect_url: String,
    pub already_active: bool,
}

/// Client-side confirmation after the payment step.
pub async fn activate(
    State(state): State<AppState>,
    Json(body): Json<ActivateRequest>,
) -> Result<Json<ActivateResponse>, OnboardingServiceError> {
    let usecase = state.activation();
    let output = usecase
        .execute(ActivateTrainerInput {
            draft_id: parse_draft_id(&body.draft_id)?,
            payment_reference: body.payment_reference.trim().to_owned(),
        })
        .await?;
    Ok(Json(ActivateResponse {
        success: true,
        trainer_id: output.trainer_id,
        redirect_url: state.welcome_url(output.trainer_id),
        already_active: output.already_active,
    }))
}
