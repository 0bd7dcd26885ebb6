use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use fitpro_domain::id::TrainerId;
use fitpro_domain::slug::Slug;

use crate::error::OnboardingServiceError;
use crate::state::AppState;
use crate::usecase::slug::{CheckSlugUseCase, ReserveSlugUseCase};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlugValidationResponse {
    pub is_valid: bool,
    pub is_available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// ── POST /slug/validate ──────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateSlugRequest {
    pub candidate_slug: String,
    pub trainer_id: String,
}

/// Validates and reserves. Format and availability failures answer with the
/// validation shape; everything else uses the regular error body.
pub async fn validate_slug(
    State(state): State<AppState>,
    Json(body): Json<ValidateSlugRequest>,
) -> Result<Response, OnboardingServiceError> {
    let usecase = ReserveSlugUseCase {
        trainers: state.trainer_repo(),
        slugs: state.slug_repo(),
    };
    let result = match body.trainer_id.parse::<TrainerId>() {
        Ok(trainer_id) => usecase.execute(&body.candidate_slug, trainer_id).await,
        // A malformed candidate is reported before the unknown trainer.
        Err(_) if Slug::parse(&body.candidate_slug).is_err() => {
            Err(OnboardingServiceError::SlugInvalidFormat)
        }
        Err(_) => Err(OnboardingServiceError::TrainerNotFound),
    };
    let (status, response) = match result {
        Ok(_) => (
            StatusCode::OK,
            SlugValidationResponse {
                is_valid: true,
                is_available: true,
                error: None,
            },
        ),
        Err(e @ OnboardingServiceError::SlugInvalidFormat) => (
            e.status(),
            SlugValidationResponse {
                is_valid: false,
                is_available: false,
                error: Some(e.to_string()),
            },
        ),
        Err(e @ OnboardingServiceError::SlugTaken) => (
            e.status(),
            SlugValidationResponse {
                is_valid: true,
                is_available: false,
                error: Some(e.to_string()),
            },
        ),
        Err(e) => return Err(e),
    };
    Ok((status, Json(response)).into_response())
}

// ── GET /slug/{slug} ─────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlugAvailabilityResponse {
    pub slug: String,
    pub is_valid: bool,
    pub is_available: bool,
}

pub async fn check_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<SlugAvailabilityResponse>, OnboardingServiceError> {
    let usecase = CheckSlugUseCase {
        slugs: state.slug_repo(),
    };
    let response = match usecase.execute(&slug).await {
        Ok((slug, is_available)) => SlugAvailabilityResponse {
            slug: slug.to_string(),
            is_valid: true,
            is_available,
        },
        Err(OnboardingServiceError::SlugInvalidFormat) => SlugAvailabilityResponse {
            slug,
            is_valid: false,
            is_available: false,
        },
        Err(e) => return Err(e),
    };
    Ok(Json(response))
}
