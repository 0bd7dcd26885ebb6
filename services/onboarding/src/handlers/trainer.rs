use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use fitpro_domain::id::TrainerId;

use crate::domain::content::ContentDocument;
use crate::domain::types::Trainer;
use crate::error::OnboardingServiceError;
use crate::state::AppState;
use crate::usecase::slug::ResolveSlugUseCase;
use crate::usecase::trainer::GetTrainerUseCase;

/// Public trainer profile. The payment reference and draft link stay internal.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainerResponse {
    pub trainer_id: TrainerId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub city: String,
    pub district: String,
    pub specialty: String,
    pub bio: Option<String>,
    pub certifications: Option<String>,
    pub experience: Option<String>,
    pub services: Vec<String>,
    pub status: &'static str,
    pub content: ContentDocument,
    #[serde(serialize_with = "fitpro_core::serde::to_rfc3339_ms")]
    pub activated_at: DateTime<Utc>,
    #[serde(serialize_with = "fitpro_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
}

impl From<Trainer> for TrainerResponse {
    fn from(t: Trainer) -> Self {
        let p = t.profile;
        Self {
            trainer_id: t.id,
            name: p.name,
            email: p.email,
            phone: p.phone,
            city: p.city,
            district: p.district,
            specialty: p.specialty,
            bio: p.bio,
            certifications: p.certifications,
            experience: p.experience,
            services: p.services,
            status: t.status.as_str(),
            content: t.content,
            activated_at: t.activated_at,
            created_at: t.created_at,
        }
    }
}

// ── GET /trainers/{trainer_id} ───────────────────────────────────────────────

pub async fn get_trainer(
    State(state): State<AppState>,
    Path(trainer_id): Path<String>,
) -> Result<Json<TrainerResponse>, OnboardingServiceError> {
    let trainer_id: TrainerId = trainer_id
        .parse()
        .map_err(|_| OnboardingServiceError::TrainerNotFound)?;
    let usecase = GetTrainerUseCase {
        trainers: state.trainer_repo(),
    };
    let trainer = usecase.execute(trainer_id).await?;
    Ok(Json(trainer.into()))
}

// ── GET /t/{slug} ────────────────────────────────────────────────────────────

pub async fn get_trainer_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<TrainerResponse>, OnboardingServiceError> {
    let usecase = ResolveSlugUseCase {
        trainers: state.trainer_repo(),
        slugs: state.slug_repo(),
    };
    let trainer = usecase.execute(&slug).await?;
    Ok(Json(trainer.into()))
}
