use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use fitpro_domain::id::{DraftId, TrainerId};

use crate::domain::types::ProfileFields;
use crate::error::OnboardingServiceError;
use crate::handlers::session::SessionToken;
use crate::state::AppState;
use crate::usecase::draft::{DiscardDraftUseCase, GetDraftUseCase, SubmitDraftUseCase};

/// Profile fields as submitted by the onboarding form.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub city: String,
    pub district: String,
    pub specialty: String,
    pub bio: Option<String>,
    pub certifications: Option<String>,
    pub experience: Option<String>,
    #[serde(default)]
    pub services: Vec<String>,
}

impl From<ProfileRequest> for ProfileFields {
    fn from(r: ProfileRequest) -> Self {
        Self {
            name: r.name,
            email: r.email,
            phone: r.phone,
            city: r.city,
            district: r.district,
            specialty: r.specialty,
            bio: r.bio,
            certifications: r.certifications,
            experience: r.experience,
            services: r.services,
        }
    }
}

/// A path segment that is not a UUID cannot name an existing draft.
pub(crate) fn parse_draft_id(raw: &str) -> Result<DraftId, OnboardingServiceError> {
    raw.parse().map_err(|_| OnboardingServiceError::DraftNotFound)
}

// ── POST /drafts ─────────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitDraftResponse {
    pub draft_id: DraftId,
    pub session_token: String,
    #[serde(serialize_with = "fitpro_core::serde::to_rfc3339_ms")]
    pub expires_at: DateTime<Utc>,
}

pub async fn submit_draft(
    State(state): State<AppState>,
    Json(body): Json<ProfileRequest>,
) -> Result<(StatusCode, Json<SubmitDraftResponse>), OnboardingServiceError> {
    let usecase = SubmitDraftUseCase {
        drafts: state.draft_repo(),
    };
    let submitted = usecase.execute(body.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(SubmitDraftResponse {
            draft_id: submitted.draft_id,
            session_token: submitted.session_token,
            expires_at: submitted.expires_at,
        }),
    ))
}

// ── GET /drafts/{draft_id} ───────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftResponse {
    pub draft_id: DraftId,
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
    pub is_paid: bool,
    pub is_active: bool,
    pub is_expired: bool,
    pub trainer_id: Option<TrainerId>,
    #[serde(serialize_with = "fitpro_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "fitpro_core::serde::to_rfc3339_ms")]
    pub expires_at: DateTime<Utc>,
    #[serde(serialize_with = "fitpro_core::serde::to_rfc3339_ms_opt")]
    pub activated_at: Option<DateTime<Utc>>,
}

pub async fn get_draft(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
    Path(draft_id): Path<String>,
) -> Result<Json<DraftResponse>, OnboardingServiceError> {
    let usecase = GetDraftUseCase {
        drafts: state.draft_repo(),
    };
    let draft = usecase.execute(parse_draft_id(&draft_id)?, &token).await?;
    let is_expired = draft.is_expired(Utc::now());
    let p = draft.profile;
    Ok(Json(DraftResponse {
        draft_id: draft.id,
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
        is_paid: draft.is_paid,
        is_active: draft.is_active,
        is_expired,
        trainer_id: draft.final_id,
        created_at: draft.created_at,
        expires_at: draft.expires_at,
        activated_at: draft.activated_at,
    }))
}

// ── DELETE /drafts/{draft_id} ────────────────────────────────────────────────

pub async fn discard_draft(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
    Path(draft_id): Path<String>,
) -> Result<StatusCode, OnboardingServiceError> {
    let usecase = DiscardDraftUseCase {
        drafts: state.draft_repo(),
    };
    usecase.execute(parse_draft_id(&draft_id)?, &token).await?;
    Ok(StatusCode::NO_CONTENT)
}
