use axum::Json;
use chrono::Utc;

use crate::domain::content::ContentDocument;
use crate::domain::types::ProfileFields;
use crate::error::OnboardingServiceError;
use crate::handlers::draft::ProfileRequest;
use crate::usecase::content::generate_content;

// ── POST /content/preview ────────────────────────────────────────────────────

/// Renders website content for a profile without touching any stored state.
pub async fn preview_content(
    Json(body): Json<ProfileRequest>,
) -> Result<Json<ContentDocument>, OnboardingServiceError> {
    let profile = ProfileFields::from(body).normalized()?;
    Ok(Json(generate_content(&profile, Utc::now())))
}
