use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::domain::types::{ProfileError, VerificationFailure};

/// Onboarding service error variants.
#[derive(Debug, thiserror::Error)]
pub enum OnboardingServiceError {
    #[error("trainer profile not found")]
    DraftNotFound,
    #[error("trainer not found")]
    TrainerNotFound,
    #[error("{0}")]
    VerificationFailed(VerificationFailure),
    #[error("invalid webhook signature")]
    InvalidSignature,
    #[error("invalid webhook payload")]
    InvalidPayload,
    #[error("invalid profile: {0}")]
    InvalidProfile(#[from] ProfileError),
    #[error("invalid session token")]
    InvalidSessionToken,
    #[error("trainer profile is already activated")]
    DraftAlreadyActive,
    #[error("slug must be 3-50 characters of lowercase letters, digits or hyphens")]
    SlugInvalidFormat,
    #[error("slug is already taken")]
    SlugTaken,
    #[error("database error")]
    StoreUnavailable(#[from] anyhow::Error),
}

impl OnboardingServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DraftNotFound => "DRAFT_NOT_FOUND",
            Self::TrainerNotFound => "TRAINER_NOT_FOUND",
            Self::VerificationFailed(VerificationFailure::NotSucceeded) => "PAYMENT_NOT_SUCCEEDED",
            Self::VerificationFailed(VerificationFailure::AmountMismatch) => {
                "PAYMENT_AMOUNT_MISMATCH"
            }
            Self::VerificationFailed(VerificationFailure::ProcessorError) => {
                "PAYMENT_PROCESSOR_ERROR"
            }
            Self::InvalidSignature => "INVALID_SIGNATURE",
            Self::InvalidPayload => "INVALID_PAYLOAD",
            Self::InvalidProfile(_) => "INVALID_PROFILE",
            Self::InvalidSessionToken => "INVALID_SESSION_TOKEN",
            Self::DraftAlreadyActive => "DRAFT_ALREADY_ACTIVE",
            Self::SlugInvalidFormat => "SLUG_INVALID_FORMAT",
            Self::SlugTaken => "SLUG_TAKEN",
            Self::StoreUnavailable(_) => "STORE_UNAVAILABLE",
        }
    }

    /// Whether the same call may succeed later without any change of input.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::StoreUnavailable(_) => true,
            Self::VerificationFailed(reason) => reason.is_retryable(),
            _ => false,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::DraftNotFound | Self::TrainerNotFound => StatusCode::NOT_FOUND,
            Self::VerificationFailed(VerificationFailure::ProcessorError) => {
                StatusCode::BAD_GATEWAY
            }
            Self::VerificationFailed(_) => StatusCode::PAYMENT_REQUIRED,
            Self::InvalidSignature | Self::InvalidSessionToken => StatusCode::UNAUTHORIZED,
            Self::InvalidPayload | Self::InvalidProfile(_) | Self::SlugInvalidFormat => {
                StatusCode::BAD_REQUEST
            }
            Self::DraftAlreadyActive | Self::SlugTaken => StatusCode::CONFLICT,
            Self::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for OnboardingServiceError {
    fn into_response(self) -> Response {
        let status = self.status();
        // 4xx are expected client errors and TraceLayer already records them.
        // Store failures need the anyhow chain logged so the root cause is traceable.
        if let Self::StoreUnavailable(ref e) = self {
            tracing::error!(error = ?e, kind = self.kind(), "store unavailable");
        }
        let body = serde_json::json!({
            "success": false,
            "kind": self.kind(),
            "error": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
