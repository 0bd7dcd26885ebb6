use chrono::{DateTime, Duration, Utc};
use rand::RngExt;
use subtle::ConstantTimeEq;

use fitpro_domain::id::DraftId;

use crate::domain::repository::DraftRepository;
use crate::domain::types::{DRAFT_TTL_SECS, Draft, NewDraft, ProfileFields, SESSION_TOKEN_LEN};
use crate::error::OnboardingServiceError;

/// Charset for session tokens (mixed-case alphanumeric).
const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

fn generate_session_token() -> String {
    let mut rng = rand::rng();
    (0..SESSION_TOKEN_LEN)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect()
}

// ── SubmitDraft ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct SubmittedDraft {
    pub draft_id: DraftId,
    pub session_token: String,
    pub expires_at: DateTime<Utc>,
}

pub struct SubmitDraftUseCase<D: DraftRepository> {
    pub drafts: D,
}

impl<D: DraftRepository> SubmitDraftUseCase<D> {
    pub async fn execute(
        &self,
        profile: ProfileFields,
    ) -> Result<SubmittedDraft, OnboardingServiceError> {
        let profile = profile.normalized()?;
        let now = Utc::now();
        let draft = NewDraft {
            profile,
            session_token: generate_session_token(),
            created_at: now,
            expires_at: now + Duration::seconds(DRAFT_TTL_SECS),
        };
        let draft_id = self.drafts.create(&draft).await?;
        tracing::info!(%draft_id, "draft submitted");
        Ok(SubmittedDraft {
            draft_id,
            session_token: draft.session_token,
            expires_at: draft.expires_at,
        })
    }
}

// ── GetDraft ─────────────────────────────────────────────────────────────────

pub struct GetDraftUseCase<D: DraftRepository> {
    pub drafts: D,
}

impl<D: DraftRepository> GetDraftUseCase<D> {
    pub async fn execute(
        &self,
        draft_id: DraftId,
        session_token: &str,
    ) -> Result<Draft, OnboardingServiceError> {
        load_authorized(&self.drafts, draft_id, session_token).await
    }
}

// ── DiscardDraft ─────────────────────────────────────────────────────────────

/// Withdraws a submission that was never paid for. Activated drafts are kept
/// as the back-reference of their trainer.
pub struct DiscardDraftUseCase<D: DraftRepository> {
    pub drafts: D,
}

impl<D: DraftRepository> DiscardDraftUseCase<D> {
    pub async fn execute(
        &self,
        draft_id: DraftId,
        session_token: &str,
    ) -> Result<(), OnboardingServiceError> {
        let draft = load_authorized(&self.drafts, draft_id, session_token).await?;
        if draft.is_active {
            return Err(OnboardingServiceError::DraftAlreadyActive);
        }
        if !self.drafts.delete(draft_id).await? {
            return Err(OnboardingServiceError::DraftNotFound);
        }
        tracing::info!(%draft_id, "draft discarded");
        Ok(())
    }
}

async fn load_authorized<D: DraftRepository>(
    drafts: &D,
    draft_id: DraftId,
    session_token: &str,
) -> Result<Draft, OnboardingServiceError> {
    let draft = drafts
        .find_by_id(draft_id)
        .await?
        .ok_or(OnboardingServiceError::DraftNotFound)?;
    if !bool::from(draft.session_token.as_bytes().ct_eq(session_token.as_bytes())) {
        return Err(OnboardingServiceError::InvalidSessionToken);
    }
    Ok(draft)
}
