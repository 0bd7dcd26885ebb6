use chrono::Utc;
use uuid::Uuid;

use fitpro_domain::id::{DraftId, TrainerId};

use crate::domain::repository::{DraftRepository, PaymentProcessor};
use crate::domain::types::{
    ACTIVATION_FEE, ActivationFee, PromotionOutcome, Trainer, TrainerStatus, verify_payment,
};
use crate::error::OnboardingServiceError;
use crate::usecase::content::generate_content;

pub struct ActivateTrainerInput {
    pub draft_id: DraftId,
    pub payment_reference: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivationOutput {
    pub trainer_id: TrainerId,
    /// `true` when the draft had already been promoted before this call.
    pub already_active: bool,
}

/// The single authority for the draft → trainer transition. Both the client
/// confirmation endpoint and the payment webhook call into this.
pub struct ActivateTrainerUseCase<D, P>
where
    D: DraftRepository,
    P: PaymentProcessor,
{
    pub drafts: D,
    pub payments: P,
    pub fee: ActivationFee,
}

impl<D, P> ActivateTrainerUseCase<D, P>
where
    D: DraftRepository,
    P: PaymentProcessor,
{
    pub fn new(drafts: D, payments: P) -> Self {
        Self {
            drafts,
            payments,
            fee: ACTIVATION_FEE,
        }
    }

    pub async fn execute(
        &self,
        input: ActivateTrainerInput,
    ) -> Result<ActivationOutput, OnboardingServiceError> {
        let draft_id = input.draft_id;

        // 1. Load draft → 404 if absent
        let draft = self
            .drafts
            .find_by_id(draft_id)
            .await?
            .ok_or(OnboardingServiceError::DraftNotFound)?;

        // 2. Already promoted → return the existing trainer, no processor call
        if let Some(trainer_id) = draft.activated_trainer() {
            if draft.payment_reference.as_deref() != Some(input.payment_reference.as_str()) {
                tracing::warn!(
                    %draft_id,
                    %trainer_id,
                    "activation replayed with a different payment reference; ignoring"
                );
            }
            return Ok(ActivationOutput {
                trainer_id,
                already_active: true,
            });
        }

        // 3. Verify payment against the processor; draft untouched on failure
        let details = self.payments.retrieve(&input.payment_reference).await?;
        if let Err(reason) = verify_payment(&details, self.fee) {
            tracing::info!(
                %draft_id,
                reason = reason.as_str(),
                amount_minor = details.amount_minor,
                currency = %details.currency,
                "payment rejected for activation"
            );
            return Err(OnboardingServiceError::VerificationFailed(reason));
        }

        // 4. Generate website content
        let now = Utc::now();
        let trainer = Trainer {
            id: TrainerId(Uuid::now_v7()),
            draft_id,
            content: generate_content(&draft.profile, now),
            profile: draft.profile,
            status: TrainerStatus::Active,
            payment_reference: details.reference,
            activated_at: now,
            created_at: now,
        };

        // 5+6. Stamp the draft and create the trainer in one conditional write
        match self.drafts.promote(&trainer).await? {
            PromotionOutcome::Promoted(trainer_id) => {
                tracing::info!(%draft_id, %trainer_id, "trainer activated");
                Ok(ActivationOutput {
                    trainer_id,
                    already_active: false,
                })
            }
            PromotionOutcome::AlreadyPromoted(trainer_id) => {
                tracing::info!(
                    %draft_id,
                    %trainer_id,
                    "concurrent activation already promoted this draft"
                );
                Ok(ActivationOutput {
                    trainer_id,
                    already_active: true,
                })
            }
            PromotionOutcome::DraftMissing => Err(OnboardingServiceError::DraftNotFound),
        }
    }
}
