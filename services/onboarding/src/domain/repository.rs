#![allow(async_fn_in_trait)]

use fitpro_domain::id::{DraftId, TrainerId};
use fitpro_domain::slug::Slug;

use crate::domain::types::{
    Draft, DraftPatch, NewDraft, PaymentDetails, PromotionOutcome, SlugRecord, SlugReservation,
    Trainer,
};
use crate::error::OnboardingServiceError;

/// Single-document access to perishable drafts.
pub trait DraftRepository: Send + Sync {
    /// Insert a draft; the store assigns its id.
    async fn create(&self, draft: &NewDraft) -> Result<DraftId, OnboardingServiceError>;

    async fn find_by_id(&self, id: DraftId) -> Result<Option<Draft>, OnboardingServiceError>;

    /// Apply a partial update to activation fields. `DraftNotFound` if absent.
    async fn update(&self, id: DraftId, patch: &DraftPatch) -> Result<(), OnboardingServiceError>;

    /// Delete a draft. Returns `true` if deleted, `false` if not found.
    async fn delete(&self, id: DraftId) -> Result<bool, OnboardingServiceError>;

    /// Atomically stamp the draft as activated (only if it is not active yet)
    /// and insert `trainer`. Either both writes happen or neither does.
    async fn promote(&self, trainer: &Trainer) -> Result<PromotionOutcome, OnboardingServiceError>;
}

/// Read access to permanent trainer profiles. Trainers are only ever created
/// through [`DraftRepository::promote`].
pub trait TrainerRepository: Send + Sync {
    async fn find_by_id(&self, id: TrainerId) -> Result<Option<Trainer>, OnboardingServiceError>;
}

/// Slug index: slug → trainer.
pub trait SlugRepository: Send + Sync {
    async fn find_by_slug(&self, slug: &Slug) -> Result<Option<SlugRecord>, OnboardingServiceError>;

    /// Reserve `slug` for `trainer_id`, releasing any slug the trainer held
    /// before. Re-reserving one's own slug is a no-op success.
    async fn reserve(
        &self,
        slug: &Slug,
        trainer_id: TrainerId,
    ) -> Result<SlugReservation, OnboardingServiceError>;
}

/// Synchronous retrieval from the external payment processor.
pub trait PaymentProcessor: Send + Sync {
    /// Any failure to obtain an authoritative answer is
    /// `VerificationFailed(ProcessorError)`, never success.
    async fn retrieve(&self, reference: &str) -> Result<PaymentDetails, OnboardingServiceError>;
}

/// Processed webhook event ids.
pub trait EventLedger: Send + Sync {
    /// Record `event_id`. Returns `false` if it was already recorded.
    async fn claim(&self, event_id: &str) -> Result<bool, OnboardingServiceError>;
}
