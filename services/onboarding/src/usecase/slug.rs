use fitpro_domain::id::TrainerId;
use fitpro_domain::slug::Slug;

use crate::domain::repository::{SlugRepository, TrainerRepository};
use crate::domain::types::{SlugReservation, Trainer};
use crate::error::OnboardingServiceError;

fn parse_slug(candidate: &str) -> Result<Slug, OnboardingServiceError> {
    Slug::parse(candidate).map_err(|_| OnboardingServiceError::SlugInvalidFormat)
}

// ── ReserveSlug ──────────────────────────────────────────────────────────────

pub struct ReserveSlugUseCase<T, S>
where
    T: TrainerRepository,
    S: SlugRepository,
{
    pub trainers: T,
    pub slugs: S,
}

impl<T, S> ReserveSlugUseCase<T, S>
where
    T: TrainerRepository,
    S: SlugRepository,
{
    pub async fn execute(
        &self,
        candidate: &str,
        trainer_id: TrainerId,
    ) -> Result<Slug, OnboardingServiceError> {
        // Format first: nothing is read for a malformed candidate.
        let slug = parse_slug(candidate)?;

        if self.trainers.find_by_id(trainer_id).await?.is_none() {
            return Err(OnboardingServiceError::TrainerNotFound);
        }

        if let Some(holder) = self.slugs.find_by_slug(&slug).await? {
            if holder.trainer_id == trainer_id {
                return Ok(slug);
            }
            return Err(OnboardingServiceError::SlugTaken);
        }

        match self.slugs.reserve(&slug, trainer_id).await? {
            SlugReservation::Reserved => {
                tracing::info!(%trainer_id, slug = %slug, "slug reserved");
                Ok(slug)
            }
            SlugReservation::Taken => {
                tracing::info!(%trainer_id, slug = %slug, "slug taken between check and reserve");
                Err(OnboardingServiceError::SlugTaken)
            }
        }
    }
}

// ── CheckSlug ────────────────────────────────────────────────────────────────

pub struct CheckSlugUseCase<S: SlugRepository> {
    pub slugs: S,
}

impl<S: SlugRepository> CheckSlugUseCase<S> {
    /// Read-only availability probe. Advisory: a later reservation may still
    /// lose a race.
    pub async fn execute(&self, candidate: &str) -> Result<(Slug, bool), OnboardingServiceError> {
        let slug = parse_slug(candidate)?;
        let available = self.slugs.find_by_slug(&slug).await?.is_none();
        Ok((slug, available))
    }
}

// ── ResolveSlug ──────────────────────────────────────────────────────────────

pub struct ResolveSlugUseCase<T, S>
where
    T: TrainerRepository,
    S: SlugRepository,
{
    pub trainers: T,
    pub slugs: S,
}

impl<T, S> ResolveSlugUseCase<T, S>
where
    T: TrainerRepository,
    S: SlugRepository,
{
    pub async fn execute(&self, raw: &str) -> Result<Trainer, OnboardingServiceError> {
        // A malformed slug can never be held, so it resolves to nothing.
        let slug = Slug::parse(raw).map_err(|_| OnboardingServiceError::TrainerNotFound)?;
        let record = self
            .slugs
            .find_by_slug(&slug)
            .await?
            .ok_or(OnboardingServiceError::TrainerNotFound)?;
        self.trainers
            .find_by_id(record.trainer_id)
            .await?
            .ok_or(OnboardingServiceError::TrainerNotFound)
    }
}
