use fitpro_domain::id::TrainerId;

use crate::domain::repository::TrainerRepository;
use crate::domain::types::Trainer;
use crate::error::OnboardingServiceError;

pub struct GetTrainerUseCase<T: TrainerRepository> {
    pub trainers: T,
}

impl<T: TrainerRepository> GetTrainerUseCase<T> {
    pub async fn execute(&self, trainer_id: TrainerId) -> Result<Trainer, OnboardingServiceError> {
        self.trainers
            .find_by_id(trainer_id)
            .await?
            .ok_or(OnboardingServiceError::TrainerNotFound)
    }
}
