use sea_orm::DatabaseConnection;

use fitpro_domain::id::TrainerId;

use crate::infra::db::{DbDraftRepository, DbSlugRepository, DbTrainerRepository};
use crate::infra::ledger::EventLedgerBackend;
use crate::infra::payment::HttpPaymentProcessor;
use crate::usecase::activation::ActivateTrainerUseCase;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub ledger: EventLedgerBackend,
    pub payments: HttpPaymentProcessor,
    pub webhook_secret: String,
    /// Origin of the public site, without trailing slash.
    pub public_base_url: String,
}

impl AppState {
    pub fn draft_repo(&self) -> DbDraftRepository {
        DbDraftRepository {
            db: self.db.clone(),
        }
    }

    pub fn trainer_repo(&self) -> DbTrainerRepository {
        DbTrainerRepository {
            db: self.db.clone(),
        }
    }

    pub fn slug_repo(&self) -> DbSlugRepository {
        DbSlugRepository {
            db: self.db.clone(),
        }
    }

    /// The one activation path, shared by `/activate` and `/webhook`.
    pub fn activation(&self) -> ActivateTrainerUseCase<DbDraftRepository, HttpPaymentProcessor> {
        ActivateTrainerUseCase::new(self.draft_repo(), self.payments.clone())
    }

    pub fn welcome_url(&self, trainer_id: TrainerId) -> String {
        welcome_url(&self.public_base_url, trainer_id)
    }
}

pub fn welcome_url(base_url: &str, trainer_id: TrainerId) -> String {
    format!("{}/trainers/{trainer_id}/welcome", base_url.trim_end_matches('/'))
}
