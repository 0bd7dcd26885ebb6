use anyhow::Context as _;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, TransactionError, TransactionTrait,
    sea_query::{Expr, OnConflict},
};
use uuid::Uuid;

use fitpro_domain::id::{DraftId, TrainerId};
use fitpro_domain::slug::Slug;
use fitpro_onboarding_schema::{drafts, trainer_slugs, trainers};

use crate::domain::repository::{DraftRepository, SlugRepository, TrainerRepository};
use crate::domain::types::{
    Draft, DraftPatch, NewDraft, ProfileFields, PromotionOutcome, SlugRecord, SlugReservation,
    Trainer, TrainerStatus,
};
use crate::error::OnboardingServiceError;

// ── Draft repository ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbDraftRepository {
    pub db: DatabaseConnection,
}

impl DraftRepository for DbDraftRepository {
    async fn create(&self, draft: &NewDraft) -> Result<DraftId, OnboardingServiceError> {
        let id = Uuid::now_v7();
        let p = &draft.profile;
        drafts::ActiveModel {
            id: Set(id),
            name: Set(p.name.clone()),
            email: Set(p.email.clone()),
            phone: Set(p.phone.clone()),
            city: Set(p.city.clone()),
            district: Set(p.district.clone()),
            specialty: Set(p.specialty.clone()),
            bio: Set(p.bio.clone()),
            certifications: Set(p.certifications.clone()),
            experience: Set(p.experience.clone()),
            services: Set(serde_json::to_value(&p.services).context("encode draft services")?),
            session_token: Set(draft.session_token.clone()),
            created_at: Set(draft.created_at),
            expires_at: Set(draft.expires_at),
            is_paid: Set(false),
            is_active: Set(false),
            payment_reference: Set(None),
            final_id: Set(None),
            activated_at: Set(None),
        }
        .insert(&self.db)
        .await
        .context("create draft")?;
        Ok(DraftId(id))
    }

    async fn find_by_id(&self, id: DraftId) -> Result<Option<Draft>, OnboardingServiceError> {
        let model = drafts::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find draft by id")?;
        Ok(model.map(draft_from_model).transpose()?)
    }

    async fn update(&self, id: DraftId, patch: &DraftPatch) -> Result<(), OnboardingServiceError> {
        let affected = if patch.is_empty() {
            drafts::Entity::find_by_id(id.0)
                .count(&self.db)
                .await
                .context("check draft exists")?
        } else {
            apply_patch(&self.db, id, patch, false)
                .await
                .context("update draft")?
        };
        if affected == 0 {
            return Err(OnboardingServiceError::DraftNotFound);
        }
        Ok(())
    }

    async fn delete(&self, id: DraftId) -> Result<bool, OnboardingServiceError> {
        let result = drafts::Entity::delete_many()
            .filter(drafts::Column::Id.eq(id.0))
            .exec(&self.db)
            .await
            .context("delete draft")?;
        Ok(result.rows_affected > 0)
    }

    async fn promote(&self, trainer: &Trainer) -> Result<PromotionOutcome, OnboardingServiceError> {
        let services =
            serde_json::to_value(&trainer.profile.services).context("encode trainer services")?;
        let content = serde_json::to_value(&trainer.content).context("encode trainer content")?;

        let outcome = self
            .db
            .transaction::<_, PromotionOutcome, DbErr>(|txn| {
                let trainer = trainer.clone();
                Box::pin(async move {
                    // CAS on is_active: only one caller can flip the draft.
                    let patch = DraftPatch::activation(&trainer);
                    if apply_patch(txn, trainer.draft_id, &patch, true).await? == 0 {
                        let current = drafts::Entity::find_by_id(trainer.draft_id.0)
                            .one(txn)
                            .await?;
                        return match current {
                            None => Ok(PromotionOutcome::DraftMissing),
                            Some(model) => match model.final_id {
                                Some(existing) if model.is_active => {
                                    Ok(PromotionOutcome::AlreadyPromoted(TrainerId(existing)))
                                }
                                _ => Err(DbErr::Custom(
                                    "draft neither promotable nor promoted".to_owned(),
                                )),
                            },
                        };
                    }

                    let p = trainer.profile;
                    trainers::ActiveModel {
                        id: Set(trainer.id.0),
                        draft_id: Set(trainer.draft_id.0),
                        name: Set(p.name),
                        email: Set(p.email),
                        phone: Set(p.phone),
                        city: Set(p.city),
                        district: Set(p.district),
                        specialty: Set(p.specialty),
                        bio: Set(p.bio),
                        certifications: Set(p.certifications),
                        experience: Set(p.experience),
                        services: Set(services),
                        status: Set(trainer.status.as_str().to_owned()),
                        content: Set(content),
                        payment_reference: Set(trainer.payment_reference),
                        activated_at: Set(trainer.activated_at),
                        created_at: Set(trainer.created_at),
                    }
                    .insert(txn)
                    .await?;
                    Ok(PromotionOutcome::Promoted(trainer.id))
                })
            })
            .await
            .context("promote draft")?;
        Ok(outcome)
    }
}

/// Write the set fields of `patch`. With `only_if_inactive` the update is a
/// compare-and-swap that matches nothing once the draft is active.
async fn apply_patch<C: ConnectionTrait>(
    conn: &C,
    id: DraftId,
    patch: &DraftPatch,
    only_if_inactive: bool,
) -> Result<u64, DbErr> {
    let mut update = drafts::Entity::update_many().filter(drafts::Column::Id.eq(id.0));
    if only_if_inactive {
        update = update.filter(drafts::Column::IsActive.eq(false));
    }
    if let Some(is_paid) = patch.is_paid {
        update = update.col_expr(drafts::Column::IsPaid, Expr::value(is_paid));
    }
    if let Some(is_active) = patch.is_active {
        update = update.col_expr(drafts::Column::IsActive, Expr::value(is_active));
    }
    if let Some(reference) = &patch.payment_reference {
        update = update.col_expr(drafts::Column::PaymentReference, Expr::value(reference.clone()));
    }
    if let Some(final_id) = patch.final_id {
        update = update.col_expr(drafts::Column::FinalId, Expr::value(final_id.0));
    }
    if let Some(activated_at) = patch.activated_at {
        update = update.col_expr(drafts::Column::ActivatedAt, Expr::value(activated_at));
    }
    let result = update.exec(conn).await?;
    Ok(result.rows_affected)
}

fn draft_from_model(model: drafts::Model) -> anyhow::Result<Draft> {
    let services: Vec<String> =
        serde_json::from_value(model.services).context("decode draft services")?;
    Ok(Draft {
        id: DraftId(model.id),
        profile: ProfileFields {
            name: model.name,
            email: model.email,
            phone: model.phone,
            city: model.city,
            district: model.district,
            specialty: model.specialty,
            bio: model.bio,
            certifications: model.certifications,
            experience: model.experience,
            services,
        },
        session_token: model.session_token,
        created_at: model.created_at,
        expires_at: model.expires_at,
        is_paid: model.is_paid,
        is_active: model.is_active,
        payment_reference: model.payment_reference,
        final_id: model.final_id.map(TrainerId),
        activated_at: model.activated_at,
    })
}

// ── Trainer repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbTrainerRepository {
    pub db: DatabaseConnection,
}

impl TrainerRepository for DbTrainerRepository {
    async fn find_by_id(&self, id: TrainerId) -> Result<Option<Trainer>, OnboardingServiceError> {
        let model = trainers::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find trainer by id")?;
        Ok(model.map(trainer_from_model).transpose()?)
    }
}

fn trainer_from_model(model: trainers::Model) -> anyhow::Result<Trainer> {
    let status = TrainerStatus::parse(&model.status)
        .with_context(|| format!("unknown trainer status {:?}", model.status))?;
    Ok(Trainer {
        id: TrainerId(model.id),
        draft_id: DraftId(model.draft_id),
        profile: ProfileFields {
            name: model.name,
            email: model.email,
            phone: model.phone,
            city: model.city,
            district: model.district,
            specialty: model.specialty,
            bio: model.bio,
            certifications: model.certifications,
            experience: model.experience,
            services: serde_json::from_value(model.services)
                .context("decode trainer services")?,
        },
        status,
        content: serde_json::from_value(model.content).context("decode trainer content")?,
        payment_reference: model.payment_reference,
        activated_at: model.activated_at,
        created_at: model.created_at,
    })
}

// ── Slug repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbSlugRepository {
    pub db: DatabaseConnection,
}

impl SlugRepository for DbSlugRepository {
    async fn find_by_slug(&self, slug: &Slug) -> Result<Option<SlugRecord>, OnboardingServiceError> {
        let model = trainer_slugs::Entity::find_by_id(slug.as_str().to_owned())
            .one(&self.db)
            .await
            .context("find slug")?;
        Ok(model.map(slug_from_model))
    }

    async fn reserve(
        &self,
        slug: &Slug,
        trainer_id: TrainerId,
    ) -> Result<SlugReservation, OnboardingServiceError> {
        let result = self
            .db
            .transaction::<_, (), DbErr>(|txn| {
                let slug = slug.as_str().to_owned();
                Box::pin(async move {
                    let now = chrono::Utc::now();

                    // Release whatever the trainer held before.
                    trainer_slugs::Entity::delete_many()
                        .filter(trainer_slugs::Column::TrainerId.eq(trainer_id.0))
                        .filter(trainer_slugs::Column::Slug.ne(slug.clone()))
                        .exec(txn)
                        .await?;

                    let inserted = trainer_slugs::Entity::insert(trainer_slugs::ActiveModel {
                        slug: Set(slug.clone()),
                        trainer_id: Set(trainer_id.0),
                        created_at: Set(now),
                        updated_at: Set(now),
                    })
                    .on_conflict(
                        OnConflict::column(trainer_slugs::Column::Slug)
                            .do_nothing()
                            .to_owned(),
                    )
                    .exec_without_returning(txn)
                    .await?;

                    if inserted == 0 {
                        let holder = trainer_slugs::Entity::find_by_id(slug).one(txn).await?;
                        if holder.is_some_and(|h| h.trainer_id == trainer_id.0) {
                            return Ok(());
                        }
                        // Roll back the release above.
                        return Err(DbErr::RecordNotInserted);
                    }
                    Ok(())
                })
            })
            .await;

        match result {
            Ok(()) => Ok(SlugReservation::Reserved),
            Err(TransactionError::Transaction(DbErr::RecordNotInserted)) => {
                Ok(SlugReservation::Taken)
            }
            Err(e) => Err(anyhow::Error::new(e).context("reserve slug").into()),
        }
    }
}

fn slug_from_model(model: trainer_slugs::Model) -> SlugRecord {
    SlugRecord {
        slug: model.slug,
        trainer_id: TrainerId(model.trainer_id),
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}
