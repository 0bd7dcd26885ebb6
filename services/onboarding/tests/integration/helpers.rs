use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{Duration, Utc};
use uuid::Uuid;

use fitpro_domain::id::{DraftId, TrainerId};
use fitpro_domain::slug::Slug;
use fitpro_onboarding::domain::repository::{
    DraftRepository, EventLedger, PaymentProcessor, SlugRepository, TrainerRepository,
};
use fitpro_onboarding::domain::types::{
    Draft, DraftPatch, NewDraft, PaymentDetails, PaymentStatus, ProfileFields, PromotionOutcome,
    SlugRecord, SlugReservation, Trainer, TrainerStatus, VerificationFailure,
};
use fitpro_onboarding::error::OnboardingServiceError;
use fitpro_onboarding::usecase::content::generate_content;

pub const VALID_REFERENCE: &str = "pi_valid_4900_eur";

pub fn jane_doe() -> ProfileFields {
    ProfileFields {
        name: "Jane Doe".into(),
        email: "jane@x.com".into(),
        phone: None,
        city: "Vienna".into(),
        district: "Mitte".into(),
        specialty: "Strength Training".into(),
        bio: None,
        certifications: None,
        experience: None,
        services: vec!["Personal Training".into()],
    }
}

pub fn pending_draft(id: DraftId) -> Draft {
    let now = Utc::now();
    Draft {
        id,
        profile: jane_doe(),
        session_token: "s".repeat(32),
        created_at: now,
        expires_at: now + Duration::hours(24),
        is_paid: false,
        is_active: false,
        payment_reference: None,
        final_id: None,
        activated_at: None,
    }
}

pub fn payment(
    reference: &str,
    status: PaymentStatus,
    amount_minor: i64,
    currency: &str,
) -> PaymentDetails {
    PaymentDetails {
        reference: reference.to_owned(),
        status,
        amount_minor,
        currency: currency.to_owned(),
    }
}

// ── MockStore ────────────────────────────────────────────────────────────────

/// Shared in-memory tables; repositories handed to use cases are views onto
/// the same data so tests can inspect it afterwards.
#[derive(Clone, Default)]
pub struct MockStore {
    pub drafts: Arc<Mutex<HashMap<DraftId, Draft>>>,
    pub trainers: Arc<Mutex<Vec<Trainer>>>,
    pub slugs: Arc<Mutex<HashMap<String, SlugRecord>>>,
    /// Number of successful mutations across all tables.
    pub writes: Arc<AtomicUsize>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_draft(draft: Draft) -> Self {
        let store = Self::new();
        store.drafts.lock().unwrap().insert(draft.id, draft);
        store
    }

    pub fn draft_repo(&self) -> MockDraftRepo {
        MockDraftRepo {
            store: self.clone(),
            fail_promote: false,
        }
    }

    pub fn failing_draft_repo(&self) -> MockDraftRepo {
        MockDraftRepo {
            store: self.clone(),
            fail_promote: true,
        }
    }

    pub fn trainer_repo(&self) -> MockTrainerRepo {
        MockTrainerRepo { store: self.clone() }
    }

    pub fn slug_repo(&self) -> MockSlugRepo {
        MockSlugRepo { store: self.clone() }
    }

    pub fn draft(&self, id: DraftId) -> Option<Draft> {
        self.drafts.lock().unwrap().get(&id).cloned()
    }

    pub fn trainer_count(&self) -> usize {
        self.trainers.lock().unwrap().len()
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Insert an already-activated trainer directly, bypassing activation.
    pub fn seed_trainer(&self) -> TrainerId {
        let id = TrainerId(Uuid::now_v7());
        let now = Utc::now();
        self.trainers.lock().unwrap().push(Trainer {
            id,
            draft_id: DraftId(Uuid::now_v7()),
            profile: jane_doe(),
            status: TrainerStatus::Active,
            content: generate_content(&jane_doe(), now),
            payment_reference: VALID_REFERENCE.to_owned(),
            activated_at: now,
            created_at: now,
        });
        id
    }

    fn wrote(&self) {
        self.writes.fetch_add(1, Ordering::SeqCst);
    }
}

fn apply(draft: &mut Draft, patch: &DraftPatch) {
    if let Some(v) = patch.is_paid {
        draft.is_paid = v;
    }
    if let Some(v) = patch.is_active {
        draft.is_active = v;
    }
    if let Some(v) = &patch.payment_reference {
        draft.payment_reference = Some(v.clone());
    }
    if let Some(v) = patch.final_id {
        draft.final_id = Some(v);
    }
    if let Some(v) = patch.activated_at {
        draft.activated_at = Some(v);
    }
}

// ── MockDraftRepo ────────────────────────────────────────────────────────────

pub struct MockDraftRepo {
    pub store: MockStore,
    pub fail_promote: bool,
}

impl DraftRepository for MockDraftRepo {
    async fn create(&self, draft: &NewDraft) -> Result<DraftId, OnboardingServiceError> {
        let id = DraftId(Uuid::now_v7());
        self.store.drafts.lock().unwrap().insert(
            id,
            Draft {
                id,
                profile: draft.profile.clone(),
                session_token: draft.session_token.clone(),
                created_at: draft.created_at,
                expires_at: draft.expires_at,
                is_paid: false,
                is_active: false,
                payment_reference: None,
                final_id: None,
                activated_at: None,
            },
        );
        self.store.wrote();
        Ok(id)
    }

    async fn find_by_id(&self, id: DraftId) -> Result<Option<Draft>, OnboardingServiceError> {
        Ok(self.store.draft(id))
    }

    async fn update(&self, id: DraftId, patch: &DraftPatch) -> Result<(), OnboardingServiceError> {
        let mut drafts = self.store.drafts.lock().unwrap();
        let draft = drafts
            .get_mut(&id)
            .ok_or(OnboardingServiceError::DraftNotFound)?;
        apply(draft, patch);
        self.store.wrote();
        Ok(())
    }

    async fn delete(&self, id: DraftId) -> Result<bool, OnboardingServiceError> {
        let removed = self.store.drafts.lock().unwrap().remove(&id).is_some();
        if removed {
            self.store.wrote();
        }
        Ok(removed)
    }

    /// Compare-and-swap under one lock, like the transactional adapter.
    async fn promote(&self, trainer: &Trainer) -> Result<PromotionOutcome, OnboardingServiceError> {
        if self.fail_promote {
            return Err(OnboardingServiceError::StoreUnavailable(anyhow::anyhow!(
                "connection reset"
            )));
        }
        // Mirrors DbDraftRepository::promote: the lock stands in for the
        // transaction, `is_active` for `UPDATE .. WHERE is_active = false`
        // matching 0 rows, and the early returns for the re-read after it.
        let mut drafts = self.store.drafts.lock().unwrap();
        let Some(draft) = drafts.get_mut(&trainer.draft_id) else {
            return Ok(PromotionOutcome::DraftMissing);
        };
        if draft.is_active {
            let existing = draft.final_id.ok_or_else(|| {
                OnboardingServiceError::StoreUnavailable(anyhow::anyhow!(
                    "active draft without final id"
                ))
            })?;
            return Ok(PromotionOutcome::AlreadyPromoted(existing));
        }
        apply(draft, &DraftPatch::activation(trainer));
        self.store.trainers.lock().unwrap().push(trainer.clone());
        self.store.wrote();
        Ok(PromotionOutcome::Promoted(trainer.id))
    }
}

// ── MockTrainerRepo ──────────────────────────────────────────────────────────

pub struct MockTrainerRepo {
    pub store: MockStore,
}

impl TrainerRepository for MockTrainerRepo {
    async fn find_by_id(&self, id: TrainerId) -> Result<Option<Trainer>, OnboardingServiceError> {
        Ok(self
            .store
            .trainers
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.id == id)
            .cloned())
    }
}

// ── MockSlugRepo ─────────────────────────────────────────────────────────────

pub struct MockSlugRepo {
    pub store: MockStore,
}

impl SlugRepository for MockSlugRepo {
    async fn find_by_slug(&self, slug: &Slug) -> Result<Option<SlugRecord>, OnboardingServiceError> {
        Ok(self.store.slugs.lock().unwrap().get(slug.as_str()).cloned())
    }

    async fn reserve(
        &self,
        slug: &Slug,
        trainer_id: TrainerId,
    ) -> Result<SlugReservation, OnboardingServiceError> {
        // Mirrors DbSlugRepository::reserve: an existing key is the
        // `ON CONFLICT (slug) DO NOTHING` insert affecting 0 rows.
        let mut slugs = self.store.slugs.lock().unwrap();
        if let Some(holder) = slugs.get(slug.as_str()) {
            if holder.trainer_id != trainer_id {
                return Ok(SlugReservation::Taken);
            }
            return Ok(SlugReservation::Reserved);
        }
        slugs.retain(|_, record| record.trainer_id != trainer_id);
        let now = Utc::now();
        slugs.insert(
            slug.as_str().to_owned(),
            SlugRecord {
                slug: slug.as_str().to_owned(),
                trainer_id,
                created_at: now,
                updated_at: now,
            },
        );
        self.store.wrote();
        Ok(SlugReservation::Reserved)
    }
}

// ── MockPaymentProcessor ─────────────────────────────────────────────────────

/// Answers from a fixed table; unknown references behave like a processor
/// outage.
pub struct MockPaymentProcessor {
    pub payments: HashMap<String, PaymentDetails>,
    pub calls: Arc<AtomicUsize>,
}

impl MockPaymentProcessor {
    pub fn new(payments: Vec<PaymentDetails>) -> Self {
        Self {
            payments: payments
                .into_iter()
                .map(|p| (p.reference.clone(), p))
                .collect(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A processor that knows one valid, fully paid activation.
    pub fn paid() -> Self {
        Self::new(vec![payment(
            VALID_REFERENCE,
            PaymentStatus::Succeeded,
            4900,
            "eur",
        )])
    }

    /// Returns a shared handle to the call counter for post-execution inspection.
    pub fn calls_handle(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

impl PaymentProcessor for MockPaymentProcessor {
    async fn retrieve(&self, reference: &str) -> Result<PaymentDetails, OnboardingServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        // Network round trip: lets concurrent activations interleave here.
        tokio::task::yield_now().await;
        self.payments.get(reference).cloned().ok_or(
            OnboardingServiceError::VerificationFailed(VerificationFailure::ProcessorError),
        )
    }
}

// ── FailingLedger ────────────────────────────────────────────────────────────

pub struct FailingLedger;

impl EventLedger for FailingLedger {
    async fn claim(&self, _event_id: &str) -> Result<bool, OnboardingServiceError> {
        Err(OnboardingServiceError::StoreUnavailable(anyhow::anyhow!(
            "redis unreachable"
        )))
    }
}
