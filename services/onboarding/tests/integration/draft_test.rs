use chrono::Utc;
use uuid::Uuid;

use fitpro_domain::id::DraftId;
use fitpro_onboarding::domain::repository::DraftRepository;
use fitpro_onboarding::domain::types::{DraftPatch, ProfileError, SESSION_TOKEN_LEN};
use fitpro_onboarding::error::OnboardingServiceError;
use fitpro_onboarding::usecase::activation::{ActivateTrainerInput, ActivateTrainerUseCase};
use fitpro_onboarding::usecase::draft::{DiscardDraftUseCase, GetDraftUseCase, SubmitDraftUseCase};
use fitpro_onboarding::usecase::trainer::GetTrainerUseCase;

use crate::helpers::{MockPaymentProcessor, MockStore, VALID_REFERENCE, jane_doe};

#[tokio::test]
async fn should_submit_draft_with_token_and_expiry() {
    let store = MockStore::new();
    let before = Utc::now();

    let submitted = SubmitDraftUseCase {
        drafts: store.draft_repo(),
    }
    .execute(jane_doe())
    .await
    .unwrap();

    assert_eq!(submitted.session_token.len(), SESSION_TOKEN_LEN);
    let ttl = submitted.expires_at - before;
    assert!(ttl >= chrono::Duration::hours(24) - chrono::Duration::seconds(5));
    assert!(ttl <= chrono::Duration::hours(24) + chrono::Duration::seconds(5));

    let draft = store.draft(submitted.draft_id).unwrap();
    assert_eq!(draft.session_token, submitted.session_token);
    assert!(!draft.is_active && !draft.is_paid);
    assert!(draft.final_id.is_none());
}

#[tokio::test]
async fn should_reject_incomplete_profile_before_writing() {
    let store = MockStore::new();
    let mut profile = jane_doe();
    profile.specialty = "  ".into();

    let result = SubmitDraftUseCase {
        drafts: store.draft_repo(),
    }
    .execute(profile)
    .await;

    assert!(
        matches!(
            result,
            Err(OnboardingServiceError::InvalidProfile(ProfileError::MissingField("specialty")))
        ),
        "expected missing specialty, got {result:?}"
    );
    assert_eq!(store.write_count(), 0);
}

#[tokio::test]
async fn should_read_draft_only_with_matching_token() {
    let store = MockStore::new();
    let submitted = SubmitDraftUseCase {
        drafts: store.draft_repo(),
    }
    .execute(jane_doe())
    .await
    .unwrap();
    let uc = GetDraftUseCase {
        drafts: store.draft_repo(),
    };

    let draft = uc
        .execute(submitted.draft_id, &submitted.session_token)
        .await
        .unwrap();
    assert_eq!(draft.profile.name, "Jane Doe");

    let mut altered = submitted.session_token.clone();
    let last = if altered.ends_with('a') { "b" } else { "a" };
    altered.replace_range(SESSION_TOKEN_LEN - 1.., last);
    let prefix = &submitted.session_token[..SESSION_TOKEN_LEN - 1];
    for token in ["wrong-token", "", prefix, altered.as_str()] {
        let result = uc.execute(submitted.draft_id, token).await;
        assert!(
            matches!(result, Err(OnboardingServiceError::InvalidSessionToken)),
            "expected InvalidSessionToken for {token:?}, got {result:?}"
        );
    }

    let result = uc.execute(DraftId(Uuid::now_v7()), "any").await;
    assert!(matches!(result, Err(OnboardingServiceError::DraftNotFound)));
}

#[tokio::test]
async fn should_discard_pending_draft() {
    let store = MockStore::new();
    let submitted = SubmitDraftUseCase {
        drafts: store.draft_repo(),
    }
    .execute(jane_doe())
    .await
    .unwrap();

    DiscardDraftUseCase {
        drafts: store.draft_repo(),
    }
    .execute(submitted.draft_id, &submitted.session_token)
    .await
    .unwrap();

    assert!(store.draft(submitted.draft_id).is_none());
}

#[tokio::test]
async fn should_refuse_to_discard_activated_draft() {
    let store = MockStore::new();
    let submitted = SubmitDraftUseCase {
        drafts: store.draft_repo(),
    }
    .execute(jane_doe())
    .await
    .unwrap();
    ActivateTrainerUseCase::new(store.draft_repo(), MockPaymentProcessor::paid())
        .execute(ActivateTrainerInput {
            draft_id: submitted.draft_id,
            payment_reference: VALID_REFERENCE.to_owned(),
        })
        .await
        .unwrap();

    let result = DiscardDraftUseCase {
        drafts: store.draft_repo(),
    }
    .execute(submitted.draft_id, &submitted.session_token)
    .await;

    assert!(
        matches!(result, Err(OnboardingServiceError::DraftAlreadyActive)),
        "expected DraftAlreadyActive, got {result:?}"
    );
    assert!(store.draft(submitted.draft_id).is_some());
}

#[tokio::test]
async fn should_fetch_activated_trainer() {
    let store = MockStore::new();
    let trainer_id = store.seed_trainer();
    let uc = GetTrainerUseCase {
        trainers: store.trainer_repo(),
    };

    assert_eq!(uc.execute(trainer_id).await.unwrap().id, trainer_id);

    let result = uc
        .execute(fitpro_domain::id::TrainerId(Uuid::now_v7()))
        .await;
    assert!(matches!(result, Err(OnboardingServiceError::TrainerNotFound)));
}

#[tokio::test]
async fn should_apply_partial_update_and_reject_missing_draft() {
    let store = MockStore::new();
    let submitted = SubmitDraftUseCase {
        drafts: store.draft_repo(),
    }
    .execute(jane_doe())
    .await
    .unwrap();
    let repo = store.draft_repo();

    repo.update(
        submitted.draft_id,
        &DraftPatch {
            is_paid: Some(true),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    let draft = store.draft(submitted.draft_id).unwrap();
    assert!(draft.is_paid);
    assert!(!draft.is_active);

    let result = repo
        .update(DraftId(Uuid::now_v7()), &DraftPatch::default())
        .await;
    assert!(matches!(result, Err(OnboardingServiceError::DraftNotFound)));
}
