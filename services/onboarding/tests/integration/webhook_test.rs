use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use chrono::Utc;

use fitpro_domain::id::DraftId;
use fitpro_onboarding::domain::repository::EventLedger;
use fitpro_onboarding::error::OnboardingServiceError;
use fitpro_onboarding::infra::ledger::InMemoryEventLedger;
use fitpro_onboarding::usecase::activation::ActivateTrainerUseCase;
use fitpro_onboarding::usecase::webhook::{HandlePaymentWebhookUseCase, WebhookOutcome};
use fitpro_testing::fixture::Fixture;
use fitpro_testing::webhook::{TEST_WEBHOOK_SECRET, sign};

use crate::helpers::{
    FailingLedger, MockDraftRepo, MockPaymentProcessor, MockStore, pending_draft,
};

const FIXTURE_DRAFT_ID: &str = "0192f0a0-5a1e-7c3b-9d2e-4f6a8b0c1d2e";

fn fixture_draft_id() -> DraftId {
    FIXTURE_DRAFT_ID.parse().unwrap()
}

struct Harness<L: EventLedger> {
    usecase: HandlePaymentWebhookUseCase<L, MockDraftRepo, MockPaymentProcessor>,
    store: MockStore,
    processor_calls: Arc<AtomicUsize>,
}

fn harness_with<L: EventLedger>(ledger: L, store: MockStore) -> Harness<L> {
    let processor = MockPaymentProcessor::paid();
    let processor_calls = processor.calls_handle();
    Harness {
        usecase: HandlePaymentWebhookUseCase {
            ledger,
            activation: ActivateTrainerUseCase::new(store.draft_repo(), processor),
            secret: TEST_WEBHOOK_SECRET.to_owned(),
        },
        store,
        processor_calls,
    }
}

fn harness() -> Harness<InMemoryEventLedger> {
    harness_with(
        InMemoryEventLedger::new(Duration::from_secs(3600)),
        MockStore::with_draft(pending_draft(fixture_draft_id())),
    )
}

fn signed(fixture: &str) -> (String, Vec<u8>) {
    let body = Fixture::load_raw(fixture).into_bytes();
    let header = sign(TEST_WEBHOOK_SECRET, Utc::now().timestamp(), &body);
    (header, body)
}

#[tokio::test]
async fn should_activate_draft_from_payment_intent_event() {
    let h = harness();
    let (header, body) = signed("contracts/webhook/payment_intent_succeeded.json");

    let outcome = h.usecase.execute(Some(&header), &body).await.unwrap();

    let WebhookOutcome::Activated(trainer_id) = outcome else {
        panic!("expected Activated, got {outcome:?}");
    };
    let draft = h.store.draft(fixture_draft_id()).unwrap();
    assert_eq!(draft.final_id, Some(trainer_id));
    assert_eq!(h.store.trainer_count(), 1);
}

#[tokio::test]
async fn should_activate_draft_from_checkout_session_with_legacy_temp_id() {
    let h = harness();
    let (header, body) = signed("contracts/webhook/checkout_session_completed.json");

    let outcome = h.usecase.execute(Some(&header), &body).await.unwrap();

    assert!(
        matches!(outcome, WebhookOutcome::Activated(_)),
        "expected Activated, got {outcome:?}"
    );
    let draft = h.store.draft(fixture_draft_id()).unwrap();
    assert_eq!(draft.payment_reference.as_deref(), Some("pi_valid_4900_eur"));
}

#[tokio::test]
async fn should_dispatch_duplicate_event_only_once() {
    let h = harness();
    let (header, body) = signed("contracts/webhook/payment_intent_succeeded.json");

    let first = h.usecase.execute(Some(&header), &body).await.unwrap();
    let second = h.usecase.execute(Some(&header), &body).await.unwrap();

    assert!(matches!(first, WebhookOutcome::Activated(_)));
    assert_eq!(second, WebhookOutcome::AlreadyProcessed);
    assert_eq!(second.status(), "already_processed");
    assert_eq!(h.processor_calls.load(Ordering::SeqCst), 1);
    assert_eq!(h.store.trainer_count(), 1);
}

#[tokio::test]
async fn should_report_already_active_for_distinct_event_after_client_activation() {
    let h = harness();
    let (header, body) = signed("contracts/webhook/payment_intent_succeeded.json");
    let (checkout_header, checkout_body) =
        signed("contracts/webhook/checkout_session_completed.json");

    h.usecase.execute(Some(&header), &body).await.unwrap();
    let outcome = h
        .usecase
        .execute(Some(&checkout_header), &checkout_body)
        .await
        .unwrap();

    assert!(
        matches!(outcome, WebhookOutcome::AlreadyActive(_)),
        "expected AlreadyActive, got {outcome:?}"
    );
    assert_eq!(h.store.trainer_count(), 1);
}

#[tokio::test]
async fn should_reject_bad_signature_without_dispatch() {
    let h = harness();
    let body = Fixture::load_raw("contracts/webhook/payment_intent_succeeded.json").into_bytes();
    let header = sign("whsec_wrong", Utc::now().timestamp(), &body);

    let result = h.usecase.execute(Some(&header), &body).await;

    assert!(
        matches!(result, Err(OnboardingServiceError::InvalidSignature)),
        "expected InvalidSignature, got {result:?}"
    );
    assert_eq!(h.processor_calls.load(Ordering::SeqCst), 0);
    assert!(!h.store.draft(fixture_draft_id()).unwrap().is_active);
}

#[tokio::test]
async fn should_reject_missing_signature() {
    let h = harness();
    let body = Fixture::load_raw("contracts/webhook/payment_intent_succeeded.json").into_bytes();

    let result = h.usecase.execute(None, &body).await;

    assert!(
        matches!(result, Err(OnboardingServiceError::InvalidSignature)),
        "expected InvalidSignature, got {result:?}"
    );
}

#[tokio::test]
async fn should_not_consume_event_id_on_bad_signature() {
    let h = harness();
    let (header, body) = signed("contracts/webhook/payment_intent_succeeded.json");
    let forged = sign("whsec_wrong", Utc::now().timestamp(), &body);

    let _ = h.usecase.execute(Some(&forged), &body).await;
    let outcome = h.usecase.execute(Some(&header), &body).await.unwrap();

    assert!(
        matches!(outcome, WebhookOutcome::Activated(_)),
        "a forged delivery must not mark the event processed, got {outcome:?}"
    );
}

#[tokio::test]
async fn should_reject_signed_garbage_as_invalid_payload() {
    let h = harness();
    let body = b"{\"not\":\"an event\"}".to_vec();
    let header = sign(TEST_WEBHOOK_SECRET, Utc::now().timestamp(), &body);

    let result = h.usecase.execute(Some(&header), &body).await;

    assert!(
        matches!(result, Err(OnboardingServiceError::InvalidPayload)),
        "expected InvalidPayload, got {result:?}"
    );
}

#[tokio::test]
async fn should_ignore_unrelated_event_types() {
    let h = harness();
    let (header, body) = signed("contracts/webhook/payment_intent_created.json");

    let outcome = h.usecase.execute(Some(&header), &body).await.unwrap();

    assert_eq!(outcome, WebhookOutcome::Ignored);
    assert_eq!(h.processor_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn should_ignore_payment_without_draft_metadata() {
    let h = harness();
    let (header, body) = signed("contracts/webhook/payment_intent_succeeded_no_metadata.json");

    let outcome = h.usecase.execute(Some(&header), &body).await.unwrap();

    assert_eq!(outcome, WebhookOutcome::Ignored);
    assert_eq!(h.store.trainer_count(), 0);
}

#[tokio::test]
async fn should_acknowledge_business_failures() {
    let h = harness_with(
        InMemoryEventLedger::new(Duration::from_secs(3600)),
        MockStore::new(),
    );
    let (header, body) = signed("contracts/webhook/payment_intent_succeeded.json");

    let first = h.usecase.execute(Some(&header), &body).await.unwrap();
    let second = h.usecase.execute(Some(&header), &body).await.unwrap();

    assert_eq!(first, WebhookOutcome::Failed("DRAFT_NOT_FOUND"));
    assert_eq!(first.status(), "failed");
    assert_eq!(second, WebhookOutcome::AlreadyProcessed);
}

#[tokio::test]
async fn should_withhold_acknowledgement_when_ledger_unavailable() {
    let h = harness_with(
        FailingLedger,
        MockStore::with_draft(pending_draft(fixture_draft_id())),
    );
    let (header, body) = signed("contracts/webhook/payment_intent_succeeded.json");

    let result = h.usecase.execute(Some(&header), &body).await;

    assert!(
        matches!(result, Err(OnboardingServiceError::StoreUnavailable(_))),
        "expected StoreUnavailable, got {result:?}"
    );
    assert_eq!(h.processor_calls.load(Ordering::SeqCst), 0);
}
