use std::collections::HashMap;

use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;

use fitpro_domain::id::{DraftId, TrainerId};

use crate::domain::repository::{DraftRepository, EventLedger, PaymentProcessor};
use crate::error::OnboardingServiceError;
use crate::usecase::activation::{ActivateTrainerInput, ActivateTrainerUseCase};

type HmacSha256 = Hmac<Sha256>;

/// Maximum age (and future skew) of a signed delivery.
pub const SIGNATURE_TOLERANCE_SECS: i64 = 300;

/// Event types that carry a completed activation payment.
const PAYMENT_EVENT_TYPES: [&str; 2] = ["payment_intent.succeeded", "checkout.session.completed"];

/// Check a `t=<unix>,v1=<hex>` header against `payload`. Several `v1`
/// entries may be present during secret rotation; any match is accepted.
pub fn verify_signature(
    secret: &[u8],
    header: &str,
    payload: &[u8],
    now: i64,
    tolerance_secs: i64,
) -> Result<(), OnboardingServiceError> {
    let mut timestamp = None;
    let mut signatures = Vec::new();
    for part in header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", v)) => timestamp = Some(v),
            Some(("v1", v)) => signatures.push(v),
            _ => {}
        }
    }

    let timestamp = timestamp.ok_or(OnboardingServiceError::InvalidSignature)?;
    let signed_at: i64 = timestamp
        .parse()
        .map_err(|_| OnboardingServiceError::InvalidSignature)?;
    if now.abs_diff(signed_at) > tolerance_secs.unsigned_abs() {
        return Err(OnboardingServiceError::InvalidSignature);
    }

    let mut mac =
        HmacSha256::new_from_slice(secret).map_err(|_| OnboardingServiceError::InvalidSignature)?;
    mac.update(timestamp.as_bytes());
    mac.update(b".");
    mac.update(payload);

    let matched = signatures.iter().any(|candidate| {
        hex::decode(candidate).is_ok_and(|expected| mac.clone().verify_slice(&expected).is_ok())
    });
    if matched {
        Ok(())
    } else {
        Err(OnboardingServiceError::InvalidSignature)
    }
}

// ── Envelope ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct PaymentEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: EventData,
}

#[derive(Debug, Deserialize)]
pub struct EventData {
    pub object: EventObject,
}

#[derive(Debug, Default, Deserialize)]
pub struct EventObject {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub payment_intent: Option<String>,
    #[serde(default)]
    pub metadata: Option<HashMap<String, String>>,
}

impl PaymentEvent {
    pub fn parse(payload: &[u8]) -> Result<Self, OnboardingServiceError> {
        let event: Self =
            serde_json::from_slice(payload).map_err(|_| OnboardingServiceError::InvalidPayload)?;
        if event.id.trim().is_empty() {
            return Err(OnboardingServiceError::InvalidPayload);
        }
        Ok(event)
    }

    pub fn is_payment_success(&self) -> bool {
        PAYMENT_EVENT_TYPES.contains(&self.event_type.as_str())
    }

    fn metadata(&self, key: &str) -> Option<&str> {
        self.data
            .object
            .metadata
            .as_ref()?
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Draft id from `metadata.draftId`, falling back to the legacy `tempId`.
    pub fn draft_id(&self) -> Option<&str> {
        self.metadata("draftId").or_else(|| self.metadata("tempId"))
    }

    pub fn payment_reference(&self) -> Option<&str> {
        let object = &self.data.object;
        self.metadata("paymentReference")
            .or(object.payment_intent.as_deref())
            .or(object.id.as_deref())
            .filter(|v| !v.is_empty())
    }
}

// ── Handling ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookOutcome {
    Activated(TrainerId),
    AlreadyActive(TrainerId),
    AlreadyProcessed,
    Ignored,
    /// Business handling failed; acknowledged anyway since a redelivery
    /// cannot fix it.
    Failed(&'static str),
}

impl WebhookOutcome {
    pub fn status(&self) -> &'static str {
        match self {
            Self::Activated(_) => "activated",
            Self::AlreadyActive(_) => "already_active",
            Self::AlreadyProcessed => "already_processed",
            Self::Ignored => "ignored",
            Self::Failed(_) => "failed",
        }
    }
}

pub struct HandlePaymentWebhookUseCase<L, D, P>
where
    L: EventLedger,
    D: DraftRepository,
    P: PaymentProcessor,
{
    pub ledger: L,
    pub activation: ActivateTrainerUseCase<D, P>,
    pub secret: String,
}

impl<L, D, P> HandlePaymentWebhookUseCase<L, D, P>
where
    L: EventLedger,
    D: DraftRepository,
    P: PaymentProcessor,
{
    /// `Err` only for deliveries that must not be acknowledged: bad
    /// signature, unparseable envelope, or an unreachable ledger.
    pub async fn execute(
        &self,
        signature: Option<&str>,
        payload: &[u8],
    ) -> Result<WebhookOutcome, OnboardingServiceError> {
        let header = signature.ok_or_else(|| {
            tracing::warn!(security = true, "webhook delivered without signature header");
            OnboardingServiceError::InvalidSignature
        })?;
        if let Err(e) = verify_signature(
            self.secret.as_bytes(),
            header,
            payload,
            Utc::now().timestamp(),
            SIGNATURE_TOLERANCE_SECS,
        ) {
            tracing::warn!(security = true, "webhook signature rejected");
            return Err(e);
        }

        let event = PaymentEvent::parse(payload)?;
        let event_id = event.id.as_str();

        if !self.ledger.claim(event_id).await? {
            tracing::info!(event_id, "duplicate webhook event skipped");
            return Ok(WebhookOutcome::AlreadyProcessed);
        }

        if !event.is_payment_success() {
            tracing::debug!(event_id, event_type = %event.event_type, "webhook event ignored");
            return Ok(WebhookOutcome::Ignored);
        }

        let Some(draft_id) = event.draft_id().and_then(|raw| raw.parse::<DraftId>().ok()) else {
            tracing::info!(event_id, "payment event without a usable draft id");
            return Ok(WebhookOutcome::Ignored);
        };
        let Some(payment_reference) = event.payment_reference() else {
            tracing::info!(event_id, %draft_id, "payment event without a payment reference");
            return Ok(WebhookOutcome::Ignored);
        };

        let input = ActivateTrainerInput {
            draft_id,
            payment_reference: payment_reference.to_owned(),
        };
        let outcome = match self.activation.execute(input).await {
            Ok(out) if out.already_active => WebhookOutcome::AlreadyActive(out.trainer_id),
            Ok(out) => WebhookOutcome::Activated(out.trainer_id),
            Err(e) => {
                tracing::warn!(
                    event_id,
                    %draft_id,
                    kind = e.kind(),
                    error = %e,
                    "webhook activation failed"
                );
                WebhookOutcome::Failed(e.kind())
            }
        };
        Ok(outcome)
    }
}
