use std::time::Duration;

use anyhow::Context as _;
use serde::Deserialize;

use crate::domain::repository::PaymentProcessor;
use crate::domain::types::{PaymentDetails, PaymentStatus, VerificationFailure};
use crate::error::OnboardingServiceError;

/// Retrieves payment intents from the processor's REST API.
#[derive(Clone)]
pub struct HttpPaymentProcessor {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct PaymentIntentBody {
    id: String,
    status: String,
    amount: i64,
    currency: String,
}

impl HttpPaymentProcessor {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .context("build payment http client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            api_key: api_key.to_owned(),
        })
    }

    async fn fetch(&self, reference: &str) -> anyhow::Result<PaymentDetails> {
        let url = format!("{}/v1/payment_intents/{reference}", self.base_url);
        let body: PaymentIntentBody = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .context("send payment intent request")?
            .error_for_status()
            .context("payment intent response status")?
            .json()
            .await
            .context("decode payment intent")?;
        Ok(PaymentDetails {
            reference: body.id,
            status: PaymentStatus::parse(&body.status),
            amount_minor: body.amount,
            currency: body.currency,
        })
    }
}

/// References are opaque processor ids; anything else is never sent upstream.
fn is_well_formed_reference(reference: &str) -> bool {
    !reference.is_empty()
        && reference.len() <= 255
        && reference
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

impl PaymentProcessor for HttpPaymentProcessor {
    async fn retrieve(&self, reference: &str) -> Result<PaymentDetails, OnboardingServiceError> {
        let processor_error =
            OnboardingServiceError::VerificationFailed(VerificationFailure::ProcessorError);
        if !is_well_formed_reference(reference) {
            tracing::info!(reference, "malformed payment reference rejected");
            return Err(processor_error);
        }
        self.fetch(reference).await.map_err(|e| {
            tracing::warn!(reference, error = ?e, "payment retrieval failed");
            processor_error
        })
    }
}
