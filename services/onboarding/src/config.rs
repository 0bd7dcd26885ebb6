use serde::Deserialize;

use fitpro_core::config::Config;

/// Onboarding service configuration loaded from environment variables.
#[derive(Debug, Deserialize)]
pub struct OnboardingConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Redis URL for the processed-event ledger. Without it the ledger is
    /// process-local.
    #[serde(default)]
    pub redis_url: Option<String>,
    /// TCP port for the HTTP server (default 3120). Env var: `ONBOARDING_PORT`.
    #[serde(default = "default_port")]
    pub onboarding_port: u16,
    /// Public site origin used for post-activation redirects.
    pub public_base_url: String,
    #[serde(default = "default_payment_api_url")]
    pub payment_api_url: String,
    /// Secret API key for payment retrieval.
    pub payment_api_key: String,
    /// Shared secret for webhook signatures.
    pub payment_webhook_secret: String,
    #[serde(default = "default_payment_timeout_ms")]
    pub payment_timeout_ms: u64,
    /// How long a processed webhook event id is remembered (default 7 days).
    #[serde(default = "default_processed_event_ttl_secs")]
    pub processed_event_ttl_secs: u64,
}

fn default_port() -> u16 {
    3120
}

fn default_payment_api_url() -> String {
    "https://api.stripe.com".to_owned()
}

fn default_payment_timeout_ms() -> u64 {
    10_000
}

fn default_processed_event_ttl_secs() -> u64 {
    7 * 24 * 60 * 60
}

impl Config for OnboardingConfig {}
