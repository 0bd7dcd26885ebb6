use std::time::Duration;

use sea_orm::Database;
use tracing::{info, warn};

use fitpro_core::config::Config;
use fitpro_core::tracing::init_tracing;
use fitpro_onboarding::config::OnboardingConfig;
use fitpro_onboarding::infra::ledger::{EventLedgerBackend, InMemoryEventLedger, RedisEventLedger};
use fitpro_onboarding::infra::payment::HttpPaymentProcessor;
use fitpro_onboarding::router::build_router;
use fitpro_onboarding::state::AppState;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = OnboardingConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let ledger = match &config.redis_url {
        Some(url) => {
            let pool = deadpool_redis::Config::from_url(url)
                .create_pool(Some(deadpool_redis::Runtime::Tokio1))
                .expect("failed to create Redis pool");
            EventLedgerBackend::Redis(RedisEventLedger {
                pool,
                ttl_secs: config.processed_event_ttl_secs,
            })
        }
        None => {
            warn!("REDIS_URL not set; webhook deduplication is process-local and lost on restart");
            EventLedgerBackend::InMemory(InMemoryEventLedger::new(Duration::from_secs(
                config.processed_event_ttl_secs,
            )))
        }
    };

    let payments = HttpPaymentProcessor::new(
        &config.payment_api_url,
        &config.payment_api_key,
        Duration::from_millis(config.payment_timeout_ms),
    )
    .expect("failed to build payment client");

    let state = AppState {
        db,
        ledger,
        payments,
        webhook_secret: config.payment_webhook_secret,
        public_base_url: config.public_base_url.trim_end_matches('/').to_owned(),
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.onboarding_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("onboarding service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
