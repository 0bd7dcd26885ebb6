use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use deadpool_redis::Pool;

use crate::domain::repository::EventLedger;
use crate::error::OnboardingServiceError;

fn event_key(event_id: &str) -> String {
    format!("processed_event:{event_id}")
}

/// Ledger shared by every instance through Redis.
#[derive(Clone)]
pub struct RedisEventLedger {
    pub pool: Pool,
    pub ttl_secs: u64,
}

impl EventLedger for RedisEventLedger {
    async fn claim(&self, event_id: &str) -> Result<bool, OnboardingServiceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| OnboardingServiceError::StoreUnavailable(e.into()))?;
        // SET NX replies OK for a fresh key and nil when the key exists.
        let reply: Option<String> = deadpool_redis::redis::cmd("SET")
            .arg(event_key(event_id))
            .arg(1)
            .arg("NX")
            .arg("EX")
            .arg(self.ttl_secs)
            .query_async(&mut conn)
            .await
            .map_err(|e: deadpool_redis::redis::RedisError| {
                OnboardingServiceError::StoreUnavailable(e.into())
            })?;
        Ok(reply.is_some())
    }
}

/// Process-local ledger. History is lost on restart and not shared between
/// instances.
#[derive(Clone)]
pub struct InMemoryEventLedger {
    seen: Arc<Mutex<HashMap<String, Instant>>>,
    ttl: Duration,
}

impl InMemoryEventLedger {
    pub fn new(ttl: Duration) -> Self {
        Self {
            seen: Arc::new(Mutex::new(HashMap::new())),
            ttl,
        }
    }

    fn claim_at(&self, event_id: &str, now: Instant) -> bool {
        let mut seen = self.seen.lock().unwrap_or_else(PoisonError::into_inner);
        seen.retain(|_, claimed_at| now.duration_since(*claimed_at) < self.ttl);
        if seen.contains_key(event_id) {
            return false;
        }
        seen.insert(event_id.to_owned(), now);
        true
    }
}

impl EventLedger for InMemoryEventLedger {
    async fn claim(&self, event_id: &str) -> Result<bool, OnboardingServiceError> {
        Ok(self.claim_at(event_id, Instant::now()))
    }
}

/// Ledger chosen at startup from configuration.
#[derive(Clone)]
pub enum EventLedgerBackend {
    Redis(RedisEventLedger),
    InMemory(InMemoryEventLedger),
}

impl EventLedger for EventLedgerBackend {
    async fn claim(&self, event_id: &str) -> Result<bool, OnboardingServiceError> {
        match self {
            Self::Redis(ledger) => ledger.claim(event_id).await,
            Self::InMemory(ledger) => ledger.claim(event_id).await,
        }
    }
}
