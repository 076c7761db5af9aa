//! Service wiring: store selection and the resolver shared across requests.

use std::sync::Arc;
use std::time::Instant;

use sqlx::PgPool;

use linkwise_infra::{ContactStore, IdentityResolver, InMemoryContactStore, PostgresContactStore};

/// Shared application services, injected into handlers via `Extension`.
pub struct AppServices {
    pub resolver: IdentityResolver<dyn ContactStore>,
    started_at: Instant,
}

impl AppServices {
    pub fn new(store: Arc<dyn ContactStore>) -> Self {
        Self {
            resolver: IdentityResolver::new(store),
            started_at: Instant::now(),
        }
    }

    /// Seconds since this process started serving. Reported by `/health`.
    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

/// Pick the contact store from the environment: Postgres when
/// `DATABASE_URL` is set, otherwise the in-memory store (dev only — state
/// does not survive a restart).
pub async fn store_from_env() -> anyhow::Result<Arc<dyn ContactStore>> {
    match std::env::var("DATABASE_URL") {
        Ok(url) => {
            let pool = PgPool::connect(&url).await?;
            tracing::info!("using postgres contact store");
            Ok(Arc::new(PostgresContactStore::new(pool)))
        }
        Err(_) => {
            tracing::warn!("DATABASE_URL not set; using in-memory contact store");
            Ok(Arc::new(InMemoryContactStore::new()))
        }
    }
}
